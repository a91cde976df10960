//! Undo/redo history for editable state.

/// A linear undo/redo history over snapshots of `T`.
///
/// The history always holds a current state. Recording a new state discards
/// everything that could have been redone.
///
/// # Example
///
/// ```
/// use review_filter_rs::History;
///
/// let mut history = History::new(String::from("0"));
/// history.push(String::from("0 AND 1"));
///
/// assert_eq!(history.undo().map(String::as_str), Some("0"));
/// assert_eq!(history.redo().map(String::as_str), Some("0 AND 1"));
/// assert!(history.redo().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct History<T> {
    past: Vec<T>,
    current: T,
    future: Vec<T>,
    /// Maximum number of undo steps kept, if bounded.
    capacity: Option<usize>,
}

impl<T: Clone> History<T> {
    /// Creates an unbounded history starting at `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            past: Vec::new(),
            current: initial,
            future: Vec::new(),
            capacity: None,
        }
    }

    /// Creates a history that keeps at most `capacity` undo steps,
    /// dropping the oldest first.
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new(initial)
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Records `state` as the new current state and clears the redo stack.
    pub fn push(&mut self, state: T) {
        let previous = std::mem::replace(&mut self.current, state);
        self.past.push(previous);
        self.future.clear();

        if let Some(capacity) = self.capacity {
            if self.past.len() > capacity {
                let excess = self.past.len() - capacity;
                self.past.drain(..excess);
            }
        }
    }

    /// Steps back one state. Returns `None` when nothing is left to undo.
    pub fn undo(&mut self) -> Option<&T> {
        let previous = self.past.pop()?;
        let undone = std::mem::replace(&mut self.current, previous);
        self.future.push(undone);
        Some(&self.current)
    }

    /// Re-applies the most recently undone state.
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.future.pop()?;
        let replaced = std::mem::replace(&mut self.current, next);
        self.past.push(replaced);
        Some(&self.current)
    }

    /// Returns true if [`undo`](Self::undo) would change the state.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns true if [`redo`](Self::redo) would change the state.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
