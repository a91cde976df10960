//! The editable filter step of a review process.
//!
//! [`ReviewFilter`] owns the condition list and the filter logic together so
//! that adding or removing a condition always rewrites the logic in lockstep.

use thiserror::Error;

use crate::condition::{FilterCondition, FilterSpec};
use crate::field_type::{FieldType, Operator};
use crate::logic::{self, LogicError};

/// Errors raised while editing or saving a review filter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    /// No subject entity has been selected.
    #[error("Missing SObject Selection For Review Process")]
    MissingSubject,

    /// No condition has a field, operator and value.
    #[error("Missing Record Filtering For Review Process")]
    MissingFilter,

    /// The filter logic is empty.
    #[error("Missing Filter Logic For Review Process")]
    MissingLogic,

    /// The filter logic failed validation.
    #[error("Invalid Filter Logic For Review Process: {0}")]
    InvalidLogic(#[source] LogicError),

    /// A condition position outside the list.
    #[error("no filter condition at index {index} (have {len})")]
    NoSuchCondition {
        /// The requested position.
        index: usize,
        /// Number of conditions in the list.
        len: usize,
    },

    /// The last remaining condition cannot be removed.
    #[error("at least one filter condition is required")]
    LastCondition,
}

impl DraftError {
    /// Returns the follow-up hint shown with the error.
    pub fn hint(&self) -> &'static str {
        match self {
            DraftError::MissingSubject => {
                "Please ensure all required fields are correctly filled out before retrying"
            }
            DraftError::MissingFilter => {
                "You must specify at least one filter. Please fill in the details and try again"
            }
            DraftError::MissingLogic => {
                "Filter logic is missing. Use filter indexes to define it and try again"
            }
            DraftError::InvalidLogic(_) => "Please check the Filter Logic and try again",
            DraftError::NoSuchCondition { .. } | DraftError::LastCondition => "",
        }
    }
}

/// Result type for draft operations.
pub type Result<T> = std::result::Result<T, DraftError>;

/// A review filter being edited: subject, conditions, and filter logic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    subject: Option<String>,
    conditions: Vec<FilterCondition>,
    logic: String,
}

impl ReviewFilter {
    /// Creates an empty draft with no subject.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a draft from a stored spec.
    ///
    /// A stored spec with no conditions gets one blank condition so there is
    /// always something to edit.
    pub fn from_spec(spec: FilterSpec) -> Self {
        let mut draft = Self {
            subject: Some(spec.subject).filter(|s| !s.is_empty()),
            conditions: spec.filters,
            logic: spec.logic,
        };
        if draft.conditions.is_empty() {
            draft.add_condition();
        }
        draft
    }

    /// Returns the selected subject entity.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Returns the conditions in order.
    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    /// Returns the current filter logic.
    pub fn logic(&self) -> &str {
        &self.logic
    }

    /// Selects a new subject entity.
    ///
    /// Conditions and logic refer to the previous entity's fields, so both
    /// are reset and a single blank condition is added.
    pub fn select_subject(&mut self, subject: impl Into<String>) {
        self.subject = Some(subject.into());
        self.conditions.clear();
        self.logic.clear();
        self.add_condition();
    }

    /// Appends a blank condition and references it from the logic.
    ///
    /// Returns the position of the new condition.
    pub fn add_condition(&mut self) -> usize {
        self.push_condition(FilterCondition::new())
    }

    /// Appends `condition` and references it from the logic.
    pub fn push_condition(&mut self, condition: FilterCondition) -> usize {
        self.conditions.push(condition);
        let index = self.conditions.len() - 1;
        self.logic = logic::append_index(&self.logic, index);
        index
    }

    /// Returns true if a condition may be removed.
    pub fn can_remove(&self) -> bool {
        self.conditions.len() > 1
    }

    /// Removes the condition at `index` and rewrites the logic.
    pub fn remove_condition(&mut self, index: usize) -> Result<FilterCondition> {
        self.check_index(index)?;
        if !self.can_remove() {
            return Err(DraftError::LastCondition);
        }

        let removed = self.conditions.remove(index);
        self.logic = logic::remove_index(&self.logic, index);
        Ok(removed)
    }

    /// Points the condition at `index` at another field, clearing its
    /// operator and value.
    pub fn set_field(
        &mut self,
        index: usize,
        field: impl Into<String>,
        field_type: FieldType,
    ) -> Result<()> {
        self.condition_mut(index)?.set_field(field, field_type);
        Ok(())
    }

    /// Sets the operator of the condition at `index`.
    pub fn set_operator(&mut self, index: usize, operator: Operator) -> Result<()> {
        self.condition_mut(index)?.operator = operator.as_str().to_string();
        Ok(())
    }

    /// Sets the value of the condition at `index`.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        self.condition_mut(index)?.value = value.into();
        Ok(())
    }

    /// Replaces the logic with user-entered text. No validation happens here.
    pub fn set_logic(&mut self, logic: impl Into<String>) {
        self.logic = logic.into();
    }

    /// Validates the logic against the current number of conditions.
    pub fn validate_logic(&self) -> logic::LogicResult<()> {
        logic::validate(&self.logic, self.conditions.len())
    }

    /// Returns true if at least one condition is complete.
    pub fn has_valid_filter(&self) -> bool {
        self.conditions.iter().any(FilterCondition::is_complete)
    }

    /// Runs the checks required before the filter step can be saved.
    ///
    /// Structural logic problems are reported ahead of validation problems.
    pub fn verify(&self) -> Result<()> {
        if self.subject().filter(|s| !s.is_empty()).is_none() {
            return Err(DraftError::MissingSubject);
        }
        if !self.has_valid_filter() {
            return Err(DraftError::MissingFilter);
        }
        if self.logic.is_empty() {
            return Err(DraftError::MissingLogic);
        }

        if let Some(error) = logic::validate_structure(&self.logic).into_iter().next() {
            return Err(DraftError::InvalidLogic(error));
        }
        self.validate_logic().map_err(DraftError::InvalidLogic)
    }

    /// Converts the draft into a spec for storage or signature computation.
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::new(
            self.subject.clone().unwrap_or_default(),
            self.conditions.clone(),
            self.logic.clone(),
        )
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.conditions.len() {
            Ok(())
        } else {
            Err(DraftError::NoSuchCondition {
                index,
                len: self.conditions.len(),
            })
        }
    }

    fn condition_mut(&mut self, index: usize) -> Result<&mut FilterCondition> {
        let len = self.conditions.len();
        self.conditions
            .get_mut(index)
            .ok_or(DraftError::NoSuchCondition { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(subject: &str, count: usize) -> ReviewFilter {
        let mut draft = ReviewFilter::new();
        draft.select_subject(subject);
        for i in 0..count {
            if i > 0 {
                draft.add_condition();
            }
            draft
                .set_field(i, format!("Field{i}"), FieldType::Text)
                .unwrap();
            draft.set_operator(i, Operator::Equals).unwrap();
            draft.set_value(i, format!("v{i}")).unwrap();
        }
        draft
    }

    #[test]
    fn test_select_subject_starts_with_one_condition() {
        let mut draft = ReviewFilter::new();
        draft.select_subject("Account");
        assert_eq!(draft.subject(), Some("Account"));
        assert_eq!(draft.conditions().len(), 1);
        assert_eq!(draft.logic(), "0");
        assert!(!draft.can_remove());
    }

    #[test]
    fn test_select_subject_resets_previous_conditions() {
        let mut draft = filled("Account", 3);
        draft.select_subject("Contact");
        assert_eq!(draft.conditions().len(), 1);
        assert_eq!(draft.logic(), "0");
    }

    #[test]
    fn test_add_and_remove_keep_logic_in_step() {
        let mut draft = filled("Account", 3);
        assert_eq!(draft.logic(), "0 AND 1 AND 2");

        let removed = draft.remove_condition(1).unwrap();
        assert_eq!(removed.field, "Field1");
        assert_eq!(draft.logic(), "0 AND 1");
        assert_eq!(draft.conditions()[1].field, "Field2");
        assert_eq!(draft.validate_logic(), Ok(()));
    }

    #[test]
    fn test_remove_rewrites_user_edited_logic() {
        let mut draft = filled("Account", 3);
        draft.set_logic("(0 OR 1) AND 2");
        draft.remove_condition(0).unwrap();
        assert_eq!(draft.logic(), "( 0 ) AND 1");
        assert_eq!(
            draft.verify(),
            Err(DraftError::InvalidLogic(LogicError::standalone_condition("0")))
        );
    }

    #[test]
    fn test_remove_last_condition_rejected() {
        let mut draft = filled("Account", 1);
        assert_eq!(draft.remove_condition(0), Err(DraftError::LastCondition));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut draft = filled("Account", 2);
        assert_eq!(
            draft.remove_condition(5),
            Err(DraftError::NoSuchCondition { index: 5, len: 2 })
        );
        assert!(draft.set_value(2, "x").is_err());
    }

    #[test]
    fn test_verify_order() {
        let draft = ReviewFilter::new();
        assert_eq!(draft.verify(), Err(DraftError::MissingSubject));

        let mut draft = ReviewFilter::new();
        draft.select_subject("Account");
        assert_eq!(draft.verify(), Err(DraftError::MissingFilter));

        let mut draft = filled("Account", 2);
        draft.set_logic("");
        assert_eq!(draft.verify(), Err(DraftError::MissingLogic));

        draft.set_logic("0 AND 2");
        assert_eq!(
            draft.verify(),
            Err(DraftError::InvalidLogic(LogicError::index_does_not_exist("2")))
        );

        draft.set_logic("0 OR");
        assert_eq!(
            draft.verify(),
            Err(DraftError::InvalidLogic(LogicError::TrailingOperator))
        );

        draft.set_logic("1 OR 0");
        assert_eq!(draft.verify(), Ok(()));
    }

    #[test]
    fn test_one_complete_condition_is_enough() {
        let mut draft = filled("Account", 1);
        draft.add_condition();
        assert_eq!(draft.verify(), Ok(()));
    }

    #[test]
    fn test_spec_round_trip() {
        let draft = filled("Account", 2);
        let spec = draft.to_spec();
        assert_eq!(spec.subject, "Account");
        assert_eq!(spec.logic, "0 AND 1");
        assert_eq!(ReviewFilter::from_spec(spec), draft);
    }

    #[test]
    fn test_from_empty_spec_adds_blank_condition() {
        let draft = ReviewFilter::from_spec(FilterSpec::default());
        assert_eq!(draft.subject(), None);
        assert_eq!(draft.conditions().len(), 1);
        assert_eq!(draft.logic(), "0");
    }

    #[test]
    fn test_error_hints() {
        assert!(DraftError::MissingLogic.hint().contains("filter indexes"));
        assert_eq!(
            DraftError::InvalidLogic(LogicError::Empty).to_string(),
            "Invalid Filter Logic For Review Process: Filter logic must be specified"
        );
    }

    #[test]
    fn test_draft_with_history() {
        use crate::History;

        let mut draft = filled("Account", 2);
        let mut history = History::new(draft.clone());

        draft.add_condition();
        history.push(draft.clone());
        draft.remove_condition(0).unwrap();
        history.push(draft.clone());
        assert_eq!(history.current().logic(), "0 AND 1");

        let restored = history.undo().unwrap();
        assert_eq!(restored.logic(), "0 AND 1 AND 2");
        assert_eq!(restored.conditions().len(), 3);

        let original = history.undo().unwrap();
        assert_eq!(original.logic(), "0 AND 1");
        assert_eq!(original.conditions().len(), 2);
    }
}
