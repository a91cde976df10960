//! Filter logic and filter conditions for review processes.
//!
//! A review process selects records of one subject entity through an ordered
//! list of [`FilterCondition`]s combined by a filter logic expression such as
//! `0 AND (1 OR 2)`. This crate provides:
//!
//! - [`logic`]: lexing, validation and index-aware rewriting of filter logic
//! - [`FilterCondition`] and [`FilterSpec`], serialized with the field names
//!   of stored review-process criteria
//! - [`FieldType`] and [`Operator`], the operators available per field type
//! - [`ReviewFilter`], an editable draft that keeps conditions and logic in
//!   step and checks them before saving
//! - [`History`], an undo/redo stack for draft snapshots
//!
//! # Example
//!
//! ```
//! use review_filter_rs::{FieldType, Operator, ReviewFilter};
//!
//! let mut draft = ReviewFilter::new();
//! draft.select_subject("Account");
//! draft.set_field(0, "Industry", FieldType::Picklist)?;
//! draft.set_operator(0, Operator::Equals)?;
//! draft.set_value(0, "Banking")?;
//!
//! let second = draft.add_condition();
//! assert_eq!(draft.logic(), "0 AND 1");
//!
//! draft.remove_condition(second)?;
//! assert_eq!(draft.logic(), "0");
//! assert!(draft.verify().is_ok());
//! # Ok::<(), review_filter_rs::DraftError>(())
//! ```

pub mod condition;
pub mod draft;
pub mod field_type;
pub mod history;
pub mod logic;

pub use condition::{FilterCondition, FilterSpec};
pub use draft::{DraftError, ReviewFilter};
pub use field_type::{FieldType, Operator, UnknownTagError};
pub use history::History;
pub use logic::{LogicError, LogicResult, Validation};
