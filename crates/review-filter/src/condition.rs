//! Filter conditions and the filter specification they belong to.
//!
//! Field names follow the stored review-process filter criteria
//! (`selectedSObject`, `selectedFilters`, `selectedFilterLogic`,
//! `selectedCondition`) so previously saved criteria deserialize as-is.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::field_type::{FieldType, Operator};

/// Length of generated condition ids.
const CONDITION_ID_LENGTH: usize = 8;

/// A single comparison applied to the records of the subject entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Client-side identifier, stable across reorders.
    #[serde(default)]
    pub id: String,

    /// API name of the field being compared.
    #[serde(default, deserialize_with = "lenient_string")]
    pub field: String,

    /// Input type tag of the field (see [`FieldType`]).
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub field_type: String,

    /// Operator value (see [`Operator`]).
    #[serde(
        default,
        rename = "selectedCondition",
        deserialize_with = "lenient_string"
    )]
    pub operator: String,

    /// Comparison value. Numbers and booleans are read as their text form.
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

impl Default for FilterCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCondition {
    /// Creates a blank text condition with a fresh id.
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            field: String::new(),
            field_type: FieldType::Text.as_str().to_string(),
            operator: String::new(),
            value: String::new(),
        }
    }

    /// Creates a condition from its parts, with a fresh id.
    pub fn with(
        field: impl Into<String>,
        field_type: FieldType,
        operator: Operator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_id(),
            field: field.into(),
            field_type: field_type.as_str().to_string(),
            operator: operator.as_str().to_string(),
            value: value.into(),
        }
    }

    /// Returns the parsed field type, if the tag is known.
    pub fn parsed_field_type(&self) -> Option<FieldType> {
        self.field_type.parse().ok()
    }

    /// Returns the parsed operator, if one is selected and known.
    pub fn parsed_operator(&self) -> Option<Operator> {
        self.operator.parse().ok()
    }

    /// Returns true if field, operator and value are all non-blank.
    pub fn is_complete(&self) -> bool {
        !self.field.trim().is_empty()
            && !self.value.trim().is_empty()
            && !self.operator.trim().is_empty()
    }

    /// Points the condition at another field.
    ///
    /// The operator and value are cleared because they may not apply to the
    /// new field's type.
    pub fn set_field(&mut self, field: impl Into<String>, field_type: FieldType) {
        self.field = field.into();
        self.field_type = field_type.as_str().to_string();
        self.operator.clear();
        self.value.clear();
    }

    /// Returns the operators available for the current field type.
    ///
    /// Unknown type tags offer no operators.
    pub fn available_operators(&self) -> &'static [Operator] {
        self.parsed_field_type().map(FieldType::operators).unwrap_or(&[])
    }
}

/// The filter configuration of a review process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// API name of the entity whose records are filtered.
    #[serde(
        default,
        rename = "selectedSObject",
        deserialize_with = "lenient_string"
    )]
    pub subject: String,

    /// Ordered filter conditions; positions are referenced by `logic`.
    #[serde(default, rename = "selectedFilters")]
    pub filters: Vec<FilterCondition>,

    /// Filter logic expression over condition positions.
    #[serde(
        default,
        rename = "selectedFilterLogic",
        deserialize_with = "lenient_string"
    )]
    pub logic: String,
}

impl FilterSpec {
    /// Creates a spec for `subject` with the given conditions and logic.
    pub fn new(
        subject: impl Into<String>,
        filters: Vec<FilterCondition>,
        logic: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            filters,
            logic: logic.into(),
        }
    }
}

/// Generates a short random id for a new condition.
pub fn generate_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    uuid[..CONDITION_ID_LENGTH].to_string()
}

/// Reads a string field that may also hold a number, a boolean, or null.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}
