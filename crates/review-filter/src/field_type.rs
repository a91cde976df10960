//! Field types and the comparison operators each one offers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown field type or operator tag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownTagError {
    kind: &'static str,
    value: String,
}

/// The input type a filter value is edited with.
///
/// Serialized as the input tag (`"datetime-local"`, `"text"`, ...), which is
/// also the `type` stored on each filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "datetime-local")]
    DateTime,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "picklist")]
    Picklist,
    #[serde(rename = "currency")]
    Currency,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "tel")]
    Phone,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "lookup")]
    Lookup,
}

impl FieldType {
    /// All field types, in declaration order.
    pub const ALL: [FieldType; 12] = [
        FieldType::DateTime,
        FieldType::Date,
        FieldType::Time,
        FieldType::Text,
        FieldType::Picklist,
        FieldType::Currency,
        FieldType::Number,
        FieldType::Checkbox,
        FieldType::Phone,
        FieldType::Email,
        FieldType::Url,
        FieldType::Lookup,
    ];

    /// Returns the input tag for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::DateTime => "datetime-local",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Text => "text",
            FieldType::Picklist => "picklist",
            FieldType::Currency => "currency",
            FieldType::Number => "number",
            FieldType::Checkbox => "checkbox",
            FieldType::Phone => "tel",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Lookup => "lookup",
        }
    }

    /// Maps a schema display type (`"STRING"`, `"DATETIME"`, `"REFERENCE"`, ...)
    /// to the input type used to edit it. Unknown types are edited as text.
    ///
    /// Booleans are edited as a yes/no picklist.
    pub fn from_schema_type(schema_type: &str) -> Self {
        match schema_type {
            "DATETIME" => FieldType::DateTime,
            "DATE" => FieldType::Date,
            "TIME" => FieldType::Time,
            "PICKLIST" | "BOOLEAN" => FieldType::Picklist,
            "CURRENCY" => FieldType::Currency,
            "NUMBER" | "INTEGER" | "DOUBLE" => FieldType::Number,
            "EMAIL" => FieldType::Email,
            "PHONE" => FieldType::Phone,
            "URL" => FieldType::Url,
            "REFERENCE" | "ID" => FieldType::Lookup,
            _ => FieldType::Text,
        }
    }

    /// Returns the operators a condition on this type may use.
    pub fn operators(self) -> &'static [Operator] {
        use Operator::*;

        const TEXT: &[Operator] = &[
            Equals,
            NotEqual,
            Contains,
            DoesNotContain,
            StartsWith,
            EndsWith,
            IsNull,
        ];
        const NUMBER: &[Operator] = &[
            Equals,
            NotEqual,
            GreaterThan,
            LessThan,
            GreaterOrEqualTo,
            LessOrEqualTo,
            IsNull,
        ];
        const CHECKBOX: &[Operator] = &[Equals, NotEqual];
        const LOOKUP: &[Operator] = &[Equals, NotEqual, IsNull];
        const DATE: &[Operator] = &[Equals, NotEqual, Before, After, IsNull];

        match self {
            FieldType::DateTime | FieldType::Date | FieldType::Time => DATE,
            FieldType::Text | FieldType::Picklist | FieldType::Phone | FieldType::Email => TEXT,
            FieldType::Currency | FieldType::Number => NUMBER,
            FieldType::Checkbox => CHECKBOX,
            FieldType::Url | FieldType::Lookup => LOOKUP,
        }
    }

    /// Returns true if `operator` is offered for this type.
    pub fn supports(self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTagError {
                kind: "field type",
                value: s.to_string(),
            })
    }
}

/// A comparison operator, stored on a condition as `selectedCondition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    NotEqual,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    IsNull,
    GreaterThan,
    LessThan,
    GreaterOrEqualTo,
    LessOrEqualTo,
    Before,
    After,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 13] = [
        Operator::Equals,
        Operator::NotEqual,
        Operator::Contains,
        Operator::DoesNotContain,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::IsNull,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterOrEqualTo,
        Operator::LessOrEqualTo,
        Operator::Before,
        Operator::After,
    ];

    /// Returns the stored value of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEqual => "notEqual",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "doesNotContain",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::IsNull => "isNull",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::GreaterOrEqualTo => "greaterOrEqualTo",
            Operator::LessOrEqualTo => "lessOrEqualTo",
            Operator::Before => "before",
            Operator::After => "after",
        }
    }

    /// Returns the human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::NotEqual => "Not Equal",
            Operator::Contains => "Contains",
            Operator::DoesNotContain => "Does Not Contain",
            Operator::StartsWith => "Starts With",
            Operator::EndsWith => "Ends With",
            Operator::IsNull => "Is Null",
            Operator::GreaterThan => "Greater Than",
            Operator::LessThan => "Less Than",
            Operator::GreaterOrEqualTo => "Greater Than or Equal To",
            Operator::LessOrEqualTo => "Less Than or Equal To",
            Operator::Before => "Before",
            Operator::After => "After",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownTagError {
                kind: "operator",
                value: s.to_string(),
            })
    }
}
