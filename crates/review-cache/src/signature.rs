//! Stable signatures of filter specifications.
//!
//! A signature identifies the *content* of a [`FilterSpec`]: the subject, the
//! filter logic, and each condition's field, type, operator and value. Ids
//! and condition order do not contribute, so reordering conditions keeps the
//! signature while editing any value changes it.
//!
//! The normalized spec is written as JSON with object keys sorted, hashed
//! with 32-bit FNV-1a over UTF-16 code units, and rendered in base 36.
//! Collisions are possible in principle and are not detected.

use std::cmp::Ordering;
use std::fmt;

use review_filter_rs::{FilterCondition, FilterSpec};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;

/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 0x0100_0193;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Content hash of a normalized filter specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Wraps an already computed signature string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Signature(raw.into())
    }

    /// Returns the signature text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Signature {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Computes the signature of `spec`.
///
/// # Example
///
/// ```
/// use review_cache_rs::compute_signature;
/// use review_filter_rs::{FieldType, FilterCondition, FilterSpec, Operator};
///
/// let a = FilterCondition::with("Name", FieldType::Text, Operator::Equals, "Acme");
/// let b = FilterCondition::with("Industry", FieldType::Picklist, Operator::Equals, "Banking");
///
/// let one = FilterSpec::new("Account", vec![a.clone(), b.clone()], "0 AND 1");
/// let two = FilterSpec::new("Account", vec![b, a], "0 AND 1");
/// assert_eq!(compute_signature(&one), compute_signature(&two));
/// ```
pub fn compute_signature(spec: &FilterSpec) -> Signature {
    let serialized = stable_stringify(&normalize(spec));
    Signature(to_base36(fnv1a_utf16(&serialized)))
}

/// Builds the normalized JSON form that is hashed.
pub fn normalize(spec: &FilterSpec) -> Value {
    let mut filters: Vec<&FilterCondition> = spec.filters.iter().collect();
    filters.sort_by(|a, b| compare_conditions(a, b));

    let filters: Vec<Value> = filters
        .into_iter()
        .map(|f| {
            json!({
                "field": f.field,
                "type": f.field_type,
                "selectedCondition": f.operator,
                "value": f.value,
            })
        })
        .collect();

    json!({
        "selectedSObject": spec.subject,
        "selectedFilterLogic": spec.logic,
        "selectedFilters": filters,
    })
}

/// Orders conditions by `field|operator`, case-insensitively first.
///
/// Ties are broken by the exact key, then type, then value, so the order is
/// total and input order never leaks into the signature.
fn compare_conditions(a: &FilterCondition, b: &FilterCondition) -> Ordering {
    let key_a = format!("{}|{}", a.field, a.operator);
    let key_b = format!("{}|{}", b.field, b.operator);

    key_a
        .to_lowercase()
        .cmp(&key_b.to_lowercase())
        .then_with(|| key_a.cmp(&key_b))
        .then_with(|| a.field_type.cmp(&b.field_type))
        .then_with(|| a.value.cmp(&b.value))
}

/// Writes `value` as compact JSON with every object's keys sorted.
///
/// Keys are compared by UTF-16 code units, the order a JavaScript
/// `Array.prototype.sort` would give.
pub fn stable_stringify(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(stable_stringify).collect();
            format!("[{}]", parts.join(","))
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));

            let parts: Vec<String> = keys
                .into_iter()
                .map(|k| {
                    let key = Value::String(k.clone()).to_string();
                    format!("{key}:{}", stable_stringify(&map[k.as_str()]))
                })
                .collect();
            format!("{{{}}}", parts.join(","))
        }
        scalar => scalar.to_string(),
    }
}

/// 32-bit FNV-1a over the UTF-16 code units of `input`.
pub fn fnv1a_utf16(input: &str) -> u32 {
    input.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Renders `n` in lowercase base 36.
fn to_base36(mut n: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut reversed = Vec::new();
    while n > 0 {
        reversed.push(char::from(BASE36_DIGITS[(n % 36) as usize]));
        n /= 36;
    }
    reversed.into_iter().rev().collect()
}
