//! Student record types and declared field constraints
//!
//! Supported fields:
//! - firstName: required text, trimmed, length in [3, 10]
//! - lastName: optional text, default "N/A"
//! - age: required integer in [18, 25]
//! - country: required, one of India, USA, UK
//! - hobbies: ordered sequence of text
//! - address: nested record, sub-fields unconstrained

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum trimmed length of `firstName`
pub const FIRST_NAME_MIN_LEN: usize = 3;
/// Maximum trimmed length of `firstName`
pub const FIRST_NAME_MAX_LEN: usize = 10;
/// Value substituted when `lastName` is absent
pub const LAST_NAME_DEFAULT: &str = "N/A";
/// Inclusive lower bound of `age`
pub const AGE_MIN: i64 = 18;
/// Inclusive upper bound of `age`
pub const AGE_MAX: i64 = 25;

/// Countries a student may be registered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    India,
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "UK")]
    Uk,
}

impl Country {
    /// Every allowed value, in declaration order
    pub const ALL: [Country; 3] = [Country::India, Country::Usa, Country::Uk];

    /// Returns the wire name of the country
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::India => "India",
            Country::Usa => "USA",
            Country::Uk => "UK",
        }
    }

    /// Looks up a country by its exact wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Human-readable list of allowed values, e.g. "India, USA or UK"
    pub fn allowed_list() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(Country::as_str).collect();
        match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
            Some((last, _)) => (*last).to_string(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Postal address embedded in a student record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<i64>,
}

/// A student record that satisfied every declared constraint
///
/// Only the validator constructs this from untrusted input; the store
/// persists its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Trimmed first name
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub country: Country,
    /// Null elements are kept as provided
    #[serde(default)]
    pub hobbies: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Student {
    /// Converts the record into the JSON object stored as a document body
    pub fn into_fields(self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // A struct with named fields always serializes to an object
            _ => serde_json::Map::new(),
        }
    }
}
