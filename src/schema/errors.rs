//! Field-level validation errors
//!
//! Error kinds:
//! - required: a required field is absent or blank
//! - length: trimmed text length outside the declared bounds
//! - range: number outside the declared bounds
//! - enum: value not in the allowed set
//! - cast: value cannot be read as the declared type

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which side of a declared interval was violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "side", content = "limit", rename_all = "lowercase")]
pub enum Bound {
    Min(i64),
    Max(i64),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Min(n) => write!(f, "min {}", n),
            Bound::Max(n) => write!(f, "max {}", n),
        }
    }
}

/// Kind of constraint a field violated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldErrorKind {
    Required,
    Length { bound: Bound },
    Range { bound: Bound },
    Enum { value: String, allowed: Vec<String> },
    Cast { expected: &'static str },
}

impl FieldErrorKind {
    /// Returns the short tag for this kind
    pub fn tag(&self) -> &'static str {
        match self {
            FieldErrorKind::Required => "required",
            FieldErrorKind::Length { .. } => "length",
            FieldErrorKind::Range { .. } => "range",
            FieldErrorKind::Enum { .. } => "enum",
            FieldErrorKind::Cast { .. } => "cast",
        }
    }

    /// Returns the violated bound for `length` and `range` errors
    pub fn bound(&self) -> Option<Bound> {
        match self {
            FieldErrorKind::Length { bound } | FieldErrorKind::Range { bound } => Some(*bound),
            _ => None,
        }
    }
}

/// One constraint violation on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Field path, e.g. "firstName" or "address.zipCode"
    pub field: String,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, FieldErrorKind::Required, message)
    }

    pub fn length(field: impl Into<String>, bound: Bound, message: impl Into<String>) -> Self {
        Self::new(field, FieldErrorKind::Length { bound }, message)
    }

    pub fn range(field: impl Into<String>, bound: Bound, message: impl Into<String>) -> Self {
        Self::new(field, FieldErrorKind::Range { bound }, message)
    }

    /// Creates a cast error for a value that is not readable as `expected`
    pub fn cast(field: impl Into<String>, expected: &'static str, raw: &str) -> Self {
        let field = field.into();
        let message = format!(
            "Cast to {} failed for value \"{}\" at path \"{}\"",
            expected, raw, field
        );
        Self::new(field, FieldErrorKind::Cast { expected }, message)
    }

    /// Returns the short tag of the violated constraint
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}

/// Every constraint violation found in one candidate record
///
/// Never empty when returned by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the errors recorded against `field`
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.0.iter().filter(move |e| e.field == field)
    }

    /// Whether `field` has an error tagged `tag`
    pub fn has(&self, field: &str, tag: &str) -> bool {
        self.for_field(field).any(|e| e.tag() == tag)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Student validation failed: ")?;
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
