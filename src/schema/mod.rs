//! Student schema subsystem
//!
//! Constraints are enforced at write time only; stored documents are never
//! re-validated on read.
//!
//! # Design Principles
//!
//! - One statically typed validation function per entity
//! - All field errors aggregated, never first-failure
//! - Defaults applied before checks, never validated
//! - Deterministic, side-effect free

mod errors;
mod types;
mod validator;

pub use errors::{Bound, FieldError, FieldErrorKind, ValidationErrors};
pub use types::{
    Address, Country, Student, AGE_MAX, AGE_MIN, FIRST_NAME_MAX_LEN, FIRST_NAME_MIN_LEN,
    LAST_NAME_DEFAULT,
};
pub use validator::{validate, validate_value};
