//! Student validator
//!
//! Validation semantics:
//! - Every declared field is checked, errors are aggregated, never short-circuited
//! - Wire values are cast to the declared type first (string ↔ number, scalar → text)
//! - Defaults are substituted for absent fields and are not themselves validated
//! - Undeclared fields are dropped
//! - Validation is a pure function of the candidate

use serde_json::{Map, Value};

use super::errors::{Bound, FieldError, FieldErrorKind, ValidationErrors};
use super::types::{
    Address, Country, Student, AGE_MAX, AGE_MIN, FIRST_NAME_MAX_LEN, FIRST_NAME_MIN_LEN,
    LAST_NAME_DEFAULT,
};

/// Outcome of reading one wire value as a declared type
enum Cast<T> {
    /// Missing or null
    Absent,
    /// Present but not readable; a cast error was recorded
    Invalid,
    Present(T),
}

/// Validates a candidate record against the student schema.
///
/// # Errors
///
/// Returns every violated constraint across all fields, in declaration order.
pub fn validate(candidate: &Map<String, Value>) -> Result<Student, ValidationErrors> {
    let mut errors = Vec::new();

    let first_name = validate_first_name(candidate.get("firstName"), &mut errors);

    let last_name = match cast_text("lastName", candidate.get("lastName"), &mut errors) {
        Cast::Present(name) => Some(name),
        Cast::Absent => Some(LAST_NAME_DEFAULT.to_string()),
        Cast::Invalid => None,
    };

    let age = validate_age(candidate.get("age"), &mut errors);
    let country = validate_country(candidate.get("country"), &mut errors);
    let hobbies = cast_hobbies(candidate.get("hobbies"), &mut errors);
    let address = cast_address(candidate.get("address"), &mut errors);

    match (first_name, last_name, age, country, hobbies, address) {
        (Some(first_name), Some(last_name), Some(age), Some(country), Some(hobbies), Some(address))
            if errors.is_empty() =>
        {
            Ok(Student {
                first_name,
                last_name,
                age,
                country,
                hobbies,
                address,
            })
        }
        _ => Err(ValidationErrors::new(errors)),
    }
}

/// Validates a candidate given as an arbitrary JSON value.
///
/// Non-object candidates fail every required field.
pub fn validate_value(candidate: &Value) -> Result<Student, ValidationErrors> {
    match candidate {
        Value::Object(map) => validate(map),
        _ => validate(&Map::new()),
    }
}

fn validate_first_name(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    const FIELD: &str = "firstName";

    let raw = match cast_text(FIELD, value, errors) {
        Cast::Present(raw) => raw,
        Cast::Absent => {
            errors.push(FieldError::required(FIELD, "First name is required"));
            return None;
        }
        Cast::Invalid => return None,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::required(FIELD, "First name is required"));
        return None;
    }

    let len = trimmed.chars().count();
    if len < FIRST_NAME_MIN_LEN {
        errors.push(FieldError::length(
            FIELD,
            Bound::Min(FIRST_NAME_MIN_LEN as i64),
            format!("First name must be at least {} characters", FIRST_NAME_MIN_LEN),
        ));
        return None;
    }
    if len > FIRST_NAME_MAX_LEN {
        errors.push(FieldError::length(
            FIELD,
            Bound::Max(FIRST_NAME_MAX_LEN as i64),
            format!("First name can not exceed {} characters", FIRST_NAME_MAX_LEN),
        ));
        return None;
    }

    Some(trimmed.to_string())
}

fn validate_age(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<i64> {
    const FIELD: &str = "age";

    let age = match cast_int(FIELD, value, errors) {
        Cast::Present(age) => age,
        Cast::Absent => {
            errors.push(FieldError::required(FIELD, "Age is required"));
            return None;
        }
        Cast::Invalid => return None,
    };

    if age < AGE_MIN {
        errors.push(FieldError::range(
            FIELD,
            Bound::Min(AGE_MIN),
            format!("You need to be atleast {} years old", AGE_MIN),
        ));
        return None;
    }
    if age > AGE_MAX {
        errors.push(FieldError::range(
            FIELD,
            Bound::Max(AGE_MAX),
            format!("You need to be {} years old or lesser", AGE_MAX),
        ));
        return None;
    }

    Some(age)
}

fn validate_country(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<Country> {
    const FIELD: &str = "country";

    let name = match cast_text(FIELD, value, errors) {
        Cast::Present(name) if !name.is_empty() => name,
        Cast::Present(_) | Cast::Absent => {
            errors.push(FieldError::required(FIELD, "Country is required"));
            return None;
        }
        Cast::Invalid => return None,
    };

    match Country::from_name(&name) {
        Some(country) => Some(country),
        None => {
            let message = format!(
                "We don't operate in {}. Please select a country from {}.",
                name,
                Country::allowed_list()
            );
            let allowed = Country::ALL.iter().map(|c| c.as_str().to_string()).collect();
            errors.push(FieldError::new(
                FIELD,
                FieldErrorKind::Enum {
                    value: name,
                    allowed,
                },
                message,
            ));
            None
        }
    }
}

/// Reads `hobbies`; absent means an empty sequence, null elements are kept
fn cast_hobbies(
    value: Option<&Value>,
    errors: &mut Vec<FieldError>,
) -> Option<Vec<Option<String>>> {
    const FIELD: &str = "hobbies";

    match value {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::Array(items)) => {
            let mut hobbies = Vec::with_capacity(items.len());
            let mut valid = true;
            for (i, item) in items.iter().enumerate() {
                let path = format!("{}.{}", FIELD, i);
                match cast_text(&path, Some(item), errors) {
                    Cast::Present(hobby) => hobbies.push(Some(hobby)),
                    Cast::Absent => hobbies.push(None),
                    Cast::Invalid => valid = false,
                }
            }
            valid.then_some(hobbies)
        }
        Some(scalar) => match cast_text(FIELD, Some(scalar), errors) {
            Cast::Present(hobby) => Some(vec![Some(hobby)]),
            Cast::Absent => Some(Vec::new()),
            Cast::Invalid => None,
        },
    }
}

/// Reads `address`; the outer option is validity, the inner one presence
fn cast_address(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<Option<Address>> {
    const FIELD: &str = "address";

    let obj = match value {
        None | Some(Value::Null) => return Some(None),
        Some(Value::Object(obj)) => obj,
        Some(other) => {
            errors.push(FieldError::cast(FIELD, "Embedded", &raw_repr(other)));
            return None;
        }
    };

    let before = errors.len();
    let text = |key: &str, errors: &mut Vec<FieldError>| {
        match cast_text(&format!("{}.{}", FIELD, key), obj.get(key), errors) {
            Cast::Present(s) => Some(s),
            Cast::Absent | Cast::Invalid => None,
        }
    };

    let city = text("city", errors);
    let state = text("state", errors);
    let country = text("country", errors);
    let zip_code = match cast_int("address.zipCode", obj.get("zipCode"), errors) {
        Cast::Present(zip) => Some(zip),
        Cast::Absent | Cast::Invalid => None,
    };

    if errors.len() > before {
        return None;
    }

    Some(Some(Address {
        city,
        state,
        country,
        zip_code,
    }))
}

/// Reads a text field, casting numbers and booleans to their string form
fn cast_text(field: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) -> Cast<String> {
    match value {
        None | Some(Value::Null) => Cast::Absent,
        Some(Value::String(s)) => Cast::Present(s.clone()),
        Some(Value::Number(n)) => Cast::Present(n.to_string()),
        Some(Value::Bool(b)) => Cast::Present(b.to_string()),
        Some(other) => {
            errors.push(FieldError::cast(field, "string", &raw_repr(other)));
            Cast::Invalid
        }
    }
}

/// Reads an integer field, accepting integral numbers and numeric strings
///
/// Blank strings read as absent. "20" and "20.0" both read as 20.
fn cast_int(field: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) -> Cast<i64> {
    let parsed = match value {
        None | Some(Value::Null) => return Cast::Absent,
        Some(Value::String(s)) if s.trim().is_empty() => return Cast::Absent,
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Some(_) => None,
    };

    match (parsed, value) {
        (Some(n), _) => Cast::Present(n),
        (None, Some(other)) => {
            errors.push(FieldError::cast(field, "integer", &raw_repr(other)));
            Cast::Invalid
        }
        (None, None) => Cast::Absent,
    }
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Renders a value for error messages without JSON quoting of strings
fn raw_repr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("candidate must be an object"),
        }
    }

    fn valid_candidate() -> Map<String, Value> {
        candidate(json!({
            "firstName": "Lakshya",
            "lastName": "Kumar",
            "age": 20,
            "country": "India"
        }))
    }

    #[test]
    fn test_valid_record_passes() {
        let student = validate(&valid_candidate()).unwrap();
        assert_eq!(student.first_name, "Lakshya");
        assert_eq!(student.last_name, "Kumar");
        assert_eq!(student.age, 20);
        assert_eq!(student.country, Country::India);
        assert!(student.hobbies.is_empty());
        assert!(student.address.is_none());
    }

    #[test]
    fn test_first_name_is_trimmed() {
        let mut c = valid_candidate();
        c.insert("firstName".into(), json!("   Asha  "));
        assert_eq!(validate(&c).unwrap().first_name, "Asha");
    }

    #[test]
    fn test_blank_first_name_is_required_not_length() {
        let mut c = valid_candidate();
        c.insert("firstName".into(), json!("    "));
        let errors = validate(&c).unwrap_err();
        assert!(errors.has("firstName", "required"));
        assert!(!errors.has("firstName", "length"));
    }

    #[test]
    fn test_length_counts_trimmed_chars() {
        let mut c = valid_candidate();
        // 2 chars once trimmed
        c.insert("firstName".into(), json!("  Al   "));
        let errors = validate(&c).unwrap_err();
        let error = errors.for_field("firstName").next().unwrap();
        assert_eq!(error.kind.bound(), Some(Bound::Min(3)));

        // 10 chars once trimmed
        c.insert("firstName".into(), json!("  Alexandria  "));
        assert!(validate(&c).is_ok());
    }

    #[test]
    fn test_first_name_too_long() {
        let mut c = valid_candidate();
        c.insert("firstName".into(), json!("Bartholomew"));
        let errors = validate(&c).unwrap_err();
        let error = errors.for_field("firstName").next().unwrap();
        assert_eq!(error.kind.bound(), Some(Bound::Max(10)));
        assert_eq!(error.message, "First name can not exceed 10 characters");
    }

    #[test]
    fn test_last_name_defaults() {
        let mut c = valid_candidate();
        c.remove("lastName");
        assert_eq!(validate(&c).unwrap().last_name, "N/A");

        c.insert("lastName".into(), Value::Null);
        assert_eq!(validate(&c).unwrap().last_name, "N/A");
    }

    #[test]
    fn test_empty_last_name_is_kept() {
        let mut c = valid_candidate();
        c.insert("lastName".into(), json!(""));
        assert_eq!(validate(&c).unwrap().last_name, "");
    }

    #[test]
    fn test_age_boundaries() {
        for age in [18, 25] {
            let mut c = valid_candidate();
            c.insert("age".into(), json!(age));
            assert!(validate(&c).is_ok(), "age {} should pass", age);
        }

        let mut c = valid_candidate();
        c.insert("age".into(), json!(17));
        let errors = validate(&c).unwrap_err();
        assert_eq!(
            errors.for_field("age").next().unwrap().kind,
            FieldErrorKind::Range { bound: Bound::Min(18) }
        );

        c.insert("age".into(), json!(26));
        let errors = validate(&c).unwrap_err();
        assert_eq!(
            errors.for_field("age").next().unwrap().kind,
            FieldErrorKind::Range { bound: Bound::Max(25) }
        );
    }

    #[test]
    fn test_age_cast_from_string() {
        let mut c = valid_candidate();
        c.insert("age".into(), json!(" 21 "));
        assert_eq!(validate(&c).unwrap().age, 21);

        c.insert("age".into(), json!("twenty"));
        assert!(validate(&c).unwrap_err().has("age", "cast"));

        c.insert("age".into(), json!(""));
        assert!(validate(&c).unwrap_err().has("age", "required"));
    }

    #[test]
    fn test_age_rejects_fractions() {
        let mut c = valid_candidate();
        c.insert("age".into(), json!(20.5));
        assert!(validate(&c).unwrap_err().has("age", "cast"));

        c.insert("age".into(), json!(20.0));
        assert_eq!(validate(&c).unwrap().age, 20);
    }

    #[test]
    fn test_integral_strings_match_integral_numbers() {
        let mut c = valid_candidate();
        c.insert("age".into(), json!("20.0"));
        assert_eq!(validate(&c).unwrap().age, 20);

        c.insert("age".into(), json!("20.5"));
        assert!(validate(&c).unwrap_err().has("age", "cast"));

        c.insert("age".into(), json!("NaN"));
        assert!(validate(&c).unwrap_err().has("age", "cast"));
    }

    #[test]
    fn test_age_range_messages() {
        let mut c = valid_candidate();
        c.insert("age".into(), json!(17));
        let errors = validate(&c).unwrap_err();
        assert_eq!(
            errors.for_field("age").next().unwrap().message,
            "You need to be atleast 18 years old"
        );

        c.insert("age".into(), json!(26));
        let errors = validate(&c).unwrap_err();
        assert_eq!(
            errors.for_field("age").next().unwrap().message,
            "You need to be 25 years old or lesser"
        );
    }

    #[test]
    fn test_country_enum_message() {
        let mut c = valid_candidate();
        c.insert("country".into(), json!("France"));
        let errors = validate(&c).unwrap_err();
        let error = errors.for_field("country").next().unwrap();
        assert_eq!(
            error.message,
            "We don't operate in France. Please select a country from India, USA or UK."
        );
        match &error.kind {
            FieldErrorKind::Enum { value, allowed } => {
                assert_eq!(value, "France");
                assert_eq!(allowed, &vec!["India", "USA", "UK"]);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_all_errors_reported() {
        let errors = validate(&candidate(json!({
            "firstName": "Al",
            "age": 40,
            "country": "Mars",
            "address": "nowhere"
        })))
        .unwrap_err();

        let tags: Vec<(&str, &str)> = errors
            .errors()
            .iter()
            .map(|e| (e.field.as_str(), e.tag()))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("firstName", "length"),
                ("age", "range"),
                ("country", "enum"),
                ("address", "cast"),
            ]
        );
    }

    #[test]
    fn test_empty_candidate_reports_every_required_field() {
        let errors = validate(&Map::new()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.has("firstName", "required"));
        assert!(errors.has("age", "required"));
        assert!(errors.has("country", "required"));
    }

    #[test]
    fn test_hobbies_and_address_accepted() {
        let mut c = valid_candidate();
        c.insert("hobbies".into(), json!(["chess", 42, null]));
        c.insert(
            "address".into(),
            json!({ "city": "Delhi", "zipCode": "110001", "planet": "Earth" }),
        );

        let student = validate(&c).unwrap();
        assert_eq!(
            student.hobbies,
            vec![Some("chess".to_string()), Some("42".to_string()), None]
        );
        let address = student.address.unwrap();
        assert_eq!(address.city.as_deref(), Some("Delhi"));
        assert_eq!(address.zip_code, Some(110001));
        assert!(address.state.is_none());
    }

    #[test]
    fn test_single_hobby_is_wrapped() {
        let mut c = valid_candidate();
        c.insert("hobbies".into(), json!("painting"));
        assert_eq!(
            validate(&c).unwrap().hobbies,
            vec![Some("painting".to_string())]
        );
    }

    #[test]
    fn test_nested_hobby_is_cast_error() {
        let mut c = valid_candidate();
        c.insert("hobbies".into(), json!(["ok", {"nested": true}]));
        assert!(validate(&c).unwrap_err().has("hobbies.1", "cast"));
    }

    #[test]
    fn test_bad_zip_code() {
        let mut c = valid_candidate();
        c.insert("address".into(), json!({ "zipCode": "ABC" }));
        assert!(validate(&c).unwrap_err().has("address.zipCode", "cast"));
    }

    #[test]
    fn test_non_object_candidate() {
        let errors = validate_value(&json!([1, 2, 3])).unwrap_err();
        assert!(errors.has("firstName", "required"));
    }
}
