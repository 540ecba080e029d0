//! Visitor field validation
//!
//! Each attribute has exactly one rule, selected by [`VisitorField`].
//! Validation stops at the first failing attribute.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::visitor::VisitorField,
};

const MAX_NAME_CHARS: usize = 20;
const MAX_COMMENT_CHARS: usize = 200;
const MAX_AGE: u64 = 130;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{Alphabetic} ]+$").expect("valid name regex"));

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,2}/[0-9]{1,2}/[0-9]{4}|[0-9]{4}-[0-9]{1,2}-[0-9]{1,2})$")
        .expect("valid date regex")
});

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9](:[0-5][0-9])?$").expect("valid time regex")
});

/// Validate a JSON object of camelCase attributes.
///
/// Fails with `NoDataProvided` for anything that is not a non-empty object,
/// `UnsupportedField` for unknown names and `InvalidInput` for rule violations.
pub fn validate_input(data: &Value) -> AppResult<()> {
    match data.as_object() {
        Some(object) => validate_record(object),
        None => Err(AppError::NoDataProvided),
    }
}

/// Same as [`validate_input`] for an already unpacked object
pub fn validate_record(record: &Map<String, Value>) -> AppResult<()> {
    if record.is_empty() {
        return Err(AppError::NoDataProvided);
    }

    for (name, value) in record {
        let field = VisitorField::from_external(name)
            .ok_or_else(|| AppError::UnsupportedField(name.clone()))?;
        check_field(field, value)?;
    }
    Ok(())
}

/// Apply the rule for a single attribute
pub fn check_field(field: VisitorField, value: &Value) -> AppResult<()> {
    let valid = match field {
        VisitorField::Id => is_valid_id(value),
        VisitorField::Name | VisitorField::AssistorName => is_valid_name(value),
        VisitorField::Age => value.as_u64().is_some_and(|age| age < MAX_AGE),
        VisitorField::DateOfVisit => value.as_str().and_then(parse_visit_date).is_some(),
        VisitorField::TimeOfVisit => value.as_str().and_then(parse_visit_time).is_some(),
        VisitorField::Comments => value
            .as_str()
            .is_some_and(|c| c.chars().count() <= MAX_COMMENT_CHARS && !c.contains('\0')),
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::invalid_input(field, value.clone()))
    }
}

/// Check a visitor id taken from a path or query
pub fn validate_id(id: i32) -> AppResult<()> {
    check_field(VisitorField::Id, &Value::from(id))
}

fn is_valid_id(value: &Value) -> bool {
    value
        .as_i64()
        .is_some_and(|id| id > 0 && id <= i64::from(i32::MAX))
}

fn is_valid_name(value: &Value) -> bool {
    value.as_str().is_some_and(|name| {
        !name.trim().is_empty() && name.chars().count() <= MAX_NAME_CHARS && NAME_RE.is_match(name)
    })
}

/// Parse `YYYY-MM-DD` or `MM/DD/YYYY` into a calendar date
pub fn parse_visit_date(raw: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(raw) {
        return None;
    }
    let format = if raw.contains('/') { "%m/%d/%Y" } else { "%Y-%m-%d" };
    NaiveDate::parse_from_str(raw, format).ok()
}

/// Parse `HH:MM` or `HH:MM:SS` (24-hour clock)
pub fn parse_visit_time(raw: &str) -> Option<NaiveTime> {
    if !TIME_RE.is_match(raw) {
        return None;
    }
    let format = if raw.len() == 5 { "%H:%M" } else { "%H:%M:%S" };
    NaiveTime::parse_from_str(raw, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_visitor() -> Value {
        json!({
            "name": "Name Surname",
            "age": 26,
            "dateOfVisit": "2022-12-31",
            "timeOfVisit": "12:00",
            "assistorName": "Assistor",
            "comments": "This is a valid comment"
        })
    }

    fn rejected_attribute(data: Value) -> Option<VisitorField> {
        match validate_input(&data) {
            Err(AppError::InvalidInput { attribute, .. }) => Some(attribute),
            _ => None,
        }
    }

    fn with(field: &str, value: Value) -> Value {
        let mut data = valid_visitor();
        data[field] = value;
        data
    }

    #[test]
    fn test_valid_visitor() {
        assert!(validate_input(&valid_visitor()).is_ok());
    }

    #[test]
    fn test_no_data() {
        assert!(matches!(validate_input(&Value::Null), Err(AppError::NoDataProvided)));
        assert!(matches!(validate_input(&json!({})), Err(AppError::NoDataProvided)));
        assert!(matches!(validate_input(&json!("name")), Err(AppError::NoDataProvided)));
        assert!(matches!(validate_input(&json!([1, 2])), Err(AppError::NoDataProvided)));
    }

    #[test]
    fn test_unsupported_field() {
        let err = validate_input(&json!({ "email": "a@b.c" })).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedField(name) if name == "email"));
    }

    #[test]
    fn test_invalid_names() {
        let name = Some(VisitorField::Name);
        assert_eq!(rejected_attribute(with("name", json!(165466544))), name);
        assert_eq!(rejected_attribute(with("name", json!(""))), name);
        assert_eq!(rejected_attribute(with("name", json!("   "))), name);
        assert_eq!(rejected_attribute(with("name", json!("A".repeat(21)))), name);
        assert_eq!(rejected_attribute(with("name", json!("N@m3"))), name);
        assert_eq!(
            rejected_attribute(with("assistorName", json!("R2 D2"))),
            Some(VisitorField::AssistorName)
        );
    }

    #[test]
    fn test_name_limits() {
        assert!(validate_input(&with("name", json!("A".repeat(20)))).is_ok());
        assert!(validate_input(&with("name", json!("Zoë Nkosi"))).is_ok());
    }

    #[test]
    fn test_invalid_age() {
        let age = Some(VisitorField::Age);
        assert_eq!(rejected_attribute(with("age", json!("twenty six"))), age);
        assert_eq!(rejected_attribute(with("age", json!(130))), age);
        assert_eq!(rejected_attribute(with("age", json!(-1))), age);
        assert_eq!(rejected_attribute(with("age", json!(26.5))), age);
        assert!(validate_input(&with("age", json!(0))).is_ok());
        assert!(validate_input(&with("age", json!(129))).is_ok());
    }

    #[test]
    fn test_dates() {
        let date = Some(VisitorField::DateOfVisit);
        assert_eq!(rejected_attribute(with("dateOfVisit", json!("0102/18/20"))), date);
        assert_eq!(rejected_attribute(with("dateOfVisit", json!("2022-13-01"))), date);
        assert_eq!(rejected_attribute(with("dateOfVisit", json!(20221231))), date);
        assert_eq!(
            parse_visit_date("12/31/2022"),
            NaiveDate::from_ymd_opt(2022, 12, 31)
        );
        assert_eq!(
            parse_visit_date("2022-12-31"),
            NaiveDate::from_ymd_opt(2022, 12, 31)
        );
    }

    #[test]
    fn test_times() {
        let time = Some(VisitorField::TimeOfVisit);
        assert_eq!(rejected_attribute(with("timeOfVisit", json!("24:00"))), time);
        assert_eq!(rejected_attribute(with("timeOfVisit", json!("12:60"))), time);
        assert_eq!(rejected_attribute(with("timeOfVisit", json!("9:00"))), time);
        assert_eq!(parse_visit_time("23:59:59"), NaiveTime::from_hms_opt(23, 59, 59));
        assert_eq!(parse_visit_time("00:00"), NaiveTime::from_hms_opt(0, 0, 0));
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            rejected_attribute(with("comments", json!("A".repeat(201)))),
            Some(VisitorField::Comments)
        );
        assert!(validate_input(&with("comments", json!(""))).is_ok());
        assert!(validate_input(&with("comments", json!("A".repeat(200)))).is_ok());
        // Postgres text columns cannot hold NUL
        assert_eq!(
            rejected_attribute(with("comments", json!("all good\u{0000}"))),
            Some(VisitorField::Comments)
        );
    }

    #[test]
    fn test_ids() {
        assert!(validate_id(1).is_ok());
        assert!(validate_id(0).is_err());
        assert!(validate_id(-4).is_err());
        assert!(check_field(VisitorField::Id, &json!("3")).is_err());
        assert!(check_field(VisitorField::Id, &json!(2.5)).is_err());
    }

    #[test]
    fn test_first_failure_is_reported() {
        let data = json!({ "name": 12345 });
        let err = validate_input(&data).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidInput { attribute: VisitorField::Name, ref value } if *value == json!(12345)
        ));
    }
}
