//! Field checks applied before anything reaches the database

use super::error::{StoreError, StoreResult};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static AIRPORT_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

// Flight numbers, passports, employee ids, booking references, seats
static NATURAL_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]*$").unwrap());

/// Normalize an airport code: trimmed, uppercased, exactly three letters
pub fn airport_code(field: &str, raw: &str) -> StoreResult<String> {
    let code = raw.trim().to_uppercase();
    if !AIRPORT_CODE.is_match(&code) {
        return Err(StoreError::validation(
            field,
            format!("'{}' is not a three-letter airport code", raw.trim()),
        ));
    }
    Ok(code)
}

/// Trimmed, non-empty text
pub fn required(field: &str, raw: &str) -> StoreResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(StoreError::validation(field, "must not be empty"));
    }
    Ok(value.to_string())
}

/// Trimmed text, possibly empty
pub fn optional(raw: &str) -> String {
    raw.trim().to_string()
}

pub fn natural_key(field: &str, raw: &str) -> StoreResult<String> {
    let value = required(field, raw)?;
    if !NATURAL_KEY.is_match(&value) {
        return Err(StoreError::validation(
            field,
            format!("'{}' may only contain letters, digits and '-'", value),
        ));
    }
    Ok(value)
}

/// Stored lowercased, so uniqueness ignores case
pub fn email(field: &str, raw: &str) -> StoreResult<String> {
    let value = required(field, raw)?.to_lowercase();
    if !EMAIL.is_match(&value) {
        return Err(StoreError::validation(
            field,
            format!("'{}' is not an email address", value),
        ));
    }
    Ok(value)
}

/// Finite and not negative
pub fn price(field: &str, value: f64) -> StoreResult<f64> {
    if !value.is_finite() {
        return Err(StoreError::validation(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(StoreError::validation(field, "must not be negative"));
    }
    Ok(value)
}

pub fn non_negative(field: &str, value: i64) -> StoreResult<i64> {
    if value < 0 {
        return Err(StoreError::validation(field, "must not be negative"));
    }
    Ok(value)
}

/// Parse an ISO-8601 style local timestamp (`2026-03-01T08:30`, seconds optional,
/// `T` or space separated)
pub fn timestamp(field: &str, raw: &str) -> StoreResult<NaiveDateTime> {
    let value = raw.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| {
            StoreError::validation(field, format!("'{}' is not a date and time", value))
        })
}

pub fn date(field: &str, raw: &str) -> StoreResult<NaiveDate> {
    let value = raw.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| StoreError::validation(field, format!("'{}' is not a date", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_code_uppercases() {
        assert_eq!(airport_code("code", "jfk").unwrap(), "JFK");
        assert_eq!(airport_code("code", " lHr ").unwrap(), "LHR");
    }

    #[test]
    fn test_airport_code_rejects_bad_shapes() {
        assert!(airport_code("code", "JF").is_err());
        assert!(airport_code("code", "JFKX").is_err());
        assert!(airport_code("code", "J1K").is_err());
        assert!(airport_code("code", "").is_err());
    }

    #[test]
    fn test_required() {
        assert_eq!(required("name", "  Heathrow ").unwrap(), "Heathrow");
        assert!(matches!(
            required("name", "   "),
            Err(StoreError::Validation { ref field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_natural_key() {
        assert_eq!(natural_key("flight_number", "SK001-1").unwrap(), "SK001-1");
        assert!(natural_key("flight_number", "SK 001").is_err());
        assert!(natural_key("flight_number", "-SK").is_err());
    }

    #[test]
    fn test_email() {
        assert!(email("email", "alice.c@email.com").is_ok());
        assert!(email("email", "alice").is_err());
        assert!(email("email", "a@b").is_err());
        assert_eq!(email("email", " A@B.com ").unwrap(), "a@b.com");
    }

    #[test]
    fn test_price() {
        assert_eq!(price("price", 0.0).unwrap(), 0.0);
        assert!(price("price", -1.0).is_err());
        assert!(price("price", f64::NAN).is_err());
        assert!(price("price", f64::INFINITY).is_err());
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(timestamp("t", "2026-03-01T08:30").unwrap(), expected);
        assert_eq!(timestamp("t", "2026-03-01 08:30:00").unwrap(), expected);
        assert!(timestamp("t", "tomorrow").is_err());
    }

    #[test]
    fn test_date() {
        assert_eq!(
            date("d", "2026-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
        assert!(date("d", "03/01/2026").is_err());
    }
}
