use lazy_static::lazy_static;
use regex::Regex;
use time::{macros::format_description, Date};

use crate::error::ApiError;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalized e-mail, or 400 when the format is wrong.
pub fn email(raw: &str) -> Result<String, ApiError> {
    let email = normalize_email(raw);
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    Ok(email)
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Trimmed value, with blank input collapsed to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fails with every blank field named, in the order given.
pub fn require(fields: &[(&'static str, Option<&str>)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| is_blank(*value))
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Accepts `YYYY-MM-DD` and full ISO timestamps (the date part is kept).
pub fn date(field: &str, raw: &str) -> Result<Date, ApiError> {
    let day = raw.trim().split('T').next().unwrap_or_default();
    Date::parse(day, format_description!("[year]-[month]-[day]"))
        .map_err(|_| ApiError::bad_request(format!("Invalid {field}: expected YYYY-MM-DD")))
}

pub fn amount(field: &str, value: f64) -> Result<f64, ApiError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::bad_request(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(round_cents(value))
}

/// Whole minutes; fractional input is rounded.
pub fn minutes(field: &str, value: f64) -> Result<i32, ApiError> {
    if !value.is_finite() || value < 0.0 || value > f64::from(i32::MAX) {
        return Err(ApiError::bad_request(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(value.round() as i32)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn email_format() {
        assert!(is_valid_email("rider@example.com"));
        assert!(!is_valid_email("rider@example"));
        assert!(!is_valid_email("rider example@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(email("  Ann@Example.COM ").unwrap(), "ann@example.com");
        assert!(matches!(email("nope"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn require_lists_every_missing_field() {
        let err = require(&[
            ("FirstName", Some("Ann")),
            ("LastName", None),
            ("City", Some("   ")),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: LastName, City");
        assert!(require(&[("FirstName", Some("Ann"))]).is_ok());
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(Some("  x ".into())), Some("x".into()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn date_accepts_plain_and_timestamp_forms() {
        let d = date("DateOfBirth", "1990-04-12").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (1990, Month::April, 12));
        let d = date("DateOfBirth", "1990-04-12T00:00:00.000Z").unwrap();
        assert_eq!(d.day(), 12);
        assert!(date("DateOfBirth", "12/04/1990").is_err());
    }

    #[test]
    fn amounts_are_non_negative_and_rounded() {
        assert_eq!(amount("Fare", 12.346).unwrap(), 12.35);
        assert_eq!(amount("Tip", 0.0).unwrap(), 0.0);
        assert!(amount("Tip", -1.0).is_err());
        assert!(amount("Fare", f64::NAN).is_err());
        assert!(minutes("EstimatedTime", -5.0).is_err());
        assert_eq!(minutes("EstimatedTime", 14.6).unwrap(), 15);
    }
}
