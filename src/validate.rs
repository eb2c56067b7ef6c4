//! Field-level validation shared by the JSON routes and the CSV import
//! pipeline. Every function is pure and returns a labeled message on
//! invalid input; callers decide whether that becomes a 400 or a row error.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

pub const ALLOWED_GL_CODES: [&str; 8] = [
    "7601", // Food
    "7604", // Transportation
    "7606", // Personal Needs
    "7607", // General
    "7101", // Rent/Space
    "7301", // Client Meals
    "7404", // Contracted Outside Services
    "7380", // Supplies
];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
];

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

fn code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z0-9_-]{2,50}$").expect("code regex"))
}

pub fn validate_gl_acct(value: &str) -> Result<String, String> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err("gl_acct is required.".to_string());
    }
    if normalized.len() != 4 || !normalized.chars().all(|c| c.is_ascii_digit()) {
        return Err("gl_acct must be exactly 4 digits.".to_string());
    }
    if !ALLOWED_GL_CODES.contains(&normalized) {
        return Err("gl_acct must be one of the allowed GL codes.".to_string());
    }
    Ok(normalized.to_string())
}

pub fn validate_date(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("date_received is required.".to_string());
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    Err("date_received must be a valid date.".to_string())
}

pub fn validate_quantity(value: Option<f64>) -> Result<f64, String> {
    let num = value.ok_or_else(|| "quantity is required.".to_string())?;
    if !num.is_finite() {
        return Err("quantity must be a number.".to_string());
    }
    Ok(num)
}

pub fn validate_amount(value: Option<f64>) -> Result<f64, String> {
    let num = value.ok_or_else(|| "amount is required.".to_string())?;
    if !num.is_finite() {
        return Err("amount must be a valid number.".to_string());
    }
    Ok((num * 100.0).round() / 100.0)
}

pub fn validate_required_name(value: Option<&str>, label: &str) -> Result<String, String> {
    let normalized = value.unwrap_or("").trim();
    if normalized.is_empty() {
        return Err(format!("{label} is required."));
    }
    if normalized.chars().count() > 100 {
        return Err(format!("{label} must be 100 characters or fewer."));
    }
    Ok(normalized.to_string())
}

pub fn validate_required_string(value: Option<&str>, label: &str, max_length: usize) -> Result<String, String> {
    let normalized = value.unwrap_or("").trim();
    if normalized.is_empty() {
        return Err(format!("{label} is required."));
    }
    if normalized.chars().count() > max_length {
        return Err(format!("{label} must be {max_length} characters or fewer."));
    }
    Ok(normalized.to_string())
}

pub fn validate_optional_string(
    value: Option<&str>,
    label: &str,
    max_length: usize,
) -> Result<Option<String>, String> {
    let normalized = match value {
        Some(v) => v.trim(),
        None => return Ok(None),
    };
    if normalized.is_empty() {
        return Ok(None);
    }
    if normalized.chars().count() > max_length {
        return Err(format!("{label} must be {max_length} characters or fewer."));
    }
    Ok(Some(normalized.to_string()))
}

pub fn validate_required_code(value: Option<&str>, label: &str) -> Result<String, String> {
    let normalized = value.unwrap_or("").trim().to_uppercase();
    if normalized.is_empty() {
        return Err(format!("{label} is required."));
    }
    if !code_regex().is_match(&normalized) {
        return Err(format!(
            "{label} must be 2-50 characters using letters, numbers, hyphens, or underscores."
        ));
    }
    Ok(normalized)
}

pub fn validate_optional_code(value: Option<&str>, label: &str) -> Result<Option<String>, String> {
    let normalized = match value {
        Some(v) => v.trim().to_uppercase(),
        None => return Ok(None),
    };
    if normalized.is_empty() {
        return Ok(None);
    }
    if !code_regex().is_match(&normalized) {
        return Err(format!(
            "{label} must be 2-50 characters using letters, numbers, hyphens, or underscores."
        ));
    }
    Ok(Some(normalized))
}

pub fn validate_optional_state(value: Option<&str>) -> Result<Option<String>, String> {
    let normalized = match value {
        Some(v) => v.trim().to_uppercase(),
        None => return Ok(None),
    };
    if normalized.is_empty() {
        return Ok(None);
    }
    if normalized.len() != 2 || !normalized.chars().all(|c| c.is_ascii_uppercase()) {
        return Err("state must be a 2-letter code.".to_string());
    }
    Ok(Some(normalized))
}

pub fn validate_optional_zip(value: Option<&str>) -> Result<Option<String>, String> {
    let normalized = match value {
        Some(v) => v.trim(),
        None => return Ok(None),
    };
    if normalized.is_empty() {
        return Ok(None);
    }
    if normalized.len() != 5 || !normalized.chars().all(|c| c.is_ascii_digit()) {
        return Err("zip must be exactly 5 digits.".to_string());
    }
    Ok(Some(normalized.to_string()))
}

pub fn validate_optional_email(value: Option<&str>, label: &str) -> Result<Option<String>, String> {
    let email = match validate_optional_string(value, label, 255)? {
        Some(v) => v.to_lowercase(),
        None => return Ok(None),
    };
    if !email_regex().is_match(&email) {
        return Err(format!("{label} must be a valid email address."));
    }
    Ok(Some(email))
}

/// Parses an optional identifier from query/path text; anything non-empty
/// that is not a positive integer is an error.
pub fn validate_optional_id(value: Option<&str>, label: &str) -> Result<Option<i32>, String> {
    let raw = match value {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => return Ok(None),
    };
    match raw.parse::<i32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(format!("{label} must be a positive integer.")),
    }
}

pub fn validate_id(value: Option<&str>, label: &str) -> Result<i32, String> {
    validate_optional_id(value, label)?.ok_or_else(|| format!("{label} is required."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_gate_accepts_only_the_allowed_set() {
        for code in ALLOWED_GL_CODES {
            assert_eq!(validate_gl_acct(code).as_deref(), Ok(code));
        }
        assert!(validate_gl_acct("7602").is_err());
        assert!(validate_gl_acct("9999").is_err());
        assert!(validate_gl_acct("760").is_err());
        assert!(validate_gl_acct("76011").is_err());
        assert!(validate_gl_acct("76a1").is_err());
        assert!(validate_gl_acct("").is_err());
    }

    #[test]
    fn gl_gate_trims_input() {
        assert_eq!(validate_gl_acct(" 7601 ").as_deref(), Ok("7601"));
    }

    #[test]
    fn dates_parse_in_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        for raw in ["2024-01-15", "01/15/2024", "1/15/24", "2024/1/15", "January 15, 2024"] {
            assert_eq!(validate_date(raw), Ok(expected), "failed on {raw:?}");
        }
        assert!(validate_date("").is_err());
        assert!(validate_date("not a date").is_err());
        assert!(validate_date("2024-13-40").is_err());
    }

    #[test]
    fn amount_rounds_to_cents() {
        assert_eq!(validate_amount(Some(10.005)), Ok(10.01));
        assert_eq!(validate_amount(Some(10.0)), Ok(10.0));
        assert!(validate_amount(None).is_err());
        assert!(validate_amount(Some(f64::NAN)).is_err());
    }

    #[test]
    fn optional_string_trims_and_caps() {
        assert_eq!(validate_optional_string(Some("  hi  "), "description", 10), Ok(Some("hi".into())));
        assert_eq!(validate_optional_string(Some("   "), "description", 10), Ok(None));
        assert_eq!(validate_optional_string(None, "description", 10), Ok(None));
        assert!(validate_optional_string(Some("12345678901"), "description", 10).is_err());
    }

    #[test]
    fn codes_are_uppercased_and_shape_checked() {
        assert_eq!(validate_optional_code(Some("food-shelf"), "ministry_code"), Ok(Some("FOOD-SHELF".into())));
        assert_eq!(validate_optional_code(Some(""), "ministry_code"), Ok(None));
        assert!(validate_optional_code(Some("a"), "ministry_code").is_err());
        assert!(validate_optional_code(Some("has space"), "ministry_code").is_err());
        assert!(validate_required_code(None, "organization_code").is_err());
        assert_eq!(validate_required_code(Some("acme_1"), "organization_code"), Ok("ACME_1".into()));
    }

    #[test]
    fn state_and_zip_error_forms_reject_bad_shapes() {
        assert_eq!(validate_optional_state(Some("mn")), Ok(Some("MN".into())));
        assert!(validate_optional_state(Some("Minnesota")).is_err());
        assert_eq!(validate_optional_zip(Some("55401")), Ok(Some("55401".into())));
        assert!(validate_optional_zip(Some("5540")).is_err());
        assert!(validate_optional_zip(Some("55401-1234")).is_err());
    }

    #[test]
    fn strict_email_errors_instead_of_dropping() {
        assert_eq!(
            validate_optional_email(Some("Donor@Example.com"), "email"),
            Ok(Some("donor@example.com".into()))
        );
        assert!(validate_optional_email(Some("nope"), "email").is_err());
        assert_eq!(validate_optional_email(Some(""), "email"), Ok(None));
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(validate_optional_id(Some("12"), "individual_id"), Ok(Some(12)));
        assert_eq!(validate_optional_id(Some(""), "individual_id"), Ok(None));
        assert_eq!(validate_optional_id(None, "individual_id"), Ok(None));
        assert!(validate_optional_id(Some("0"), "individual_id").is_err());
        assert!(validate_optional_id(Some("-3"), "individual_id").is_err());
        assert!(validate_optional_id(Some("abc"), "individual_id").is_err());
        assert!(validate_optional_id(Some("1.5"), "individual_id").is_err());
        assert!(validate_id(None, "donation_id").is_err());
    }
}
