use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

fn money_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Alternation is leftmost-first on purpose; the thousands-separated form
    // wins whenever it matches at a position, mirroring the historical
    // importer exactly.
    RE.get_or_init(|| {
        Regex::new(r"-?\d{1,3}(?:,\d{3})*(?:\.\d+)?|-?\d+(?:\.\d+)?").expect("money regex")
    })
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

/// Extracts the first money-looking number from free text, stripping
/// thousands separators. Returns `None` when nothing numeric is found.
pub fn parse_money(value: &str) -> Option<f64> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }
    let matched = money_regex().find(raw)?;
    let normalized = matched.as_str().replace(',', "");
    match normalized.parse::<f64>() {
        Ok(num) if num.is_finite() => Some(num),
        _ => None,
    }
}

/// Lowercases and keeps an email only when it looks like one; anything else
/// is treated as absent rather than an error.
pub fn normalize_optional_email(value: &str) -> Option<String> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }
    if email_regex().is_match(&trimmed) {
        Some(trimmed)
    } else {
        None
    }
}

/// Keeps a zip only when it is exactly five digits; otherwise absent.
pub fn normalize_optional_zip(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.len() == 5 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

const CODE_BASE_MAX: usize = 46;
const CODE_MAX: usize = 50;

/// Derives a fresh organization code from a display name: uppercase, runs of
/// non-alphanumerics collapsed to `_`, trimmed, capped at 46 chars, `ORG`
/// when nothing survives. Suffixes `_1`, `_2`, ... (truncating the base to
/// stay within 50) until the candidate avoids every code in `used`.
pub fn make_organization_code(name: &str, used: &HashSet<String>) -> String {
    let mut base = String::new();
    let mut last_was_sep = false;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            base.push(c.to_ascii_uppercase());
            last_was_sep = false;
        } else if !last_was_sep {
            base.push('_');
            last_was_sep = true;
        }
    }
    let mut base = base.trim_matches('_').to_string();
    if base.is_empty() {
        base = "ORG".to_string();
    }
    if base.len() > CODE_BASE_MAX {
        base.truncate(CODE_BASE_MAX);
    }

    let mut candidate = base.clone();
    let mut suffix = 1u32;
    while used.contains(&candidate) {
        let suffix_str = format!("_{suffix}");
        let keep = CODE_MAX - suffix_str.len();
        let head: String = base.chars().take(keep).collect();
        candidate = format!("{head}{suffix_str}");
        suffix += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_money_handles_currency_text() {
        assert_eq!(parse_money("$1,234.50"), Some(1234.5));
        assert_eq!(parse_money("approx 40 dollars"), Some(40.0));
        assert_eq!(parse_money("-12.5"), Some(-12.5));
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("   "), None);
        assert_eq!(parse_money("abc"), None);
    }

    #[test]
    fn parse_money_keeps_historical_alternation_order() {
        // Four unseparated digits only match the 1-3 digit alternative first.
        assert_eq!(parse_money("1234.5"), Some(123.0));
        assert_eq!(parse_money("1,234.5"), Some(1234.5));
    }

    #[test]
    fn optional_email_is_lenient() {
        assert_eq!(
            normalize_optional_email("  Donor@Example.COM "),
            Some("donor@example.com".to_string())
        );
        assert_eq!(normalize_optional_email("not-an-email"), None);
        assert_eq!(normalize_optional_email("a b@c.d"), None);
        assert_eq!(normalize_optional_email(""), None);
    }

    #[test]
    fn optional_zip_requires_five_digits() {
        assert_eq!(normalize_optional_zip(" 55401 "), Some("55401".to_string()));
        assert_eq!(normalize_optional_zip("5540"), None);
        assert_eq!(normalize_optional_zip("55401-1234"), None);
        assert_eq!(normalize_optional_zip(""), None);
    }

    #[test]
    fn organization_code_slugifies() {
        let used = HashSet::new();
        assert_eq!(make_organization_code("Acme Pantry", &used), "ACME_PANTRY");
        assert_eq!(make_organization_code("St. Mary's #2", &used), "ST_MARY_S_2");
        assert_eq!(make_organization_code("  --  ", &used), "ORG");
    }

    #[test]
    fn organization_code_caps_base_length() {
        let used = HashSet::new();
        let long = "X".repeat(80);
        assert_eq!(make_organization_code(&long, &used).len(), 46);
    }

    #[test]
    fn organization_code_suffixes_on_collision() {
        let mut used = HashSet::new();
        used.insert("ACME_FOOD_BANK".to_string());
        assert_eq!(make_organization_code("Acme Food Bank", &used), "ACME_FOOD_BANK_1");
        used.insert("ACME_FOOD_BANK_1".to_string());
        assert_eq!(make_organization_code("Acme Food Bank", &used), "ACME_FOOD_BANK_2");
    }

    #[test]
    fn organization_code_suffix_truncates_to_fit() {
        let mut used = HashSet::new();
        let long = "Y".repeat(60);
        let first = make_organization_code(&long, &used);
        used.insert(first.clone());
        let second = make_organization_code(&long, &used);
        assert!(second.len() <= 50);
        assert!(second.ends_with("_1"));
    }
}
