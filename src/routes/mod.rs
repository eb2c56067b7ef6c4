//! HTTP resource handlers. Every handler validates with the shared
//! `validate` functions, runs a parameterized query through the `db`
//! helpers, and maps failures to `{ "error": ... }` JSON bodies: 400 for
//! validation and foreign-key problems, 404 for missing rows, 409 for
//! unique conflicts, 500 for everything unexpected.

pub mod donations;
pub mod individuals;
pub mod ministries;
pub mod organizations;
pub mod reports;
pub mod wish_list;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};

pub(crate) fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> Response {
    tracing::error!("{}: {}", context, err);
    error_json(
        StatusCode::INTERNAL_SERVER_ERROR,
        &format!("Internal server error, {err}"),
    )
}

/// Reads a request field as text. Absent and explicit-null both come back
/// as `None`; scalars are coerced the way the UI sometimes sends them
/// (numeric GL codes, numeric ids).
pub(crate) fn field_str(payload: &Value, key: &str) -> Option<String> {
    match payload.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    }
}

/// Reads a request field as a number, tolerating quoted numerics. Anything
/// non-numeric becomes NaN so the validators report the labeled error.
pub(crate) fn field_num(payload: &Value, key: &str) -> Option<f64> {
    match payload.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64().or(Some(f64::NAN)),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                Some(trimmed.parse::<f64>().unwrap_or(f64::NAN))
            }
        }
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(_) => Some(f64::NAN),
    }
}

pub(crate) fn has_field(payload: &Value, key: &str) -> bool {
    payload.get(key).is_some()
}
