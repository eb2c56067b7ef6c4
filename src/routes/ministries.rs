use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;

use crate::db::models::{MinistryUpdate, NewMinistry};
use crate::db::{self, DbError};
use crate::validate;
use crate::AppState;

use super::{error_json, field_str, has_field, internal_error};

/// Lenient truthy/falsy parsing for `has_scale`, which the UI sends as a
/// boolean but older imports sent as "yes"/"no" strings.
fn normalize_has_scale(value: Option<&Value>) -> Option<bool> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => {
            let normalized = s.trim().to_lowercase();
            match normalized.as_str() {
                "true" | "1" | "yes" | "y" | "on" => Some(true),
                "false" | "0" | "no" | "n" | "off" => Some(false),
                _ => Some(!normalized.is_empty()),
            }
        }
        Some(Value::Number(n)) => Some(n.as_f64().map(|f| f != 0.0).unwrap_or(true)),
        Some(_) => Some(true),
    }
}

pub async fn list(State(state): State<AppState>) -> Response {
    match db::list_ministries(&state.db).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Error listing ministries", e),
    }
}

pub async fn get(State(state): State<AppState>, Path(ministry_code): Path<String>) -> Response {
    let code = match validate::validate_required_code(Some(&ministry_code), "ministry_code") {
        Ok(code) => code,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::get_ministry(&state.db, code).await {
        Ok(Some(ministry)) => Json(ministry).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Ministry not found"),
        Err(e) => internal_error("Error fetching ministry", e),
    }
}

pub async fn create(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let code = match validate::validate_required_code(
        field_str(&payload, "ministry_code").as_deref(),
        "ministry_code",
    ) {
        Ok(code) => code,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    let name = match validate::validate_required_string(
        field_str(&payload, "ministry_name").as_deref(),
        "ministry_name",
        255,
    ) {
        Ok(name) => name,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    let has_scale = normalize_has_scale(payload.get("has_scale"));

    let new = NewMinistry {
        code,
        name,
        has_scale,
    };
    match db::create_ministry(&state.db, new).await {
        Ok(ministry) => (StatusCode::CREATED, Json(ministry)).into_response(),
        Err(DbError::Conflict(_)) => error_json(
            StatusCode::CONFLICT,
            "A ministry with that code or name already exists.",
        ),
        Err(e) => internal_error("Error creating ministry", e),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(ministry_code): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let code = match validate::validate_required_code(Some(&ministry_code), "ministry_code") {
        Ok(code) => code,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };

    let mut upd = MinistryUpdate::default();
    if has_field(&payload, "ministry_name") {
        upd.name = match validate::validate_required_string(
            field_str(&payload, "ministry_name").as_deref(),
            "ministry_name",
            255,
        ) {
            Ok(name) => Some(name),
            Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
        };
    }
    if has_field(&payload, "has_scale") {
        // An explicit null leaves the column as-is, matching create.
        upd.has_scale = normalize_has_scale(payload.get("has_scale"));
    }

    if upd.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "No updatable fields provided.");
    }

    match db::update_ministry(&state.db, code, upd).await {
        Ok(Some(ministry)) => Json(ministry).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Ministry not found"),
        Err(DbError::Conflict(_)) => error_json(
            StatusCode::CONFLICT,
            "A ministry with that code or name already exists.",
        ),
        Err(e) => internal_error("Error updating ministry", e),
    }
}

pub async fn delete(State(state): State<AppState>, Path(ministry_code): Path<String>) -> Response {
    let code = match validate::validate_required_code(Some(&ministry_code), "ministry_code") {
        Ok(code) => code,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::delete_ministry(&state.db, code).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_json(StatusCode::NOT_FOUND, "Ministry not found"),
        Err(DbError::ForeignKey(msg)) => error_json(StatusCode::BAD_REQUEST, &msg),
        Err(e) => internal_error("Error deleting ministry", e),
    }
}
