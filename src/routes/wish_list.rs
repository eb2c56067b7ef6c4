use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::db::models::{NewWishListItem, WishListUpdate};
use crate::db::{self, DbError};
use crate::validate;
use crate::AppState;

use super::{error_json, field_str, has_field, internal_error};

// "Monitary Donation" is a legacy misspelling still present in stored rows.
const WISH_LIST_TYPES: [&str; 5] = [
    "Capital Item Over 10K",
    "In-kind Item",
    "Volunteer Needs",
    "Monetary Donation",
    "Monitary Donation",
];

const WISH_LIST_STATUSES: [&str; 3] = ["Open Request", "In Progress", "Fulfilled"];

const DEFAULT_STATUS: &str = "Open Request";

fn validate_type(value: Option<&str>) -> Result<String, String> {
    let normalized = value.unwrap_or("").trim();
    if normalized.is_empty() {
        return Err("type is required.".to_string());
    }
    if !WISH_LIST_TYPES.contains(&normalized) {
        return Err(format!("type must be one of: {}", WISH_LIST_TYPES.join(", ")));
    }
    Ok(normalized.to_string())
}

fn validate_status(value: Option<&str>) -> Result<String, String> {
    let normalized = value.unwrap_or("").trim();
    if normalized.is_empty() {
        return Err("status is required.".to_string());
    }
    if !WISH_LIST_STATUSES.contains(&normalized) {
        return Err(format!(
            "status must be one of: {}",
            WISH_LIST_STATUSES.join(", ")
        ));
    }
    Ok(normalized.to_string())
}

#[derive(Deserialize)]
pub struct ListParams {
    ministry_code: Option<String>,
}

pub async fn list(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    let ministry_code = match validate::validate_optional_code(
        params.ministry_code.as_deref(),
        "ministry_code",
    ) {
        Ok(code) => code,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::list_wish_list_items(&state.db, ministry_code).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Error listing wish list items", e),
    }
}

pub async fn get(State(state): State<AppState>, Path(wishlist_id): Path<String>) -> Response {
    let id = match validate::validate_id(Some(&wishlist_id), "wishlist_id") {
        Ok(id) => id,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::get_wish_list_item(&state.db, id).await {
        Ok(Some(item)) => Json(item).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Wish list item not found"),
        Err(e) => internal_error("Error fetching wish list item", e),
    }
}

pub async fn create(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let new = match parse_new_item(&payload) {
        Ok(new) => new,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::create_wish_list_item(&state.db, new).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(DbError::ForeignKey(_)) => error_json(StatusCode::BAD_REQUEST, "Invalid ministry_code."),
        Err(e) => internal_error("Error creating wish list item", e),
    }
}

fn parse_new_item(payload: &Value) -> Result<NewWishListItem, String> {
    let item_name = validate::validate_required_string(
        field_str(payload, "item_name").as_deref(),
        "item_name",
        255,
    )?;
    let ministry_code = validate::validate_required_code(
        field_str(payload, "ministry_code").as_deref(),
        "ministry_code",
    )?;
    let item_type = validate_type(field_str(payload, "type").as_deref())?;
    // Description is free text with no length cap.
    let description = field_str(payload, "description")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let status = match payload.get("status") {
        None | Some(Value::Null) => DEFAULT_STATUS.to_string(),
        _ => validate_status(field_str(payload, "status").as_deref())?,
    };

    Ok(NewWishListItem {
        item_name,
        ministry_code,
        item_type,
        description,
        status,
    })
}

pub async fn update(
    State(state): State<AppState>,
    Path(wishlist_id): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let id = match validate::validate_id(Some(&wishlist_id), "wishlist_id") {
        Ok(id) => id,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };

    let upd = match parse_item_update(&payload) {
        Ok(upd) => upd,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    if upd.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "No updatable fields provided.");
    }

    match db::update_wish_list_item(&state.db, id, upd).await {
        Ok(Some(item)) => Json(item).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Wish list item not found"),
        Err(DbError::ForeignKey(_)) => error_json(StatusCode::BAD_REQUEST, "Invalid ministry_code."),
        Err(e) => internal_error("Error updating wish list item", e),
    }
}

fn parse_item_update(payload: &Value) -> Result<WishListUpdate, String> {
    let mut upd = WishListUpdate::default();

    if has_field(payload, "item_name") {
        upd.item_name = Some(validate::validate_required_string(
            field_str(payload, "item_name").as_deref(),
            "item_name",
            255,
        )?);
    }
    if has_field(payload, "ministry_code") {
        upd.ministry_code = Some(validate::validate_required_code(
            field_str(payload, "ministry_code").as_deref(),
            "ministry_code",
        )?);
    }
    if has_field(payload, "type") {
        upd.item_type = Some(validate_type(field_str(payload, "type").as_deref())?);
    }
    if has_field(payload, "description") {
        upd.description = Some(
            field_str(payload, "description")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        );
    }
    if has_field(payload, "status") {
        upd.status = Some(validate_status(field_str(payload, "status").as_deref())?);
    }

    Ok(upd)
}

pub async fn delete(State(state): State<AppState>, Path(wishlist_id): Path<String>) -> Response {
    let id = match validate::validate_id(Some(&wishlist_id), "wishlist_id") {
        Ok(id) => id,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::delete_wish_list_item(&state.db, id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_json(StatusCode::NOT_FOUND, "Wish list item not found"),
        Err(e) => internal_error("Error deleting wish list item", e),
    }
}
