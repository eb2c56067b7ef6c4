use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;

use crate::db::models::{NewOrganization, OrganizationUpdate};
use crate::db::{self, DbError};
use crate::validate;
use crate::AppState;

use super::{error_json, field_str, has_field, internal_error};

pub async fn list(State(state): State<AppState>) -> Response {
    match db::list_organizations(&state.db).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Error listing organizations", e),
    }
}

pub async fn get(State(state): State<AppState>, Path(organization_code): Path<String>) -> Response {
    let code = match validate::validate_required_code(Some(&organization_code), "organization_code")
    {
        Ok(code) => code,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::get_organization(&state.db, code).await {
        Ok(Some(org)) => Json(org).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Organization not found"),
        Err(e) => internal_error("Error fetching organization", e),
    }
}

pub async fn create(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let new = match parse_new_organization(&payload) {
        Ok(new) => new,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::create_organization(&state.db, new).await {
        Ok(org) => (StatusCode::CREATED, Json(org)).into_response(),
        Err(DbError::Conflict(_)) => error_json(
            StatusCode::CONFLICT,
            "An organization with that code already exists.",
        ),
        Err(e) => internal_error("Error creating organization", e),
    }
}

fn parse_new_organization(payload: &Value) -> Result<NewOrganization, String> {
    let code = validate::validate_required_code(
        field_str(payload, "organization_code").as_deref(),
        "organization_code",
    )?;
    let name = validate::validate_required_string(
        field_str(payload, "organization_name").as_deref(),
        "organization_name",
        255,
    )?;
    let contact_first_name = validate::validate_optional_string(
        field_str(payload, "contact_first_name").as_deref(),
        "contact_first_name",
        100,
    )?;
    let contact_last_name = validate::validate_optional_string(
        field_str(payload, "contact_last_name").as_deref(),
        "contact_last_name",
        100,
    )?;
    let address =
        validate::validate_optional_string(field_str(payload, "address").as_deref(), "address", 255)?;
    let city = validate::validate_optional_string(field_str(payload, "city").as_deref(), "city", 120)?;
    let state = validate::validate_optional_string(field_str(payload, "state").as_deref(), "state", 50)?;
    let zip = validate::validate_optional_zip(field_str(payload, "zip").as_deref())?;
    let contact_email = validate::validate_optional_email(
        field_str(payload, "contact_email").as_deref(),
        "contact_email",
    )?;

    Ok(NewOrganization {
        code,
        name,
        contact_first_name,
        contact_last_name,
        address,
        city,
        state,
        zip,
        contact_email,
    })
}

pub async fn update(
    State(state): State<AppState>,
    Path(organization_code): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let code = match validate::validate_required_code(Some(&organization_code), "organization_code")
    {
        Ok(code) => code,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };

    let upd = match parse_organization_update(&payload) {
        Ok(upd) => upd,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    if upd.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "No updatable fields provided.");
    }

    match db::update_organization(&state.db, code, upd).await {
        Ok(Some(org)) => Json(org).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Organization not found"),
        Err(DbError::Conflict(_)) => error_json(
            StatusCode::CONFLICT,
            "An organization with that code already exists.",
        ),
        Err(e) => internal_error("Error updating organization", e),
    }
}

fn parse_organization_update(payload: &Value) -> Result<OrganizationUpdate, String> {
    let mut upd = OrganizationUpdate::default();

    if has_field(payload, "organization_name") {
        upd.name = Some(validate::validate_required_string(
            field_str(payload, "organization_name").as_deref(),
            "organization_name",
            255,
        )?);
    }
    if has_field(payload, "contact_first_name") {
        upd.contact_first_name = Some(validate::validate_optional_string(
            field_str(payload, "contact_first_name").as_deref(),
            "contact_first_name",
            100,
        )?);
    }
    if has_field(payload, "contact_last_name") {
        upd.contact_last_name = Some(validate::validate_optional_string(
            field_str(payload, "contact_last_name").as_deref(),
            "contact_last_name",
            100,
        )?);
    }
    if has_field(payload, "address") {
        upd.address = Some(validate::validate_optional_string(
            field_str(payload, "address").as_deref(),
            "address",
            255,
        )?);
    }
    if has_field(payload, "city") {
        upd.city = Some(validate::validate_optional_string(
            field_str(payload, "city").as_deref(),
            "city",
            120,
        )?);
    }
    if has_field(payload, "state") {
        upd.state = Some(validate::validate_optional_string(
            field_str(payload, "state").as_deref(),
            "state",
            50,
        )?);
    }
    if has_field(payload, "zip") {
        upd.zip = Some(validate::validate_optional_zip(
            field_str(payload, "zip").as_deref(),
        )?);
    }
    if has_field(payload, "contact_email") {
        upd.contact_email = Some(validate::validate_optional_email(
            field_str(payload, "contact_email").as_deref(),
            "contact_email",
        )?);
    }

    Ok(upd)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(organization_code): Path<String>,
) -> Response {
    let code = match validate::validate_required_code(Some(&organization_code), "organization_code")
    {
        Ok(code) => code,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::delete_organization(&state.db, code).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_json(StatusCode::NOT_FOUND, "Organization not found"),
        Err(DbError::ForeignKey(msg)) => error_json(StatusCode::BAD_REQUEST, &msg),
        Err(e) => internal_error("Error deleting organization", e),
    }
}
