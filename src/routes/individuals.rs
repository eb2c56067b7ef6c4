use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;

use crate::db;
use crate::db::models::{IndividualUpdate, NewIndividual};
use crate::import::store::{PgStore, StoreError};
use crate::import::{self, ImportError};
use crate::validate;
use crate::AppState;

use super::{error_json, field_str, has_field, internal_error};

pub async fn list(State(state): State<AppState>) -> Response {
    match db::list_individuals(&state.db).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Error listing individuals", e),
    }
}

pub async fn get(State(state): State<AppState>, Path(individual_id): Path<String>) -> Response {
    let id = match validate::validate_id(Some(&individual_id), "individual_id") {
        Ok(id) => id,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::get_individual(&state.db, id).await {
        Ok(Some(individual)) => Json(individual).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Individual not found"),
        Err(e) => internal_error("Error fetching individual", e),
    }
}

pub async fn create(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    let new = match parse_new_individual(&payload) {
        Ok(new) => new,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::create_individual(&state.db, new).await {
        Ok(individual) => (StatusCode::CREATED, Json(individual)).into_response(),
        Err(e) => internal_error("Error creating individual", e),
    }
}

fn parse_new_individual(payload: &Value) -> Result<NewIndividual, String> {
    let first_name = validate::validate_required_name(
        field_str(payload, "individual_first_name").as_deref(),
        "individual_first_name",
    )?;
    let last_name = validate::validate_required_name(
        field_str(payload, "individual_last_name").as_deref(),
        "individual_last_name",
    )?;
    let address =
        validate::validate_optional_string(field_str(payload, "address").as_deref(), "address", 255)?;
    let city = validate::validate_optional_string(field_str(payload, "city").as_deref(), "city", 120)?;
    let state = validate::validate_optional_state(field_str(payload, "state").as_deref())?;
    let zip = validate::validate_optional_zip(field_str(payload, "zip").as_deref())?;
    let email = validate::validate_optional_email(field_str(payload, "email").as_deref(), "email")?;

    Ok(NewIndividual {
        first_name,
        last_name,
        address,
        city,
        state,
        zip,
        email,
    })
}

pub async fn update(
    State(state): State<AppState>,
    Path(individual_id): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let id = match validate::validate_id(Some(&individual_id), "individual_id") {
        Ok(id) => id,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };

    let upd = match parse_individual_update(&payload) {
        Ok(upd) => upd,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    if upd.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "No updatable fields provided.");
    }

    match db::update_individual(&state.db, id, upd).await {
        Ok(Some(individual)) => Json(individual).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Individual not found"),
        Err(e) => internal_error("Error updating individual", e),
    }
}

fn parse_individual_update(payload: &Value) -> Result<IndividualUpdate, String> {
    let mut upd = IndividualUpdate::default();

    if has_field(payload, "individual_first_name") {
        upd.first_name = Some(validate::validate_required_name(
            field_str(payload, "individual_first_name").as_deref(),
            "individual_first_name",
        )?);
    }
    if has_field(payload, "individual_last_name") {
        upd.last_name = Some(validate::validate_required_name(
            field_str(payload, "individual_last_name").as_deref(),
            "individual_last_name",
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
        upd.state = Some(validate::validate_optional_state(
            field_str(payload, "state").as_deref(),
        )?);
    }
    if has_field(payload, "zip") {
        upd.zip = Some(validate::validate_optional_zip(
            field_str(payload, "zip").as_deref(),
        )?);
    }
    if has_field(payload, "email") {
        upd.email = Some(validate::validate_optional_email(
            field_str(payload, "email").as_deref(),
            "email",
        )?);
    }

    Ok(upd)
}

pub async fn delete(State(state): State<AppState>, Path(individual_id): Path<String>) -> Response {
    let id = match validate::validate_id(Some(&individual_id), "individual_id") {
        Ok(id) => id,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::delete_individual(&state.db, id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_json(StatusCode::NOT_FOUND, "Individual not found"),
        Err(e) => internal_error("Error deleting individual", e),
    }
}

/// `POST /individual/import`: raw CSV body, duplicate emails tallied under
/// `skipped.email` rather than errored.
pub async fn import(State(state): State<AppState>, body: String) -> Response {
    let pool = state.db.clone();

    let result = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            ImportError::Store(StoreError::Other(format!("checkout failed: {e}")))
        })?;
        let mut store = PgStore::new(conn);
        import::run_individual_import(&mut store, &body)
    })
    .await;

    match result {
        Ok(Ok(summary)) => (StatusCode::CREATED, Json(summary)).into_response(),
        Ok(Err(ImportError::BadRequest(msg))) => error_json(StatusCode::BAD_REQUEST, &msg),
        Ok(Err(ImportError::Store(err))) => internal_error("Error importing individuals", err),
        Err(err) => internal_error("Error importing individuals", err),
    }
}
