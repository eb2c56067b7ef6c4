use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::AuthenticatedUser;
use crate::db::models::{DonationUpdate, NewDonation};
use crate::db::{self, DbError};
use crate::import::store::{PgStore, StoreError};
use crate::import::{self, ImportError};
use crate::validate;
use crate::AppState;

use super::{error_json, field_num, field_str, has_field, internal_error};

#[derive(Deserialize)]
pub struct ListParams {
    individual_id: Option<String>,
    organization_code: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let individual_id =
        match validate::validate_optional_id(params.individual_id.as_deref(), "individual_id") {
            Ok(v) => v,
            Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
        };
    let organization_code = match validate::validate_optional_code(
        params.organization_code.as_deref(),
        "organization_code",
    ) {
        Ok(v) => v,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };

    match db::list_donations(&state.db, individual_id, organization_code).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => internal_error("Error listing donations", e),
    }
}

pub async fn get(State(state): State<AppState>, Path(donation_id): Path<String>) -> Response {
    let id = match validate::validate_id(Some(&donation_id), "donation_id") {
        Ok(id) => id,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::get_donation(&state.db, id).await {
        Ok(Some(donation)) => Json(donation).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Donation not found"),
        Err(e) => internal_error("Error fetching donation", e),
    }
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<Value>,
) -> Response {
    let new = match parse_new_donation(&payload, user.user_id()) {
        Ok(new) => new,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };

    match db::create_donation(&state.db, new).await {
        Ok(donation) => (StatusCode::CREATED, Json(donation)).into_response(),
        Err(DbError::ForeignKey(_)) => error_json(
            StatusCode::BAD_REQUEST,
            "Referenced ministry, organization, individual, or user does not exist.",
        ),
        Err(e) => internal_error("Error creating donation", e),
    }
}

fn parse_new_donation(payload: &Value, user_id: Option<i32>) -> Result<NewDonation, String> {
    let date_received =
        validate::validate_date(field_str(payload, "date_received").as_deref().unwrap_or(""))?;
    let gl_acct =
        validate::validate_gl_acct(field_str(payload, "gl_acct").as_deref().unwrap_or(""))?;
    let quantity = validate::validate_quantity(field_num(payload, "quantity"))?;
    let amount = validate::validate_amount(field_num(payload, "amount"))?;
    let description = validate::validate_optional_string(
        field_str(payload, "description").as_deref(),
        "description",
        1000,
    )?;
    let ministry_code = validate::validate_optional_code(
        field_str(payload, "ministry_code").as_deref(),
        "ministry_code",
    )?;
    let organization_code = validate::validate_optional_code(
        field_str(payload, "organization_code").as_deref(),
        "organization_code",
    )?;
    let individual_id = validate::validate_optional_id(
        field_str(payload, "individual_id").as_deref(),
        "individual_id",
    )?;

    Ok(NewDonation {
        date_received,
        gl_acct,
        quantity,
        amount,
        description,
        ministry_code,
        organization_code,
        individual_id,
        user_id,
    })
}

pub async fn update(
    State(state): State<AppState>,
    Path(donation_id): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let id = match validate::validate_id(Some(&donation_id), "donation_id") {
        Ok(id) => id,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };

    let upd = match parse_donation_update(&payload) {
        Ok(upd) => upd,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    if upd.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "No updatable fields provided.");
    }

    match db::update_donation(&state.db, id, upd).await {
        Ok(Some(donation)) => Json(donation).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Donation not found"),
        Err(DbError::ForeignKey(_)) => error_json(
            StatusCode::BAD_REQUEST,
            "Referenced ministry, organization, or individual does not exist.",
        ),
        Err(e) => internal_error("Error updating donation", e),
    }
}

fn parse_donation_update(payload: &Value) -> Result<DonationUpdate, String> {
    let mut upd = DonationUpdate::default();

    if has_field(payload, "date_received") {
        upd.date_received = Some(validate::validate_date(
            field_str(payload, "date_received").as_deref().unwrap_or(""),
        )?);
    }
    if has_field(payload, "gl_acct") {
        upd.gl_acct = Some(validate::validate_gl_acct(
            field_str(payload, "gl_acct").as_deref().unwrap_or(""),
        )?);
    }
    if has_field(payload, "quantity") {
        upd.quantity = Some(validate::validate_quantity(field_num(payload, "quantity"))?);
    }
    if has_field(payload, "amount") {
        upd.amount = Some(validate::validate_amount(field_num(payload, "amount"))?);
    }
    if has_field(payload, "description") {
        upd.description = Some(validate::validate_optional_string(
            field_str(payload, "description").as_deref(),
            "description",
            1000,
        )?);
    }
    if has_field(payload, "ministry_code") {
        upd.ministry_code = Some(validate::validate_optional_code(
            field_str(payload, "ministry_code").as_deref(),
            "ministry_code",
        )?);
    }
    if has_field(payload, "organization_code") {
        upd.organization_code = Some(validate::validate_optional_code(
            field_str(payload, "organization_code").as_deref(),
            "organization_code",
        )?);
    }
    if has_field(payload, "individual_id") {
        upd.individual_id = Some(validate::validate_optional_id(
            field_str(payload, "individual_id").as_deref(),
            "individual_id",
        )?);
    }

    Ok(upd)
}

pub async fn delete(State(state): State<AppState>, Path(donation_id): Path<String>) -> Response {
    let id = match validate::validate_id(Some(&donation_id), "donation_id") {
        Ok(id) => id,
        Err(msg) => return error_json(StatusCode::BAD_REQUEST, &msg),
    };
    match db::delete_donation(&state.db, id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_json(StatusCode::NOT_FOUND, "Donation not found"),
        Err(e) => internal_error("Error deleting donation", e),
    }
}

/// `POST /donation/import`: raw CSV body, 201 with the run summary even
/// when some rows failed. The whole batch runs on one pooled connection on
/// the blocking pool so rows persist strictly in order.
pub async fn import(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: String,
) -> Response {
    let user_id = user.user_id();
    let pool = state.db.clone();

    let result = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            ImportError::Store(StoreError::Other(format!("checkout failed: {e}")))
        })?;
        let mut store = PgStore::new(conn);
        import::run_donation_import(&mut store, &body, user_id)
    })
    .await;

    match result {
        Ok(Ok(summary)) => (StatusCode::CREATED, Json(summary)).into_response(),
        Ok(Err(ImportError::BadRequest(msg))) => error_json(StatusCode::BAD_REQUEST, &msg),
        Ok(Err(ImportError::Store(err))) => internal_error("Error importing donations", err),
        Err(err) => internal_error("Error importing donations", err),
    }
}
