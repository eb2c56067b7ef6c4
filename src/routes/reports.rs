use std::collections::BTreeSet;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::db;
use crate::AppState;

use super::internal_error;

#[derive(Deserialize)]
pub struct ExportParams {
    pub year: Option<i32>,
}

#[derive(Serialize)]
pub struct YearsResponse {
    pub years: Vec<i32>,
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        let escaped = s.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        s.to_string()
    }
}

pub async fn list_available_years(State(state): State<AppState>) -> Response {
    match db::list_donations(&state.db, None, None).await {
        Ok(list) => {
            let mut year_set: BTreeSet<i32> = BTreeSet::new();
            for d in list {
                year_set.insert(d.date_received.year());
            }
            let mut years: Vec<i32> = year_set.into_iter().collect();
            years.reverse();
            Json(YearsResponse { years }).into_response()
        }
        Err(e) => internal_error("Error listing donation years", e),
    }
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Response {
    match db::list_donations(&state.db, None, None).await {
        Ok(list) => {
            let mut w = String::new();
            w.push_str("donation_id,date_received,gl_acct,quantity,amount,total_fair_market_value,description,ministry_code,organization_code,individual_id\n");
            for d in list {
                if let Some(year) = params.year {
                    if d.date_received.year() != year {
                        continue;
                    }
                }
                let date = d.date_received.format("%Y-%m-%d").to_string();
                let description = d.description.clone().unwrap_or_default();
                let ministry = d.ministry_code.clone().unwrap_or_default();
                let organization = d.organization_code.clone().unwrap_or_default();
                let individual = d
                    .individual_id
                    .map(|id| id.to_string())
                    .unwrap_or_default();
                w.push_str(&format!(
                    "{},{},{},{},{},{},{},{},{},{}\n",
                    d.donation_id,
                    csv_escape(&date),
                    csv_escape(&d.gl_acct),
                    d.quantity,
                    format!("{:.2}", d.amount),
                    format!("{:.2}", d.total_fair_market_value),
                    csv_escape(&description),
                    csv_escape(&ministry),
                    csv_escape(&organization),
                    csv_escape(&individual),
                ));
            }

            let mut resp = Response::new(w.into());
            let headers = resp.headers_mut();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            );
            headers.insert(
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment; filename=donations.csv"),
            );
            resp
        }
        Err(e) => internal_error("Error exporting donations", e),
    }
}
