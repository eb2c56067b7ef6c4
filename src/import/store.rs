use std::fmt;

use crate::db::models::{NewDonation, NewIndividual, NewOrganization};
use crate::db::DbConn;

/// Failures surfaced by the import's persistence collaborator. `Conflict`
/// is the unique-violation case the organization-code retry loop keys on;
/// everything else is opaque to the pipeline.
#[derive(Debug)]
pub enum StoreError {
    Conflict(String),
    Other(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Conflict(msg) => write!(f, "{msg}"),
            StoreError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// An existing organization, as preloaded for name-based lookup.
#[derive(Debug, Clone)]
pub struct OrganizationRef {
    pub code: String,
    pub name: String,
}

/// An existing individual with the fields that participate in dedup keys.
#[derive(Debug, Clone)]
pub struct IndividualRef {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub email: Option<String>,
}

/// The relational store as the import pipeline sees it: bulk preloads for
/// the per-batch lookup caches, and single-row inserts returning the
/// generated key. One implementation per backing store; tests use an
/// in-memory one.
pub trait ImportStore {
    fn organizations(&mut self) -> Result<Vec<OrganizationRef>, StoreError>;
    fn individuals(&mut self) -> Result<Vec<IndividualRef>, StoreError>;
    fn individual_emails(&mut self) -> Result<Vec<String>, StoreError>;
    fn insert_organization(&mut self, org: &NewOrganization) -> Result<String, StoreError>;
    fn insert_individual(&mut self, individual: &NewIndividual) -> Result<i32, StoreError>;
    fn insert_donation(&mut self, donation: &NewDonation) -> Result<i32, StoreError>;
}

fn from_pg(err: postgres::Error) -> StoreError {
    let message = err
        .as_db_error()
        .map(|db| db.message().to_string())
        .unwrap_or_else(|| err.to_string());
    if err.code() == Some(&postgres::error::SqlState::UNIQUE_VIOLATION) {
        StoreError::Conflict(message)
    } else {
        StoreError::Other(message)
    }
}

/// Postgres-backed store over a single pooled connection. An import holds
/// one connection for its whole run, so rows persist strictly in order.
pub struct PgStore {
    conn: DbConn,
}

impl PgStore {
    pub fn new(conn: DbConn) -> Self {
        PgStore { conn }
    }
}

impl ImportStore for PgStore {
    fn organizations(&mut self) -> Result<Vec<OrganizationRef>, StoreError> {
        let rows = self
            .conn
            .query(
                "SELECT organization_code, organization_name FROM in_kind_tracker.organization",
                &[],
            )
            .map_err(from_pg)?;
        Ok(rows
            .iter()
            .map(|row| OrganizationRef {
                code: row.get(0),
                name: row.get(1),
            })
            .collect())
    }

    fn individuals(&mut self) -> Result<Vec<IndividualRef>, StoreError> {
        let rows = self
            .conn
            .query(
                "SELECT individual_id, individual_first_name, individual_last_name, address, city, state, zip, email \
                 FROM in_kind_tracker.individual",
                &[],
            )
            .map_err(from_pg)?;
        Ok(rows
            .iter()
            .map(|row| IndividualRef {
                id: row.get(0),
                first_name: row.get(1),
                last_name: row.get(2),
                address: row.get(3),
                city: row.get(4),
                state: row.get(5),
                zip: row.get(6),
                email: row.get(7),
            })
            .collect())
    }

    fn individual_emails(&mut self) -> Result<Vec<String>, StoreError> {
        let rows = self
            .conn
            .query(
                "SELECT LOWER(email) AS email FROM in_kind_tracker.individual WHERE email IS NOT NULL",
                &[],
            )
            .map_err(from_pg)?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    fn insert_organization(&mut self, org: &NewOrganization) -> Result<String, StoreError> {
        let row = self
            .conn
            .query_one(
                "INSERT INTO in_kind_tracker.organization \
                   (organization_code, organization_name, contact_first_name, contact_last_name, address, city, state, zip, contact_email) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                 RETURNING organization_code",
                &[
                    &org.code,
                    &org.name,
                    &org.contact_first_name,
                    &org.contact_last_name,
                    &org.address,
                    &org.city,
                    &org.state,
                    &org.zip,
                    &org.contact_email,
                ],
            )
            .map_err(from_pg)?;
        Ok(row.get(0))
    }

    fn insert_individual(&mut self, individual: &NewIndividual) -> Result<i32, StoreError> {
        let row = self
            .conn
            .query_one(
                "INSERT INTO in_kind_tracker.individual \
                   (individual_first_name, individual_last_name, address, city, state, zip, email) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING individual_id",
                &[
                    &individual.first_name,
                    &individual.last_name,
                    &individual.address,
                    &individual.city,
                    &individual.state,
                    &individual.zip,
                    &individual.email,
                ],
            )
            .map_err(from_pg)?;
        Ok(row.get(0))
    }

    fn insert_donation(&mut self, donation: &NewDonation) -> Result<i32, StoreError> {
        let row = self
            .conn
            .query_one(
                "INSERT INTO in_kind_tracker.donation \
                   (date_received, gl_acct, quantity, amount, description, ministry_code, organization_code, individual_id, user_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                 RETURNING donation_id",
                &[
                    &donation.date_received,
                    &donation.gl_acct,
                    &donation.quantity,
                    &donation.amount,
                    &donation.description,
                    &donation.ministry_code,
                    &donation.organization_code,
                    &donation.individual_id,
                    &donation.user_id,
                ],
            )
            .map_err(from_pg)?;
        Ok(row.get(0))
    }
}
