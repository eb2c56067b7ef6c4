//! CSV import pipeline for donations and individuals.
//!
//! Both imports share the same row lifecycle: tokenize, blank-check, map
//! columns through header aliases, validate fields, resolve the donor, and
//! persist one row at a time. A bad row is recorded in a bounded error list
//! and never aborts the batch; only structural problems (empty body, missing
//! required headers) fail the whole import up front.

pub mod csv;
pub mod donors;
pub mod fields;
pub mod headers;
pub mod store;

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::db::models::{NewDonation, NewIndividual};
use crate::validate;
use donors::{DonorCache, DonorIdentity, ResolvedDonor};
use headers::{DonationColumns, IndividualColumns};
use store::{ImportStore, StoreError};

const DONATION_ERROR_CAP: usize = 50;
const INDIVIDUAL_ERROR_CAP: usize = 20;

/// What one import run did. Partial success is the intended UX: the HTTP
/// layer serializes this with 201 even when `errors` is non-empty, and the
/// caller inspects `errors`/`skipped` instead of treating them as failure.
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub created: u32,
    pub skipped: SkippedRows,
    pub errors: Vec<RowError>,
    pub total: u32,
}

/// Rows set aside without being errors. `email` only appears for the
/// individual import, which suppresses duplicates by address.
#[derive(Debug, Serialize)]
pub struct SkippedRows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<u32>,
    pub blank: u32,
}

#[derive(Debug, Serialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

/// Failures that abort the import before any row is processed.
#[derive(Debug)]
pub enum ImportError {
    /// The CSV itself is unusable; maps to HTTP 400.
    BadRequest(String),
    /// The store failed while preloading lookup caches; maps to HTTP 500.
    Store(StoreError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::BadRequest(msg) => write!(f, "{msg}"),
            ImportError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ImportError {}

/// Runs a donation import over raw CSV text. Rows are processed strictly in
/// order on the caller's connection; the donor cache assumes single-writer
/// semantics within the batch.
pub fn run_donation_import<S: ImportStore>(
    store: &mut S,
    csv_text: &str,
    user_id: Option<i32>,
) -> Result<ImportSummary, ImportError> {
    if csv_text.trim().is_empty() {
        return Err(ImportError::BadRequest("CSV body is required.".to_string()));
    }
    let rows = csv::parse_csv_text(csv_text);
    if rows.is_empty() {
        return Err(ImportError::BadRequest(
            "CSV file appears to be empty.".to_string(),
        ));
    }

    let normalized_headers: Vec<String> =
        rows[0].iter().map(|h| headers::normalize_header(h)).collect();
    let header_count = normalized_headers.len();
    let cols = DonationColumns::resolve(&normalized_headers);
    cols.check_required().map_err(ImportError::BadRequest)?;

    let mut cache = DonorCache::load(store).map_err(ImportError::Store)?;

    let mut summary = ImportSummary {
        created: 0,
        skipped: SkippedRows { email: None, blank: 0 },
        errors: Vec::new(),
        total: (rows.len() - 1) as u32,
    };

    for (i, raw_row) in rows.iter().enumerate().skip(1) {
        let trimmed: Vec<String> = raw_row.iter().map(|v| v.trim().to_string()).collect();
        if trimmed.iter().all(|v| v.is_empty()) {
            summary.skipped.blank += 1;
            continue;
        }

        let row_values = recover_unquoted_description(&cols, header_count, raw_row, &trimmed);
        let row_values = pad_row(row_values, header_count);

        match import_donation_row(store, &mut cache, &cols, &row_values, user_id) {
            Ok(()) => summary.created += 1,
            Err(error) => {
                // Row numbers are 1-based and include the header line.
                if summary.errors.len() < DONATION_ERROR_CAP {
                    summary.errors.push(RowError { row: i + 1, error });
                }
            }
        }
    }

    Ok(summary)
}

/// Rejoins a free-text description that an unquoted export split across
/// extra columns. Applies only when the description column sits before a
/// trailing amount column and the row carries more fields than the header:
/// everything between the description start and the final field becomes one
/// comma-joined description. The policy is heuristic but deliberate; it is
/// kept isolated here so it can be revisited without touching validation.
fn recover_unquoted_description(
    cols: &DonationColumns,
    header_count: usize,
    raw_row: &[String],
    trimmed: &[String],
) -> Vec<String> {
    let Some(desc_idx) = cols.description else {
        return raw_row.to_vec();
    };
    if cols.total != Some(header_count - 1) || trimmed.len() <= header_count {
        return raw_row.to_vec();
    }

    let amount_value = trimmed[trimmed.len() - 1].clone();
    let mut rebuilt: Vec<String> = trimmed[..desc_idx].to_vec();
    rebuilt.push(trimmed[desc_idx..trimmed.len() - 1].join(","));
    rebuilt.push(amount_value);
    rebuilt
}

fn pad_row(mut values: Vec<String>, header_count: usize) -> Vec<String> {
    while values.len() < header_count {
        values.push(String::new());
    }
    values
}

fn import_donation_row<S: ImportStore>(
    store: &mut S,
    cache: &mut DonorCache,
    cols: &DonationColumns,
    values: &[String],
    user_id: Option<i32>,
) -> Result<(), String> {
    let get = |idx: Option<usize>| -> &str {
        idx.and_then(|i| values.get(i)).map(String::as_str).unwrap_or("")
    };

    let date_received = validate::validate_date(get(cols.date))?;

    // A present-but-malformed GL value does not fall back to the category
    // column; only a missing or empty one does.
    let gl_raw = get(cols.gl_acct);
    let gl_source = if gl_raw.is_empty() { get(cols.category) } else { gl_raw };
    let gl_acct = validate::validate_gl_acct(gl_source)?;

    let qty_parsed = fields::parse_money(get(cols.quantity))
        .or_else(|| fields::parse_money(get(cols.pounds)));
    let quantity = validate::validate_quantity(Some(qty_parsed.unwrap_or(1.0)))?;

    // Amount chain: explicit total column, else a number buried in the
    // description, else zero.
    let amount_parsed = fields::parse_money(get(cols.total))
        .or_else(|| fields::parse_money(get(cols.description)))
        .unwrap_or(0.0);
    let amount = validate::validate_amount(Some(amount_parsed))?;

    let description =
        validate::validate_optional_string(Some(get(cols.description)), "description", 1000)?;

    let anonymous_flag = get(cols.anonymous).trim().to_lowercase();
    let is_anonymous = anonymous_flag == "y" || anonymous_flag == "yes";

    let donor = if is_anonymous {
        ResolvedDonor::default()
    } else {
        let identity = DonorIdentity::from_row(cols, values);
        cache.resolve(store, &identity)?
    };

    let donation = NewDonation {
        date_received,
        gl_acct,
        quantity,
        amount,
        description,
        ministry_code: None,
        organization_code: donor.organization_code,
        individual_id: donor.individual_id,
        user_id,
    };
    store.insert_donation(&donation).map_err(|e| e.to_string())?;
    Ok(())
}

enum IndividualRowOutcome {
    Created { email: Option<String> },
    DuplicateEmail,
}

/// Runs an individual import over raw CSV text. Duplicate suppression is by
/// email only: a row whose email already exists in the store, or appeared
/// earlier in the same file, is tallied under `skipped.email`.
pub fn run_individual_import<S: ImportStore>(
    store: &mut S,
    csv_text: &str,
) -> Result<ImportSummary, ImportError> {
    if csv_text.trim().is_empty() {
        return Err(ImportError::BadRequest("CSV body is required.".to_string()));
    }
    let rows = csv::parse_csv_text(csv_text);
    if rows.is_empty() {
        return Err(ImportError::BadRequest(
            "CSV file appears to be empty.".to_string(),
        ));
    }

    let normalized_headers: Vec<String> =
        rows[0].iter().map(|h| headers::normalize_header(h)).collect();
    let cols = IndividualColumns::resolve(&normalized_headers);
    cols.check_required().map_err(ImportError::BadRequest)?;

    let mut known_emails: HashSet<String> = store
        .individual_emails()
        .map_err(ImportError::Store)?
        .into_iter()
        .collect();

    let mut summary = ImportSummary {
        created: 0,
        skipped: SkippedRows { email: Some(0), blank: 0 },
        errors: Vec::new(),
        total: (rows.len() - 1) as u32,
    };

    for (i, raw_row) in rows.iter().enumerate().skip(1) {
        let trimmed: Vec<String> = raw_row.iter().map(|v| v.trim().to_string()).collect();
        if trimmed.iter().all(|v| v.is_empty()) {
            summary.skipped.blank += 1;
            continue;
        }

        match import_individual_row(store, &cols, &trimmed, &known_emails) {
            Ok(IndividualRowOutcome::Created { email }) => {
                summary.created += 1;
                if let Some(email) = email {
                    known_emails.insert(email);
                }
            }
            Ok(IndividualRowOutcome::DuplicateEmail) => {
                if let Some(count) = summary.skipped.email.as_mut() {
                    *count += 1;
                }
            }
            Err(error) => {
                if summary.errors.len() < INDIVIDUAL_ERROR_CAP {
                    summary.errors.push(RowError { row: i + 1, error });
                }
            }
        }
    }

    Ok(summary)
}

fn import_individual_row<S: ImportStore>(
    store: &mut S,
    cols: &IndividualColumns,
    values: &[String],
    known_emails: &HashSet<String>,
) -> Result<IndividualRowOutcome, String> {
    let get = |idx: Option<usize>| -> Option<&str> {
        idx.and_then(|i| values.get(i)).map(String::as_str)
    };

    let first_name = validate::validate_required_name(get(cols.first_name), "individual_first_name")?;
    let last_name = validate::validate_required_name(get(cols.last_name), "individual_last_name")?;
    let address = validate::validate_optional_string(get(cols.address), "address", 255)?;
    let city = validate::validate_optional_string(get(cols.city), "city", 120)?;
    let state = validate::validate_optional_state(get(cols.state))?;
    let zip = validate::validate_optional_zip(get(cols.zip))?;
    let email = validate::validate_optional_email(get(cols.email), "email")?;

    if let Some(email) = email.as_deref() {
        if known_emails.contains(email) {
            return Ok(IndividualRowOutcome::DuplicateEmail);
        }
    }

    let individual = NewIndividual {
        first_name,
        last_name,
        address,
        city,
        state,
        zip,
        email: email.clone(),
    };
    store.insert_individual(&individual).map_err(|e| e.to_string())?;
    Ok(IndividualRowOutcome::Created { email })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::store::{ImportStore, IndividualRef, OrganizationRef, StoreError};
    use super::*;
    use crate::db::models::{NewDonation, NewIndividual, NewOrganization};

    /// In-memory stand-in for the relational store. `conflict_codes`
    /// simulates a concurrent writer owning codes this batch has never seen.
    #[derive(Default)]
    struct MemStore {
        organizations: Vec<NewOrganization>,
        individuals: Vec<NewIndividual>,
        donations: Vec<NewDonation>,
        conflict_codes: HashSet<String>,
        fail_donation_inserts: bool,
    }

    impl ImportStore for MemStore {
        fn organizations(&mut self) -> Result<Vec<OrganizationRef>, StoreError> {
            Ok(self
                .organizations
                .iter()
                .map(|org| OrganizationRef {
                    code: org.code.clone(),
                    name: org.name.clone(),
                })
                .collect())
        }

        fn individuals(&mut self) -> Result<Vec<IndividualRef>, StoreError> {
            Ok(self
                .individuals
                .iter()
                .enumerate()
                .map(|(idx, ind)| IndividualRef {
                    id: idx as i32 + 1,
                    first_name: ind.first_name.clone(),
                    last_name: ind.last_name.clone(),
                    address: ind.address.clone(),
                    city: ind.city.clone(),
                    state: ind.state.clone(),
                    zip: ind.zip.clone(),
                    email: ind.email.clone(),
                })
                .collect())
        }

        fn individual_emails(&mut self) -> Result<Vec<String>, StoreError> {
            Ok(self
                .individuals
                .iter()
                .filter_map(|ind| ind.email.as_deref())
                .map(|email| email.to_lowercase())
                .collect())
        }

        fn insert_organization(&mut self, org: &NewOrganization) -> Result<String, StoreError> {
            if self.conflict_codes.contains(&org.code)
                || self.organizations.iter().any(|o| o.code == org.code)
            {
                return Err(StoreError::Conflict(format!(
                    "duplicate key value violates unique constraint: {}",
                    org.code
                )));
            }
            self.organizations.push(org.clone());
            Ok(org.code.clone())
        }

        fn insert_individual(&mut self, individual: &NewIndividual) -> Result<i32, StoreError> {
            self.individuals.push(individual.clone());
            Ok(self.individuals.len() as i32)
        }

        fn insert_donation(&mut self, donation: &NewDonation) -> Result<i32, StoreError> {
            if self.fail_donation_inserts {
                return Err(StoreError::Other("insert failed".to_string()));
            }
            self.donations.push(donation.clone());
            Ok(self.donations.len() as i32)
        }
    }

    #[test]
    fn minimal_donation_csv_creates_donation_and_organization() {
        let mut store = MemStore::default();
        let csv = "Date,GL Acct#,Qty,OrgName\n2024-01-15,7601,3,Acme Pantry\n";
        let summary = run_donation_import(&mut store, csv, Some(7)).expect("import");

        assert_eq!(summary.created, 1);
        assert_eq!(summary.total, 1);
        assert!(summary.errors.is_empty());
        assert_eq!(summary.skipped.blank, 0);
        assert!(summary.skipped.email.is_none());

        let donation = &store.donations[0];
        assert_eq!(donation.gl_acct, "7601");
        assert_eq!(donation.quantity, 3.0);
        assert_eq!(donation.amount, 0.0);
        assert_eq!(
            donation.date_received,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(donation.organization_code.as_deref(), Some("ACME_PANTRY"));
        assert_eq!(donation.individual_id, None);
        assert_eq!(donation.user_id, Some(7));

        assert_eq!(store.organizations.len(), 1);
        assert_eq!(store.organizations[0].code, "ACME_PANTRY");
        assert_eq!(store.organizations[0].name, "Acme Pantry");
    }

    #[test]
    fn importing_the_same_file_twice_reuses_the_organization() {
        let mut store = MemStore::default();
        let csv = "Date,GL Acct#,Qty,OrgName\n2024-01-15,7601,3,Acme Pantry\n";

        run_donation_import(&mut store, csv, None).expect("first import");
        run_donation_import(&mut store, csv, None).expect("second import");

        assert_eq!(store.organizations.len(), 1);
        assert_eq!(store.donations.len(), 2);
        assert_eq!(
            store.donations[1].organization_code,
            store.donations[0].organization_code
        );
    }

    #[test]
    fn same_organization_across_rows_resolves_from_the_batch_cache() {
        let mut store = MemStore::default();
        let csv = "Date,GL Acct#,Qty,OrgName\n\
                   2024-01-15,7601,3,Acme Pantry\n\
                   2024-01-16,7604,1,Acme Pantry\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 2);
        assert_eq!(store.organizations.len(), 1);
    }

    #[test]
    fn colliding_slug_gets_a_suffix_without_touching_the_existing_code() {
        let mut store = MemStore::default();
        store.organizations.push(NewOrganization {
            code: "ACME_FOOD_BANK".to_string(),
            name: "The Acme Food Bank Trust".to_string(),
            contact_first_name: None,
            contact_last_name: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            contact_email: None,
        });

        // Different name, same slug base.
        let csv = "Date,GL Acct#,Qty,OrgName\n2024-01-15,7601,3,Acme food-bank\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 1);
        assert!(summary.errors.is_empty());
        assert_eq!(
            store.donations[0].organization_code.as_deref(),
            Some("ACME_FOOD_BANK_1")
        );
    }

    #[test]
    fn unique_violation_from_a_concurrent_writer_retries_with_a_suffix() {
        let mut store = MemStore::default();
        // The batch cache has never seen this code, but the insert conflicts.
        store.conflict_codes.insert("ACME_PANTRY".to_string());

        let csv = "Date,GL Acct#,Qty,OrgName\n2024-01-15,7601,3,Acme Pantry\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 1);
        assert!(summary.errors.is_empty());
        assert_eq!(
            store.donations[0].organization_code.as_deref(),
            Some("ACME_PANTRY_1")
        );
    }

    #[test]
    fn exhausted_code_retries_become_a_row_error() {
        let mut store = MemStore::default();
        for code in [
            "ACME_PANTRY",
            "ACME_PANTRY_1",
            "ACME_PANTRY_2",
            "ACME_PANTRY_3",
            "ACME_PANTRY_4",
        ] {
            store.conflict_codes.insert(code.to_string());
        }

        let csv = "Date,GL Acct#,Qty,OrgName\n2024-01-15,7601,3,Acme Pantry\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 0);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].error.contains("Acme Pantry"));
        assert!(store.donations.is_empty());
    }

    #[test]
    fn error_list_is_capped_at_fifty_for_donations() {
        let mut store = MemStore::default();
        let mut csv = String::from("Date,GL Acct#,Qty,OrgName\n");
        for i in 0..999 {
            csv.push_str(&format!("2024-01-15,9999,{i},Acme Pantry\n"));
        }
        let summary = run_donation_import(&mut store, &csv, None).expect("import");

        assert_eq!(summary.created, 0);
        assert_eq!(summary.total, 999);
        assert_eq!(summary.errors.len(), 50);
        // Row numbers are 1-based and include the header.
        assert_eq!(summary.errors[0].row, 2);
    }

    #[test]
    fn anonymous_rows_never_create_donors() {
        let mut store = MemStore::default();
        let csv = "Date,GL Acct#,Qty,OrgName,First Name,Last Name,Anonymous\n\
                   2024-01-15,7601,3,Acme Pantry,Pat,Doe,Y\n\
                   2024-01-16,7604,1,,Pat,Doe,yes\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 2);
        assert!(store.organizations.is_empty());
        assert!(store.individuals.is_empty());
        for donation in &store.donations {
            assert_eq!(donation.organization_code, None);
            assert_eq!(donation.individual_id, None);
        }
    }

    #[test]
    fn individual_donors_dedupe_by_email_then_composite_key() {
        let mut store = MemStore::default();
        let csv = "Date,GL Acct#,Qty,First Name,Last Name,Email\n\
                   2024-01-15,7601,1,Pat,Doe,pat@example.com\n\
                   2024-01-16,7604,2,Pat,Doe,PAT@example.com\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 2);
        assert_eq!(store.individuals.len(), 1);
        assert_eq!(store.donations[0].individual_id, store.donations[1].individual_id);
    }

    #[test]
    fn blank_rows_are_tallied_not_errored() {
        let mut store = MemStore::default();
        let csv = "Date,GL Acct#,Qty,OrgName\n,,,\n2024-01-15,7601,3,Acme Pantry\n   ,,,\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped.blank, 2);
        assert!(summary.errors.is_empty());
        assert_eq!(summary.total, 3);
    }

    #[test]
    fn missing_required_headers_aborts_before_any_row() {
        let mut store = MemStore::default();
        let csv = "Qty,OrgName\n3,Acme Pantry\n";
        let err = run_donation_import(&mut store, csv, None).unwrap_err();
        match err {
            ImportError::BadRequest(msg) => assert!(msg.contains("Date")),
            other => panic!("expected BadRequest, got {other:?}"),
        }
        assert!(store.donations.is_empty());
    }

    #[test]
    fn empty_body_is_a_structural_error() {
        let mut store = MemStore::default();
        assert!(matches!(
            run_donation_import(&mut store, "   \n  ", None),
            Err(ImportError::BadRequest(_))
        ));
    }

    #[test]
    fn amount_falls_back_from_total_to_description_to_zero() {
        let mut store = MemStore::default();
        let csv = "Date,GL Acct#,Qty,Description,Total\n\
                   2024-01-15,7601,1,canned goods,\"$1,234.50\"\n\
                   2024-01-16,7604,1,approx 40 dollars of coats,\n\
                   2024-01-17,7606,1,winter coats,\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 3);
        assert_eq!(store.donations[0].amount, 1234.5);
        assert_eq!(store.donations[1].amount, 40.0);
        assert_eq!(store.donations[2].amount, 0.0);
    }

    #[test]
    fn quantity_falls_back_to_pounds_then_one() {
        let mut store = MemStore::default();
        let csv = "Date,GL Acct#,Qty,Pounds,OrgName\n\
                   2024-01-15,7601,,12,Acme Pantry\n\
                   2024-01-16,7604,,,Acme Pantry\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 2);
        assert_eq!(store.donations[0].quantity, 12.0);
        assert_eq!(store.donations[1].quantity, 1.0);
    }

    #[test]
    fn category_column_backs_a_missing_gl_column() {
        let mut store = MemStore::default();
        let csv = "Date,Category,Qty\n2024-01-15,7301,2\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 1);
        assert_eq!(store.donations[0].gl_acct, "7301");
    }

    #[test]
    fn unquoted_description_commas_are_rejoined_before_the_trailing_total() {
        let mut store = MemStore::default();
        let csv = "Date,GL Acct#,Qty,Description,Total\n\
                   2024-01-15,7601,2,Bread, rolls, and bagels,10.00\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 1, "errors: {:?}", summary.errors);
        let donation = &store.donations[0];
        assert_eq!(donation.description.as_deref(), Some("Bread,rolls,and bagels"));
        assert_eq!(donation.amount, 10.0);
    }

    #[test]
    fn persistence_failures_are_row_errors_not_batch_failures() {
        let mut store = MemStore {
            fail_donation_inserts: true,
            ..MemStore::default()
        };
        let csv = "Date,GL Acct#,Qty\n2024-01-15,7601,3\n2024-01-16,7604,1\n";
        let summary = run_donation_import(&mut store, csv, None).expect("import");

        assert_eq!(summary.created, 0);
        assert_eq!(summary.errors.len(), 2);
        assert!(summary.errors[0].error.contains("insert failed"));
    }

    #[test]
    fn individual_import_creates_rows_and_suppresses_duplicate_emails() {
        let mut store = MemStore::default();
        store.individuals.push(NewIndividual {
            first_name: "Sam".to_string(),
            last_name: "Prior".to_string(),
            address: None,
            city: None,
            state: None,
            zip: None,
            email: Some("sam@example.com".to_string()),
        });

        let csv = "first_name,last_name,email\n\
                   Pat,Doe,pat@example.com\n\
                   Sam,Prior,SAM@example.com\n\
                   Pat,Again,pat@example.com\n\
                   Lee,Quiet,\n";
        let summary = run_individual_import(&mut store, csv).expect("import");

        assert_eq!(summary.created, 2);
        assert_eq!(summary.skipped.email, Some(2));
        assert_eq!(summary.skipped.blank, 0);
        assert_eq!(summary.total, 4);
        assert!(summary.errors.is_empty());
        // Pre-existing + Pat + Lee.
        assert_eq!(store.individuals.len(), 3);
    }

    #[test]
    fn individual_import_requires_both_name_headers() {
        let mut store = MemStore::default();
        let csv = "first_name,email\nPat,pat@example.com\n";
        assert!(matches!(
            run_individual_import(&mut store, csv),
            Err(ImportError::BadRequest(_))
        ));
    }

    #[test]
    fn individual_error_list_is_capped_at_twenty() {
        let mut store = MemStore::default();
        let mut csv = String::from("first_name,last_name,zip\n");
        for _ in 0..30 {
            csv.push_str("Pat,Doe,bad-zip\n");
        }
        let summary = run_individual_import(&mut store, &csv).expect("import");

        assert_eq!(summary.created, 0);
        assert_eq!(summary.total, 30);
        assert_eq!(summary.errors.len(), 20);
        assert!(summary.errors[0].error.contains("zip"));
    }

    #[test]
    fn individual_rows_missing_a_name_are_errors() {
        let mut store = MemStore::default();
        let csv = "first_name,last_name\nPat,\n,Doe\nPat,Doe\n";
        let summary = run_individual_import(&mut store, csv).expect("import");

        assert_eq!(summary.created, 1);
        assert_eq!(summary.errors.len(), 2);
        assert!(summary.errors[0].error.contains("individual_last_name"));
        assert!(summary.errors[1].error.contains("individual_first_name"));
    }
}
