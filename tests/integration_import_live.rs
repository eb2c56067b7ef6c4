//! Live-database checks for the import pipeline and donation queries.
//! These need a provisioned Postgres (DATABASE_URL) with the schema from
//! migrations/init.sql applied; run with `cargo test -- --ignored`.

use in_kind_tracker::db;
use in_kind_tracker::import::{self, store::PgStore};

fn unique_marker(prefix: &str) -> String {
    format!("{} {}", prefix, chrono::Utc::now().timestamp_millis())
}

#[tokio::test]
#[ignore = "requires a provisioned Postgres database"]
async fn donation_import_round_trip() {
    std::env::set_var("RUST_ENV", "development");
    let pool = db::init_pool().await.expect("init pool");

    let org_name = unique_marker("Integration Pantry");
    let csv = format!(
        "Date,GL Acct#,Qty,OrgName,Description,Total\n\
         2024-01-15,7601,3,{org_name},winter coats,25.00\n"
    );

    let summary = tokio::task::spawn_blocking({
        let pool = pool.clone();
        move || {
            let conn = pool.get().expect("checkout");
            let mut store = PgStore::new(conn);
            import::run_donation_import(&mut store, &csv, None)
        }
    })
    .await
    .expect("join")
    .expect("import");

    assert_eq!(summary.created, 1, "errors: {:?}", summary.errors);
    assert!(summary.errors.is_empty());

    let orgs = db::list_organizations(&pool)
        .await
        .expect("list organizations");
    let created = orgs
        .iter()
        .find(|o| o.organization_name == org_name)
        .expect("imported organization");

    let donations = db::list_donations(&pool, None, Some(created.organization_code.clone()))
        .await
        .expect("list donations");
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0].gl_acct, "7601");
    assert_eq!(donations[0].quantity, 3.0);
    assert_eq!(donations[0].amount, 25.0);
    assert_eq!(donations[0].total_fair_market_value, 75.0);
    assert_eq!(donations[0].description.as_deref(), Some("winter coats"));
}

#[tokio::test]
#[ignore = "requires a provisioned Postgres database"]
async fn individual_import_skips_existing_emails() {
    std::env::set_var("RUST_ENV", "development");
    let pool = db::init_pool().await.expect("init pool");

    let email = format!(
        "donor{}@integration.example.com",
        chrono::Utc::now().timestamp_millis()
    );
    let csv = format!("first_name,last_name,email\nPat,Doe,{email}\n");

    let run = |csv: String| {
        let pool = pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get().expect("checkout");
            let mut store = PgStore::new(conn);
            import::run_individual_import(&mut store, &csv)
        })
    };

    let first = run(csv.clone()).await.expect("join").expect("import");
    assert_eq!(first.created, 1, "errors: {:?}", first.errors);

    // Same file again: the email now exists in the store.
    let second = run(csv).await.expect("join").expect("import");
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped.email, Some(1));
    assert!(second.errors.is_empty());
}
