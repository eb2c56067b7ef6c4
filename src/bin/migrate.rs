use std::env;
use std::fs;
use std::path::Path;

use postgres::NoTls;
use r2d2::Pool;
use r2d2_postgres::PostgresConnectionManager;

use in_kind_tracker::db;

fn main() -> anyhow::Result<()> {
    // Load .env if it exists
    dotenvy::dotenv().ok();

    println!("Starting database migration...");

    let url = db::database_url()?;
    println!("Connecting to {} (60s timeout)...", db::sanitize_db_url(&url));

    let config: postgres::Config = url
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid database URL: {}", e))?;
    let manager = PostgresConnectionManager::new(config, NoTls);
    let pool = Pool::builder()
        .max_size(1)
        .connection_timeout(std::time::Duration::from_secs(60))
        .build(manager)
        .map_err(|e| anyhow::anyhow!("Failed to create DB pool: {}", e))?;

    let mut conn = pool.get()?;

    // In Docker this will be at /app/migrations/init.sql
    let migration_path =
        env::var("MIGRATION_FILE").unwrap_or_else(|_| "migrations/init.sql".to_string());

    if !Path::new(&migration_path).exists() {
        println!("Migration file not found at: {}", migration_path);
        return Ok(());
    }

    let sql_content = fs::read_to_string(&migration_path)?;

    // The schema uses IF NOT EXISTS throughout, so the whole file can run as
    // one batch and stays idempotent across deploys.
    conn.batch_execute(&sql_content)
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    println!("Migration complete.");
    Ok(())
}
