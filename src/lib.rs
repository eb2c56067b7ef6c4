pub mod auth;
pub mod db;
pub mod import;
pub mod routes;
pub mod validate;

use db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
}
