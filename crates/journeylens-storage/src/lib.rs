// Postgres storage layer with sqlx
//
// This crate owns every query the service issues:
// - Database: pooled connection handle with per-collection CRUD
// - grouped/window aggregations feeding the KPI and conversion math
// - analytics_exports upsert for the daily export job

pub mod models;
pub mod repositories;

pub use models::*;
pub use repositories::Database;

/// Embedded migrations, applied at startup by the binaries.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
