// One-shot daily export runner (invoked by external cron)
// Exit code 0 when the snapshot was persisted locally; forwarding
// failures are recorded but do not fail the run.

mod job;

use anyhow::{Context, Result};
use journeylens_storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "journeylens_export=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("journeylens-export starting...");

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    journeylens_storage::MIGRATOR
        .run(db.pool())
        .await
        .context("Failed to run migrations")?;

    let config = job::ExportConfig::from_env();
    let outcome = job::export_daily_analytics(&db, &config).await?;

    tracing::info!(date = %outcome.date, "Export completed");
    Ok(())
}
