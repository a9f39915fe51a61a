//! GS Coach
//!
//! MCP server for client records, meal plans and training plans.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use gs_coach::config::AppConfig;
use gs_coach::db::{migrations, Database};
use gs_coach::mcp::GsCoachService;
use gs_coach::build_info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stderr only, stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gs_coach=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = AppConfig::from_env();
    tracing::info!(
        database = %config.database_path.display(),
        exports = %config.export_dir.display(),
        "Loaded configuration"
    );

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(&config.export_dir)?;

    let database = Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        if migrations::needs_migration(conn)? {
            tracing::info!("Database schema out of date, migrating");
        }
        migrations::run_migrations(conn)?;
        let version = migrations::get_schema_version(conn)?;
        tracing::info!(version, "Database ready");
        Ok(())
    })?;

    let service = GsCoachService::new(&config, database);

    tracing::info!("Starting MCP server on stdio");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
