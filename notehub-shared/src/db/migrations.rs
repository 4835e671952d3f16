/// Database migration runner.
///
/// Migrations live in `notehub-shared/migrations/` and are embedded into
/// the binary with `sqlx::migrate!`, so a deployed server can bring its own
/// schema up to date at startup without shipping SQL files alongside it.
use sqlx::PgPool;
use tracing::{info, warn};

/// Applies all pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!("migration failed: {}", e);
            Err(e)
        }
    }
}
