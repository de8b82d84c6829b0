use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Versioned schema for the meal catalog, embedded from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Bring the `meals` schema up to date. Applied versions are tracked in
/// `_sqlx_migrations`, so this is safe to run on every start.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default();
    info!(migrations = MIGRATOR.iter().count(), latest, "Applying meal catalog schema");
    MIGRATOR.run(pool).await?;
    info!(latest, "Meal catalog schema is current");
    Ok(())
}
