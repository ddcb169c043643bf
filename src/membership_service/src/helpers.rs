use color_eyre::eyre::{Result, WrapErr, eyre};
use membership_adapters::PostgresSettings;
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Connects to PostgreSQL with the configured URL and runs all pending
/// migrations.
pub async fn configure_postgresql(settings: &PostgresSettings) -> Result<PgPool> {
    let url = settings
        .url
        .as_ref()
        .ok_or_else(|| eyre!("postgres.url is not configured"))?;

    let pg_pool = get_postgres_pool(url.expose_secret(), settings.max_connections)
        .await
        .wrap_err("Failed to create Postgres connection pool")?;

    sqlx::migrate!("../../migrations")
        .run(&pg_pool)
        .await
        .wrap_err("Failed to run migrations")?;

    Ok(pg_pool)
}

pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}
