//! Conexión a PostgreSQL
//!
//! Creación del pool, migraciones embebidas y helpers de logging.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Crear el pool de conexiones y comprobar que responde
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    tracing::info!("🔌 Conectando a PostgreSQL: {}", mask_database_url(&config.url));

    let pool = config
        .create_pool()
        .await
        .with_context(|| format!("cannot connect to {}", mask_database_url(&config.url)))?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("database did not answer the health query")?;

    tracing::info!(
        "✅ Pool listo (max: {}, min: {})",
        config.max_connections,
        config.min_connections
    );
    Ok(pool)
}

/// Ejecutar las migraciones de `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to run database migrations")?;
    tracing::info!("📦 Migraciones aplicadas");
    Ok(())
}

/// Enmascarar las credenciales de la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..scheme_end], &url[at_pos + 1..])
}
