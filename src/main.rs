use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_manager::config::EnvironmentConfig;
use fleet_manager::database::{self, mask_database_url};
use fleet_manager::repositories::{MemStorage, PgStorage, Storage};
use fleet_manager::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,fleet_manager=debug")),
        )
        .init();

    info!("🚚 Fleet Manager - Gestión de flota");
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("invalid configuration")?;
    info!("⚙️ Entorno: {}", config.environment);

    // Inicializar almacenamiento
    let storage: Arc<dyn Storage> = match config.database_config() {
        Some(db_config) => {
            let pool = match database::create_pool(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            database::run_migrations(&pool).await?;
            info!("🐘 Almacenamiento PostgreSQL: {}", mask_database_url(&db_config.url));
            Arc::new(PgStorage::new(pool))
        }
        None => {
            warn!("⚠️ DATABASE_URL no definida, usando almacenamiento en memoria");
            Arc::new(MemStorage::new())
        }
    };

    if config.seed_sample_data {
        database::seed_sample_data(storage.as_ref())
            .await
            .context("failed to load sample data")?;
    }

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_address()))?;

    let app = create_app(AppState::new(storage, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Vehículos:");
    info!("   GET/POST /api/vehicles - Listar / crear");
    info!("   GET/PATCH/PUT/DELETE /api/vehicles/:id - Detalle / actualizar / eliminar");
    info!("   GET  /api/vehicles/:id/maintenance - Historial de mantenimiento");
    info!("   GET  /api/vehicles/:id/alerts - Alertas del vehículo");
    info!("   POST /api/vehicles/:id/validate - Validar un vehículo");
    info!("   POST /api/vehicles/validate-all - Validar toda la flota");
    info!("🔩 Piezas:");
    info!("   GET/POST /api/parts - Listar / crear");
    info!("   GET/PATCH/PUT/DELETE /api/parts/:id");
    info!("🔧 Mantenimiento:");
    info!("   GET/POST /api/maintenance - Listar / registrar");
    info!("   GET/PATCH/PUT/DELETE /api/maintenance/:id");
    info!("   GET/POST /api/maintenance/:id/parts - Piezas usadas");
    info!("🚨 Alertas:");
    info!("   GET/POST /api/alerts - Listar / crear");
    info!("   PATCH /api/alerts/:id/read - Marcar como leída");
    info!("   DELETE /api/alerts/:id - Eliminar");
    info!("📊 GET  /api/dashboard/stats - Estadísticas");
    info!("💬 POST /api/chat/query - Asistente");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
