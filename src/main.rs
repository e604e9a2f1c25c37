use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use battery_rotation::config::database::DatabaseConfig;
use battery_rotation::config::environment::{EnvironmentConfig, StorageBackend};
use battery_rotation::database::DatabaseConnection;
use battery_rotation::repositories::{FleetStore, MemoryFleetStore, PgFleetStore};
use battery_rotation::{create_app_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🔋 Battery Rotation - núcleo de rotación");
    info!("========================================");

    let config = EnvironmentConfig::from_env()?;

    let store: Arc<dyn FleetStore> = match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let connection = match DatabaseConnection::connect(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(e);
                }
            };
            connection.run_migrations().await?;
            Arc::new(PgFleetStore::new(connection.pool().clone()))
        }
        StorageBackend::Memory => {
            warn!("⚠️ STORAGE=memory: los datos se pierden al reiniciar");
            Arc::new(MemoryFleetStore::new())
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app_router(AppState::new(store, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health");
    info!("   GET    /rotacion/sugerir-bateria/:vehicle_id");
    info!("   POST   /rotacion/asignar");
    info!("   GET    /rotacion/planes | /rotacion/planes/:id");
    info!("   DELETE /rotacion/planes/:id");
    info!("   POST   /registros-uso/iniciar | /registros-uso/:id/finalizar");
    info!("   POST   /sesiones-carga/iniciar | /sesiones-carga/:id/finalizar");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

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
