// src/main.rs

use std::net::SocketAddr;
use std::time::Duration;

use ai_assessment::config::Config;
use ai_assessment::routes;
use ai_assessment::state::AppState;
use ai_assessment::store::{self, Dialect};
use sqlx::any::AnyPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (.env included)
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let dialect = Dialect::from_url(&config.database_url)
        .ok_or("DATABASE_URL must be a postgres:// or sqlite: URL")?;

    sqlx::any::install_default_drivers();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match AnyPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Failed to connect to database after 5 retries: {}", e);
                    return Err(e.into());
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected ({:?})", dialect);

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    store::migrate(&pool, dialect).await?;
    tracing::info!("Migrations applied successfully.");

    let addr = config.bind_address;
    let state = AppState {
        pool,
        dialect,
        config,
    };

    let app = routes::create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Peer addresses are recorded with each attempt
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
