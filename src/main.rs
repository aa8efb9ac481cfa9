mod config;
mod routes;
mod state;
mod transcripts;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("transcript_backend=debug,tower_http=debug")
        .init();

    // Load configuration - try multiple paths, fall back to defaults
    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    for path in config_paths {
        match Config::load(&path) {
            Ok(cfg) => {
                info!("Loaded configuration from: {}", path);
                config = Some(cfg);
                break;
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {}", path, e);
            }
        }
    }

    let mut config = config.unwrap_or_else(|| {
        info!("No config file found, using defaults");
        Config::default()
    });
    config.apply_env_overrides();

    // Initialize app state
    let app_state = AppState::new(config.clone());
    info!("Transcript roots: {:?}", app_state.transcripts.roots());

    // Build application
    let app = Router::new()
        .merge(routes::create_routes(app_state.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server
    let host: std::net::IpAddr = config.system_config.host.parse()?;
    let addr = SocketAddr::from((host, config.system_config.port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
