//! Weathergy - Backend Server
//!
//! Serves sensor-driven weather predictions and reshapes remote forecast
//! series for charting and CSV download.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

use external::PredictionClient;
use services::SensorSource;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sensors: Arc<dyn SensorSource>,
    pub predictions: PredictionClient,
}

impl AppState {
    /// Build collaborators from configuration
    pub fn from_config(config: Config) -> error::AppResult<Self> {
        let sensors = services::sensor::from_config(&config.sensors)?;
        let predictions = PredictionClient::new(
            config.upstream.api_endpoint.clone(),
            Duration::from_secs(config.upstream.timeout_secs),
        )?;

        Ok(Self {
            config: Arc::new(config),
            sensors,
            predictions,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weathergy_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Weathergy Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Prediction API: {}", config.upstream.api_endpoint);

    let addr: SocketAddr = config.bind_address().parse()?;

    // Create application state
    let state = AppState::from_config(config)?;
    tracing::info!("Sensor source: {}", state.sensors.name());

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Weathergy API v1"
}
