//! Route definitions for the Weathergy API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{error::AppError, handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/weather", weather_routes())
        .fallback(not_found)
}

/// Weather routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/prediction", get(handlers::get_prediction))
        .route("/conditions", post(handlers::infer_conditions))
        .route("/forecast", get(handlers::get_forecast))
        .route("/forecast/csv", get(handlers::export_forecast_csv))
        .route("/series/chart", post(handlers::reshape_series))
        .route("/series/csv", post(handlers::export_series_csv))
}

async fn not_found() -> AppError {
    AppError::NotFound("Route".to_string())
}
