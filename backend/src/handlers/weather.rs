//! HTTP handlers for weather prediction, forecast and export endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::CsvLayout;
use validator::Validate;

use crate::error::AppResult;
use crate::models::{
    RawSeriesPayload, SensorReading, TimestampRow, WeatherCondition, WeatherPrediction,
};
use crate::services::weather::{self, CsvDownload, ForecastView};
use crate::services::WeatherService;
use crate::AppState;

/// Query parameters for a sensor-driven prediction
#[derive(Debug, Deserialize, Validate)]
pub struct PredictionQuery {
    #[validate(length(min = 1, max = 100, message = "Location must be 1 to 100 characters"))]
    pub location: String,
    pub date: Option<NaiveDate>,
}

/// Get a prediction from the current sensor reading
pub async fn get_prediction(
    State(state): State<AppState>,
    Query(query): Query<PredictionQuery>,
) -> AppResult<Json<WeatherPrediction>> {
    query.validate()?;

    let service = WeatherService::new(state.sensors, state.predictions);
    let prediction = service.predict(&query.location, query.date)?;
    Ok(Json(prediction))
}

/// Request body for inferring conditions from a client-supplied reading
#[derive(Debug, Deserialize)]
pub struct ConditionsRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub date: Option<NaiveDate>,
}

/// Infer conditions for a reading
pub async fn infer_conditions(
    Json(input): Json<ConditionsRequest>,
) -> AppResult<Json<Vec<WeatherCondition>>> {
    let reading = SensorReading::new(input.temperature, input.humidity, input.pressure);
    let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
    let conditions = weather::conditions_for(&reading, date)?;
    Ok(Json(conditions))
}

/// Query parameters for a chart-ready forecast
#[derive(Debug, Deserialize, Validate)]
pub struct ForecastQuery {
    #[validate(length(min = 1, max = 100, message = "Location must be 1 to 100 characters"))]
    pub location: String,
    #[validate(range(min = -720, max = 840, message = "UTC offset must be between -720 and 840 minutes"))]
    pub tz_offset_minutes: Option<i32>,
}

/// Get the remote forecast with chart rows
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<ForecastView>> {
    query.validate()?;

    let service = WeatherService::new(state.sensors, state.predictions);
    let view = service
        .forecast(&query.location, query.tz_offset_minutes.unwrap_or(0))
        .await?;
    Ok(Json(view))
}

/// Query parameters for a CSV download
#[derive(Debug, Deserialize, Validate)]
pub struct CsvQuery {
    #[validate(length(min = 1, max = 100, message = "Location must be 1 to 100 characters"))]
    pub location: String,
    #[serde(default)]
    pub layout: CsvLayout,
}

/// Download the remote forecast's series as CSV
pub async fn export_forecast_csv(
    State(state): State<AppState>,
    Query(query): Query<CsvQuery>,
) -> AppResult<impl IntoResponse> {
    query.validate()?;

    let service = WeatherService::new(state.sensors, state.predictions);
    let download = service.forecast_csv(&query.location, query.layout).await?;
    Ok(csv_attachment(download))
}

/// Query parameters for reshaping a client-supplied payload
#[derive(Debug, Deserialize, Validate)]
pub struct ChartQuery {
    #[validate(range(min = -720, max = 840, message = "UTC offset must be between -720 and 840 minutes"))]
    pub tz_offset_minutes: Option<i32>,
}

/// Reshape a payload into chart rows
pub async fn reshape_series(
    Query(query): Query<ChartQuery>,
    Json(payload): Json<RawSeriesPayload>,
) -> AppResult<Json<Vec<TimestampRow>>> {
    query.validate()?;

    let rows = weather::chart_for(&payload, query.tz_offset_minutes.unwrap_or(0))?;
    Ok(Json(rows))
}

/// Render a client-supplied payload as CSV
pub async fn export_series_csv(
    Query(query): Query<CsvQuery>,
    Json(payload): Json<RawSeriesPayload>,
) -> AppResult<impl IntoResponse> {
    query.validate()?;

    let download = weather::render_csv(query.location.trim(), &payload, query.layout)?;
    Ok(csv_attachment(download))
}

fn csv_attachment(download: CsvDownload) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download.filename),
            ),
        ],
        download.body,
    )
}
