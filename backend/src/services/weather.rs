//! Weather prediction and forecast service
//!
//! Joins the sensor source, the condition engine, the prediction API and
//! the series reshaper behind the operations the HTTP handlers expose.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    chart_rows, csv_filename, export_csv_with_layout, infer_conditions, validate_location,
    validate_sensor_reading, validate_utc_offset_minutes, CalendarContext, CsvLayout,
    RawSeriesPayload, SensorReading, TimestampRow, WeatherCondition, WeatherPrediction,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::PredictionClient;
use crate::services::sensor::SensorSource;

/// Forecast text plus chart-ready rows for a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastView {
    pub location: String,
    pub prediction: String,
    pub fun_fact: String,
    pub chart: Vec<TimestampRow>,
    pub raw_data: RawSeriesPayload,
}

/// A rendered CSV download
#[derive(Debug, Clone, PartialEq)]
pub struct CsvDownload {
    pub filename: String,
    pub body: String,
}

pub struct WeatherService {
    sensors: Arc<dyn SensorSource>,
    predictions: PredictionClient,
}

impl WeatherService {
    pub fn new(sensors: Arc<dyn SensorSource>, predictions: PredictionClient) -> Self {
        Self {
            sensors,
            predictions,
        }
    }

    /// Read the sensors and infer conditions for `location` on `date`
    ///
    /// `date` defaults to today (UTC). A sensor value outside physical
    /// bounds is treated as a faulty device rather than a bad request.
    pub fn predict(&self, location: &str, date: Option<NaiveDate>) -> AppResult<WeatherPrediction> {
        let location = checked_location(location)?;
        let date = date.unwrap_or_else(|| Utc::now().date_naive());

        let reading = self.sensors.read()?;
        validate_sensor_reading(&reading).map_err(|(field, message)| {
            AppError::ExternalService(format!(
                "Sensor '{}' reported implausible {}: {}",
                self.sensors.name(),
                field,
                message
            ))
        })?;

        let prediction = WeatherPrediction::from_reading(Uuid::new_v4(), location, date, reading);

        tracing::info!(
            location = %prediction.location,
            date = %prediction.date,
            sensor = self.sensors.name(),
            conditions = prediction.conditions.len(),
            "Prediction generated"
        );

        Ok(prediction)
    }

    /// Fetch the remote forecast and reshape its series for charting
    pub async fn forecast(&self, location: &str, tz_offset_minutes: i32) -> AppResult<ForecastView> {
        let location = checked_location(location)?;
        let offset = utc_offset(tz_offset_minutes)?;

        let remote = self.predictions.fetch_forecast(location).await?;
        let chart = chart_rows(&remote.raw_data, offset);

        tracing::info!(location, rows = chart.len(), "Forecast fetched");

        Ok(ForecastView {
            location: remote.location,
            prediction: remote.prediction,
            fun_fact: remote.fun_fact,
            chart,
            raw_data: remote.raw_data,
        })
    }

    /// Fetch the remote forecast and render its series as CSV
    pub async fn forecast_csv(&self, location: &str, layout: CsvLayout) -> AppResult<CsvDownload> {
        let location = checked_location(location)?;
        let remote = self.predictions.fetch_forecast(location).await?;
        render_csv(location, &remote.raw_data, layout)
    }
}

/// Infer conditions for a client-supplied reading
pub fn conditions_for(reading: &SensorReading, date: NaiveDate) -> AppResult<Vec<WeatherCondition>> {
    validate_sensor_reading(reading).map_err(|(field, message)| AppError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    })?;

    Ok(infer_conditions(reading, &CalendarContext::from_date(date)))
}

/// Reshape a client-supplied payload into chart rows
pub fn chart_for(payload: &RawSeriesPayload, tz_offset_minutes: i32) -> AppResult<Vec<TimestampRow>> {
    let offset = utc_offset(tz_offset_minutes)?;
    Ok(chart_rows(payload, offset))
}

/// Render a payload as a CSV download named after `location`
pub fn render_csv(
    location: &str,
    payload: &RawSeriesPayload,
    layout: CsvLayout,
) -> AppResult<CsvDownload> {
    let body = export_csv_with_layout(payload, layout)?;

    tracing::debug!(location, ?layout, bytes = body.len(), "CSV rendered");

    Ok(CsvDownload {
        filename: csv_filename(location),
        body,
    })
}

fn checked_location(location: &str) -> AppResult<&str> {
    validate_location(location).map_err(|message| AppError::Validation {
        field: "location".to_string(),
        message: message.to_string(),
    })?;
    Ok(location.trim())
}

fn utc_offset(minutes: i32) -> AppResult<FixedOffset> {
    let invalid = |message: &str| AppError::Validation {
        field: "tz_offset_minutes".to_string(),
        message: message.to_string(),
    };
    validate_utc_offset_minutes(minutes).map_err(invalid)?;
    FixedOffset::east_opt(minutes * 60).ok_or_else(|| invalid("Invalid UTC offset"))
}
