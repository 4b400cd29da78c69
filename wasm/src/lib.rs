//! WebAssembly module for Weathergy
//!
//! Provides client-side computation for:
//! - Condition inference from sensor readings
//! - Forecast series reshaping for charts
//! - CSV export of forecast series
//! - Sensor reading validation
//!
//! Structured values cross the boundary as JSON strings.

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Infer weather conditions for a reading taken on `date_iso` (YYYY-MM-DD)
#[wasm_bindgen]
pub fn predict_conditions(
    temperature: f64,
    humidity: f64,
    pressure: f64,
    date_iso: &str,
) -> Result<String, JsValue> {
    predict_conditions_json(temperature, humidity, pressure, date_iso).map_err(js_error)
}

/// Seasonal context for a 1-based month
#[wasm_bindgen]
pub fn calendar_context(month: u32) -> Result<String, JsValue> {
    to_json(&CalendarContext::from_month(month)).map_err(js_error)
}

/// Discomfort index for a temperature and humidity pair
#[wasm_bindgen]
pub fn discomfort_index(temperature: f64, humidity: f64) -> f64 {
    shared::discomfort_index(&SensorReading::new(temperature, humidity, 0.0))
}

/// Reshape a raw forecast payload into chart rows labelled in local time
#[wasm_bindgen]
pub fn reshape_for_chart(payload_json: &str, tz_offset_minutes: i32) -> Result<String, JsValue> {
    reshape_for_chart_json(payload_json, tz_offset_minutes).map_err(js_error)
}

/// Reshape a raw forecast payload into rows keyed by ISO timestamp
#[wasm_bindgen]
pub fn reshape_for_export(payload_json: &str) -> Result<String, JsValue> {
    parse_payload(payload_json)
        .and_then(|payload| to_json(&export_rows(&payload)))
        .map_err(js_error)
}

/// Export a raw forecast payload as CSV, one row per timestamp
#[wasm_bindgen]
pub fn export_csv(payload_json: &str) -> Result<String, JsValue> {
    export_with_layout(payload_json, CsvLayout::Keyed).map_err(js_error)
}

/// Export a raw forecast payload as CSV, pairing values by position
#[wasm_bindgen]
pub fn export_csv_positional(payload_json: &str) -> Result<String, JsValue> {
    export_with_layout(payload_json, CsvLayout::Positional).map_err(js_error)
}

/// Download filename for a location's CSV export
#[wasm_bindgen]
pub fn csv_filename(location: &str) -> String {
    shared::csv_filename(location)
}

/// Check a reading against physical bounds before sending it anywhere
#[wasm_bindgen]
pub fn validate_sensor_reading(temperature: f64, humidity: f64, pressure: f64) -> bool {
    shared::validate_sensor_reading(&SensorReading::new(temperature, humidity, pressure)).is_ok()
}

fn predict_conditions_json(
    temperature: f64,
    humidity: f64,
    pressure: f64,
    date_iso: &str,
) -> Result<String, String> {
    let date = NaiveDate::parse_from_str(date_iso.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", date_iso, e))?;
    let reading = SensorReading::new(temperature, humidity, pressure);

    let conditions = infer_conditions(&reading, &CalendarContext::from_date(date));
    to_json(&conditions)
}

fn reshape_for_chart_json(payload_json: &str, tz_offset_minutes: i32) -> Result<String, String> {
    validate_utc_offset_minutes(tz_offset_minutes)?;
    let offset = FixedOffset::east_opt(tz_offset_minutes * 60)
        .ok_or_else(|| format!("Invalid UTC offset: {} minutes", tz_offset_minutes))?;

    let payload = parse_payload(payload_json)?;
    to_json(&chart_rows(&payload, offset))
}

fn export_with_layout(payload_json: &str, layout: CsvLayout) -> Result<String, String> {
    let payload = parse_payload(payload_json)?;
    shared::export_csv_with_layout(&payload, layout).map_err(|e| e.to_string())
}

fn parse_payload(payload_json: &str) -> Result<RawSeriesPayload, String> {
    let payload: RawSeriesPayload = serde_json::from_str(payload_json)
        .map_err(|e| format!("Invalid payload JSON: {}", e))?;

    if payload.is_empty() {
        console_warn("forecast payload contains no data points");
    }
    Ok(payload)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn js_error(message: impl Into<String>) -> JsValue {
    JsValue::from_str(&message.into())
}

#[cfg(target_arch = "wasm32")]
fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn console_warn(_message: &str) {}
