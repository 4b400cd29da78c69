//! Prediction results returned to the client

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::condition::{infer_conditions, SensorReading, WeatherCondition};
use crate::types::CalendarContext;

/// Sensor-driven weather outlook for a location and date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherPrediction {
    pub id: Uuid,
    pub location: String,
    pub date: NaiveDate,
    pub conditions: Vec<WeatherCondition>,
    pub sensor_data: SensorReading,
}

impl WeatherPrediction {
    /// Run the inference engine for `reading` on `date`
    pub fn from_reading(
        id: Uuid,
        location: impl Into<String>,
        date: NaiveDate,
        reading: SensorReading,
    ) -> Self {
        let calendar = CalendarContext::from_date(date);
        Self {
            id,
            location: location.into(),
            date,
            conditions: infer_conditions(&reading, &calendar),
            sensor_data: reading,
        }
    }
}
