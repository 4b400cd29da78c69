//! Validation utilities for readings and requests entering the system
//!
//! The inference engine accepts any numeric reading. These checks are
//! applied at the boundary, where readings arrive from sensors or clients.

use crate::models::SensorReading;

/// Lowest sea-level pressure considered physically plausible (hPa)
pub const MIN_PLAUSIBLE_PRESSURE: f64 = 870.0;
/// Highest sea-level pressure considered physically plausible (hPa)
pub const MAX_PLAUSIBLE_PRESSURE: f64 = 1085.0;

/// Maximum accepted location name length, in characters
pub const MAX_LOCATION_LEN: usize = 100;

// ============================================================================
// Sensor Validations
// ============================================================================

/// Validate that humidity is a percentage
pub fn validate_humidity(humidity: f64) -> Result<(), &'static str> {
    if !humidity.is_finite() {
        return Err("Humidity must be a finite number");
    }
    if !(0.0..=100.0).contains(&humidity) {
        return Err("Humidity must be between 0 and 100%");
    }
    Ok(())
}

/// Validate that pressure is within recorded sea-level extremes
pub fn validate_pressure(pressure: f64) -> Result<(), &'static str> {
    if !pressure.is_finite() {
        return Err("Pressure must be a finite number");
    }
    if !(MIN_PLAUSIBLE_PRESSURE..=MAX_PLAUSIBLE_PRESSURE).contains(&pressure) {
        return Err("Pressure must be between 870 and 1085 hPa");
    }
    Ok(())
}

/// Validate that temperature is a finite number
pub fn validate_temperature(temperature: f64) -> Result<(), &'static str> {
    if !temperature.is_finite() {
        return Err("Temperature must be a finite number");
    }
    Ok(())
}

/// Validate a full sensor reading, reporting the first failing field
pub fn validate_sensor_reading(reading: &SensorReading) -> Result<(), (&'static str, &'static str)> {
    validate_temperature(reading.temperature).map_err(|e| ("temperature", e))?;
    validate_humidity(reading.humidity).map_err(|e| ("humidity", e))?;
    validate_pressure(reading.pressure).map_err(|e| ("pressure", e))?;
    Ok(())
}

// ============================================================================
// Request Validations
// ============================================================================

/// Validate a location name
pub fn validate_location(location: &str) -> Result<(), &'static str> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err("Location is required");
    }
    if trimmed.chars().count() > MAX_LOCATION_LEN {
        return Err("Location must be at most 100 characters");
    }
    Ok(())
}

/// Validate a UTC offset in minutes (UTC-12:00 through UTC+14:00)
pub fn validate_utc_offset_minutes(minutes: i32) -> Result<(), &'static str> {
    if !(-12 * 60..=14 * 60).contains(&minutes) {
        return Err("UTC offset must be between -720 and 840 minutes");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_humidity() {
        assert!(validate_humidity(0.0).is_ok());
        assert!(validate_humidity(55.5).is_ok());
        assert!(validate_humidity(100.0).is_ok());
        assert!(validate_humidity(-0.1).is_err());
        assert!(validate_humidity(100.1).is_err());
        assert!(validate_humidity(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_pressure() {
        assert!(validate_pressure(1013.25).is_ok());
        assert!(validate_pressure(870.0).is_ok());
        assert!(validate_pressure(1085.0).is_ok());
        assert!(validate_pressure(500.0).is_err());
        assert!(validate_pressure(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_temperature() {
        assert!(validate_temperature(-40.0).is_ok());
        assert!(validate_temperature(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_sensor_reading_reports_field() {
        let ok = SensorReading::new(25.0, 60.0, 1010.0);
        assert!(validate_sensor_reading(&ok).is_ok());

        let bad = SensorReading::new(25.0, 120.0, 1010.0);
        let (field, _) = validate_sensor_reading(&bad).unwrap_err();
        assert_eq!(field, "humidity");

        let bad = SensorReading::new(25.0, 60.0, 10.0);
        let (field, _) = validate_sensor_reading(&bad).unwrap_err();
        assert_eq!(field, "pressure");
    }

    #[test]
    fn test_validate_location() {
        assert!(validate_location("Chiang Mai").is_ok());
        assert!(validate_location("เชียงใหม่").is_ok());
        assert!(validate_location("   ").is_err());
        assert!(validate_location(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_utc_offset() {
        assert!(validate_utc_offset_minutes(0).is_ok());
        assert!(validate_utc_offset_minutes(420).is_ok());
        assert!(validate_utc_offset_minutes(-720).is_ok());
        assert!(validate_utc_offset_minutes(900).is_err());
    }
}
