//! Sensor sources feeding the inference engine
//!
//! The hardware bridge is not part of this server. Readings come either
//! from a random generator bounded to the demo ranges or from a fixed,
//! configured value.

use std::ops::Range;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::SensorReading;

use crate::config::{SensorConfig, SensorMode};
use crate::error::{AppError, AppResult};

pub const MOCK_TEMPERATURE_RANGE: Range<f64> = 10.0..50.0;
pub const MOCK_HUMIDITY_RANGE: Range<f64> = 0.0..100.0;
pub const MOCK_PRESSURE_RANGE: Range<f64> = 950.0..1050.0;

/// Anything that can produce a sensor reading on demand
pub trait SensorSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn read(&self) -> AppResult<SensorReading>;
}

/// Random readings, optionally seeded for reproducibility
pub struct MockSensor {
    rng: Mutex<StdRng>,
}

impl MockSensor {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl SensorSource for MockSensor {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn read(&self) -> AppResult<SensorReading> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AppError::Internal("Mock sensor state poisoned".to_string()))?;

        Ok(SensorReading {
            temperature: rng.gen_range(MOCK_TEMPERATURE_RANGE),
            humidity: rng.gen_range(MOCK_HUMIDITY_RANGE),
            pressure: rng.gen_range(MOCK_PRESSURE_RANGE),
        })
    }
}

/// Always reports the same reading
pub struct FixedSensor {
    reading: SensorReading,
}

impl FixedSensor {
    pub fn new(reading: SensorReading) -> Self {
        Self { reading }
    }
}

impl SensorSource for FixedSensor {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn read(&self) -> AppResult<SensorReading> {
        Ok(self.reading)
    }
}

/// Build the sensor source selected by configuration
pub fn from_config(config: &SensorConfig) -> AppResult<Arc<dyn SensorSource>> {
    match config.mode {
        SensorMode::Mock => Ok(Arc::new(MockSensor::new(config.seed))),
        SensorMode::Fixed => {
            let reading = config.fixed_reading.ok_or_else(|| {
                AppError::Configuration(
                    "sensors.fixed_reading is required when sensors.mode = \"fixed\"".to_string(),
                )
            })?;
            Ok(Arc::new(FixedSensor::new(reading)))
        }
    }
}
