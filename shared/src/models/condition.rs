//! Sensor readings and weather-risk condition inference

use serde::{Deserialize, Serialize};

use crate::types::CalendarContext;

/// Likelihood reported when no adverse rule fires
pub const FAVORABLE_LIKELIHOOD: f64 = 15.0;

/// A single reading from the sensor array
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SensorReading {
    /// Air temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Barometric pressure in hPa
    pub pressure: f64,
}

impl SensorReading {
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
        }
    }
}

/// Qualitative weather-risk category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    Hot,
    Cold,
    Windy,
    Wet,
    Uncomfortable,
}

impl std::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionType::Hot => write!(f, "hot"),
            ConditionType::Cold => write!(f, "cold"),
            ConditionType::Windy => write!(f, "windy"),
            ConditionType::Wet => write!(f, "wet"),
            ConditionType::Uncomfortable => write!(f, "uncomfortable"),
        }
    }
}

/// Severity of a condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// An inferred weather-risk condition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherCondition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    /// Percent chance, within [0, 100]. Not rounded.
    pub likelihood: f64,
    pub severity: Severity,
    pub description: String,
}

/// Weighted combination of temperature and humidity
pub fn discomfort_index(reading: &SensorReading) -> f64 {
    0.4 * reading.temperature + 0.6 * reading.humidity
}

/// One entry of the inference rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionRule {
    Hot,
    Cold,
    Wet,
    Windy,
    Discomfort,
}

/// Rules in evaluation order
pub const CONDITION_RULES: [ConditionRule; 5] = [
    ConditionRule::Hot,
    ConditionRule::Cold,
    ConditionRule::Wet,
    ConditionRule::Windy,
    ConditionRule::Discomfort,
];

impl ConditionRule {
    /// Condition type this rule emits
    pub fn condition_type(&self) -> ConditionType {
        match self {
            ConditionRule::Hot => ConditionType::Hot,
            ConditionRule::Cold => ConditionType::Cold,
            ConditionRule::Wet => ConditionType::Wet,
            ConditionRule::Windy => ConditionType::Windy,
            ConditionRule::Discomfort => ConditionType::Uncomfortable,
        }
    }

    /// Upper bound on the likelihood this rule can report
    pub fn cap(&self) -> f64 {
        match self {
            ConditionRule::Hot => 90.0,
            ConditionRule::Cold => 85.0,
            ConditionRule::Wet => 95.0,
            ConditionRule::Windy => 80.0,
            ConditionRule::Discomfort => 85.0,
        }
    }

    /// Evaluate the rule against a reading, returning a condition if it fires
    pub fn evaluate(
        &self,
        reading: &SensorReading,
        calendar: &CalendarContext,
    ) -> Option<WeatherCondition> {
        let t = reading.temperature;
        let h = reading.humidity;
        let p = reading.pressure;

        let index = discomfort_index(reading);

        let (raw_likelihood, severity, description) = match self {
            ConditionRule::Hot if calendar.is_summer && t > 30.0 => (
                t * 2.0,
                if t > 35.0 { Severity::High } else { Severity::Medium },
                format!(
                    "High temperatures expected. Current sensor reading: {:.1}°C",
                    t
                ),
            ),
            ConditionRule::Cold if calendar.is_winter && t < 15.0 => (
                (20.0 - t) * 4.0,
                if t < 5.0 { Severity::High } else { Severity::Medium },
                format!("Cold conditions likely. Current sensor reading: {:.1}°C", t),
            ),
            ConditionRule::Wet if h > 80.0 => (
                h,
                if h > 90.0 { Severity::High } else { Severity::Medium },
                format!("High humidity detected. Rain likely. Humidity: {:.1}%", h),
            ),
            ConditionRule::Windy if p < 980.0 => (
                (1000.0 - p) * 2.0,
                if p < 970.0 { Severity::High } else { Severity::Medium },
                format!(
                    "Low pressure system detected. Strong winds possible. Pressure: {:.1} hPa",
                    p
                ),
            ),
            ConditionRule::Discomfort if index > 60.0 => (
                index,
                if index > 75.0 { Severity::High } else { Severity::Medium },
                format!(
                    "High discomfort index ({:.1}) due to temperature and humidity combination",
                    index
                ),
            ),
            _ => return None,
        };

        Some(WeatherCondition {
            condition_type: self.condition_type(),
            likelihood: capped(raw_likelihood, self.cap()),
            severity,
            description,
        })
    }
}

// NaN cannot reach here: every rule guard is false for NaN inputs.
fn capped(value: f64, cap: f64) -> f64 {
    value.min(cap).max(0.0)
}

/// Condition emitted when no adverse rule fires
pub fn favorable_condition() -> WeatherCondition {
    WeatherCondition {
        condition_type: ConditionType::Uncomfortable,
        likelihood: FAVORABLE_LIKELIHOOD,
        severity: Severity::Low,
        description: "Conditions appear favorable for outdoor activities!".to_string(),
    }
}

/// Infer weather-risk conditions from a reading and its seasonal context
///
/// Rules are evaluated in [`CONDITION_RULES`] order. The result is never
/// empty: when nothing fires a single low-severity condition is returned.
pub fn infer_conditions(
    reading: &SensorReading,
    calendar: &CalendarContext,
) -> Vec<WeatherCondition> {
    let mut conditions: Vec<WeatherCondition> = CONDITION_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(reading, calendar))
        .collect();

    if conditions.is_empty() {
        conditions.push(favorable_condition());
    }

    tracing::debug!(
        count = conditions.len(),
        temperature = reading.temperature,
        humidity = reading.humidity,
        pressure = reading.pressure,
        "inferred weather conditions"
    );

    conditions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(conditions: &[WeatherCondition]) -> Vec<ConditionType> {
        conditions.iter().map(|c| c.condition_type).collect()
    }

    #[test]
    fn test_hot_requires_summer() {
        let reading = SensorReading::new(33.0, 20.0, 1010.0);
        assert!(ConditionRule::Hot
            .evaluate(&reading, &CalendarContext::shoulder())
            .is_none());

        let hot = ConditionRule::Hot
            .evaluate(&reading, &CalendarContext::summer())
            .unwrap();
        assert_eq!(hot.severity, Severity::Medium);
        assert!((hot.likelihood - 66.0).abs() < 1e-9);
        assert!(hot.description.contains("33.0°C"));
    }

    #[test]
    fn test_hot_boundaries() {
        let summer = CalendarContext::summer();
        assert!(ConditionRule::Hot
            .evaluate(&SensorReading::new(30.0, 0.0, 1013.0), &summer)
            .is_none());
        let at_35 = ConditionRule::Hot
            .evaluate(&SensorReading::new(35.0, 0.0, 1013.0), &summer)
            .unwrap();
        assert_eq!(at_35.severity, Severity::Medium);
        let at_46 = ConditionRule::Hot
            .evaluate(&SensorReading::new(46.0, 0.0, 1013.0), &summer)
            .unwrap();
        assert_eq!(at_46.likelihood, 90.0);
    }

    #[test]
    fn test_cold_requires_winter() {
        let reading = SensorReading::new(2.0, 40.0, 1013.0);
        assert!(ConditionRule::Cold
            .evaluate(&reading, &CalendarContext::summer())
            .is_none());

        let cold = ConditionRule::Cold
            .evaluate(&reading, &CalendarContext::winter())
            .unwrap();
        assert_eq!(cold.severity, Severity::High);
        // (20 - 2) * 4 = 72
        assert!((cold.likelihood - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_cold_likelihood_capped() {
        let cold = ConditionRule::Cold
            .evaluate(
                &SensorReading::new(-10.0, 40.0, 1013.0),
                &CalendarContext::winter(),
            )
            .unwrap();
        assert_eq!(cold.likelihood, 85.0);
    }

    #[test]
    fn test_wet_rule() {
        let ctx = CalendarContext::shoulder();
        assert!(ConditionRule::Wet
            .evaluate(&SensorReading::new(20.0, 80.0, 1013.0), &ctx)
            .is_none());

        let wet = ConditionRule::Wet
            .evaluate(&SensorReading::new(20.0, 99.0, 1013.0), &ctx)
            .unwrap();
        assert_eq!(wet.severity, Severity::High);
        assert_eq!(wet.likelihood, 95.0);
        assert!(wet.description.contains("99.0%"));
    }

    #[test]
    fn test_windy_rule() {
        let ctx = CalendarContext::shoulder();
        assert!(ConditionRule::Windy
            .evaluate(&SensorReading::new(20.0, 40.0, 980.0), &ctx)
            .is_none());

        let windy = ConditionRule::Windy
            .evaluate(&SensorReading::new(20.0, 40.0, 975.0), &ctx)
            .unwrap();
        assert_eq!(windy.severity, Severity::Medium);
        assert!((windy.likelihood - 50.0).abs() < 1e-9);

        let storm = ConditionRule::Windy
            .evaluate(&SensorReading::new(20.0, 40.0, 950.0), &ctx)
            .unwrap();
        assert_eq!(storm.severity, Severity::High);
        assert_eq!(storm.likelihood, 80.0);
    }

    #[test]
    fn test_discomfort_index() {
        let reading = SensorReading::new(38.0, 85.0, 975.0);
        assert!((discomfort_index(&reading) - 66.2).abs() < 1e-9);
    }

    #[test]
    fn test_summer_storm_example() {
        let reading = SensorReading::new(38.0, 85.0, 975.0);
        let conditions = infer_conditions(&reading, &CalendarContext::summer());

        assert_eq!(
            types(&conditions),
            vec![
                ConditionType::Hot,
                ConditionType::Wet,
                ConditionType::Windy,
                ConditionType::Uncomfortable,
            ]
        );
        assert!((conditions[0].likelihood - 76.0).abs() < 1e-9);
        assert_eq!(conditions[0].severity, Severity::High);
        assert!((conditions[1].likelihood - 85.0).abs() < 1e-9);
        assert_eq!(conditions[1].severity, Severity::Medium);
        assert!((conditions[2].likelihood - 50.0).abs() < 1e-9);
        assert_eq!(conditions[2].severity, Severity::Medium);
        assert!((conditions[3].likelihood - 66.2).abs() < 1e-9);
        assert_eq!(conditions[3].severity, Severity::Medium);
    }

    #[test]
    fn test_favorable_fallback() {
        let reading = SensorReading::new(20.0, 40.0, 1013.0);
        let conditions = infer_conditions(&reading, &CalendarContext::summer());
        assert_eq!(conditions, vec![favorable_condition()]);
    }

    #[test]
    fn test_nan_reading_falls_back() {
        let reading = SensorReading::new(f64::NAN, f64::NAN, f64::NAN);
        let conditions = infer_conditions(&reading, &CalendarContext::winter());
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].severity, Severity::Low);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(favorable_condition()).unwrap();
        assert_eq!(json["type"], "uncomfortable");
        assert_eq!(json["severity"], "low");
        assert_eq!(json["likelihood"], 15.0);
    }
}
