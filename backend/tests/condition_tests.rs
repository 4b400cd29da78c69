//! Condition inference integration tests
//!
//! Tests for the rule table including:
//! - Seasonal gating of hot and cold conditions
//! - Likelihood bounds and per-rule caps
//! - The favorable fallback when nothing fires

use proptest::prelude::*;
use shared::{
    infer_conditions, CalendarContext, ConditionRule, ConditionType, SensorReading, Severity,
    CONDITION_RULES, FAVORABLE_LIKELIHOOD,
};

fn reading(t: f64, h: f64, p: f64) -> SensorReading {
    SensorReading::new(t, h, p)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Summer storm: every adverse rule except cold fires, in table order
    #[test]
    fn summer_storm() {
        let conditions = infer_conditions(&reading(38.0, 85.0, 975.0), &CalendarContext::summer());

        let kinds: Vec<ConditionType> = conditions.iter().map(|c| c.condition_type).collect();
        assert_eq!(
            kinds,
            vec![
                ConditionType::Hot,
                ConditionType::Wet,
                ConditionType::Windy,
                ConditionType::Uncomfortable,
            ]
        );

        assert_eq!(conditions[0].likelihood, 76.0);
        assert_eq!(conditions[0].severity, Severity::High);
        assert_eq!(conditions[1].likelihood, 85.0);
        assert_eq!(conditions[2].likelihood, 50.0);
        assert!((conditions[3].likelihood - 66.2).abs() < 1e-9);
    }

    /// Hot never fires outside summer
    #[test]
    fn hot_requires_summer() {
        let hot = reading(40.0, 20.0, 1013.0);
        for calendar in [CalendarContext::winter(), CalendarContext::shoulder()] {
            let conditions = infer_conditions(&hot, &calendar);
            assert!(conditions
                .iter()
                .all(|c| c.condition_type != ConditionType::Hot));
        }
    }

    /// Freezing winter morning
    #[test]
    fn winter_freeze() {
        let conditions = infer_conditions(&reading(2.0, 30.0, 1020.0), &CalendarContext::winter());
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].condition_type, ConditionType::Cold);
        assert_eq!(conditions[0].likelihood, 72.0);
        assert_eq!(conditions[0].severity, Severity::High);
        assert!(conditions[0].description.contains("2.0°C"));
    }

    /// Cold likelihood saturates at its cap
    #[test]
    fn cold_likelihood_capped() {
        let conditions =
            infer_conditions(&reading(-10.0, 30.0, 1020.0), &CalendarContext::winter());
        assert_eq!(conditions[0].likelihood, ConditionRule::Cold.cap());
    }

    /// Boundaries are strict
    #[test]
    fn thresholds_are_exclusive() {
        let conditions = infer_conditions(&reading(30.0, 80.0, 980.0), &CalendarContext::summer());
        assert!(conditions
            .iter()
            .all(|c| c.condition_type == ConditionType::Uncomfortable));
    }

    /// Mild spring day falls back to the favorable condition
    #[test]
    fn favorable_fallback() {
        let conditions =
            infer_conditions(&reading(22.0, 50.0, 1013.0), &CalendarContext::shoulder());
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].likelihood, FAVORABLE_LIKELIHOOD);
        assert_eq!(conditions[0].severity, Severity::Low);
    }

    /// Out-of-domain and infinite readings are absorbed by the caps
    #[test]
    fn extreme_inputs_capped() {
        let summer = infer_conditions(
            &reading(f64::INFINITY, 250.0, -1.0e9),
            &CalendarContext::summer(),
        );
        let likelihood = |kind: ConditionType| {
            summer
                .iter()
                .find(|c| c.condition_type == kind)
                .map(|c| c.likelihood)
        };
        assert_eq!(likelihood(ConditionType::Hot), Some(ConditionRule::Hot.cap()));
        assert_eq!(likelihood(ConditionType::Wet), Some(ConditionRule::Wet.cap()));
        assert_eq!(likelihood(ConditionType::Windy), Some(ConditionRule::Windy.cap()));
        assert_eq!(
            likelihood(ConditionType::Uncomfortable),
            Some(ConditionRule::Discomfort.cap())
        );

        let winter = infer_conditions(
            &reading(f64::MIN, -20.0, f64::NEG_INFINITY),
            &CalendarContext::winter(),
        );
        for condition in &winter {
            assert!((0.0..=100.0).contains(&condition.likelihood));
        }
        assert_eq!(winter[0].condition_type, ConditionType::Cold);
        assert_eq!(winter[0].likelihood, ConditionRule::Cold.cap());
    }

    /// Calendar derivation from month
    #[test]
    fn calendar_from_month() {
        assert!(CalendarContext::from_month(12).is_winter);
        assert!(CalendarContext::from_month(3).is_winter);
        assert!(CalendarContext::from_month(6).is_summer);
        assert!(CalendarContext::from_month(9).is_summer);

        let may = CalendarContext::from_month(5);
        assert!(!may.is_winter && !may.is_summer);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn calendar_strategy() -> impl Strategy<Value = CalendarContext> {
    (1u32..=12).prop_map(CalendarContext::from_month)
}

/// Any reading value, including ones no sensor could report
fn any_measurement() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -1.0e6f64..1.0e6,
        2 => -100.0f64..1200.0,
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
        1 => Just(f64::MAX),
        1 => Just(f64::MIN),
        1 => Just(f64::NAN),
    ]
}

proptest! {
    /// Likelihoods stay within 0..=100 and below their rule's cap for any input
    #[test]
    fn prop_likelihood_bounded(
        t in any_measurement(),
        h in any_measurement(),
        p in any_measurement(),
        calendar in calendar_strategy(),
    ) {
        let conditions = infer_conditions(&reading(t, h, p), &calendar);
        prop_assert!(!conditions.is_empty());

        for condition in &conditions {
            prop_assert!(condition.likelihood >= 0.0);
            prop_assert!(condition.likelihood <= 100.0);
        }

        for rule in CONDITION_RULES {
            if let Some(condition) = rule.evaluate(&reading(t, h, p), &calendar) {
                prop_assert!(condition.likelihood <= rule.cap());
            }
        }
    }

    /// Summer heat above 35°C is always high severity
    #[test]
    fn prop_extreme_summer_heat_is_high(
        t in 35.01f64..60.0,
        h in 0.0f64..=100.0,
        p in 900.0f64..1060.0,
    ) {
        let conditions = infer_conditions(&reading(t, h, p), &CalendarContext::summer());
        let hot = conditions.iter().find(|c| c.condition_type == ConditionType::Hot);
        prop_assert!(hot.is_some());
        prop_assert_eq!(hot.map(|c| c.severity), Some(Severity::High));
    }

    /// When no rule fires, exactly one low-severity condition is returned
    #[test]
    fn prop_fallback_is_single_low(
        t in 16.0f64..30.0,
        h in 0.0f64..50.0,
        p in 980.0f64..1060.0,
        calendar in calendar_strategy(),
    ) {
        // 0.4 * 30 + 0.6 * 50 = 42 keeps the discomfort rule silent
        let conditions = infer_conditions(&reading(t, h, p), &calendar);
        prop_assert_eq!(conditions.len(), 1);
        prop_assert_eq!(conditions[0].severity, Severity::Low);
        prop_assert_eq!(conditions[0].likelihood, FAVORABLE_LIKELIHOOD);
    }

    /// Inference is deterministic
    #[test]
    fn prop_inference_deterministic(
        t in -40.0f64..60.0,
        h in 0.0f64..=100.0,
        p in 900.0f64..1060.0,
        calendar in calendar_strategy(),
    ) {
        let a = infer_conditions(&reading(t, h, p), &calendar);
        let b = infer_conditions(&reading(t, h, p), &calendar);
        prop_assert_eq!(a, b);
    }
}
