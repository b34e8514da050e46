//! Distance, speed and energy expenditure from step counts
//!
//! All functions are pure. The empirical coefficients live in
//! [`CalorieSettings`], which is passed explicitly through a
//! [`CalorieCalculator`]; the free functions at the bottom of the module use
//! the default coefficients.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CalculationError;

/// Coefficients used by the distance and calorie formulas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalorieSettings {
    /// Average step length in meters
    pub step_length_m: f64,

    /// Meters in a kilometer
    pub meters_in_km: f64,

    /// Minutes in an hour
    pub minutes_in_hour: f64,

    /// Mean speed multiplier for running
    pub running_speed_multiplier: f64,

    /// Baseline subtracted from the running speed term
    pub running_speed_shift: f64,

    /// Body weight multiplier for walking
    pub walking_weight_multiplier: f64,

    /// Multiplier of the speed squared over height term for walking
    pub walking_speed_height_multiplier: f64,
}

impl Default for CalorieSettings {
    fn default() -> Self {
        Self {
            step_length_m: 0.65,
            meters_in_km: 1000.0,
            minutes_in_hour: 60.0,
            running_speed_multiplier: 18.0,
            running_speed_shift: 20.0,
            walking_weight_multiplier: 0.035,
            walking_speed_height_multiplier: 0.029,
        }
    }
}

impl CalorieSettings {
    /// Check that every coefficient is finite, and that the ones used as
    /// scales or divisors are positive
    pub fn validate(&self) -> Result<(), CalculationError> {
        let positive = [
            ("step_length_m", self.step_length_m),
            ("meters_in_km", self.meters_in_km),
            ("minutes_in_hour", self.minutes_in_hour),
            ("running_speed_multiplier", self.running_speed_multiplier),
            ("walking_weight_multiplier", self.walking_weight_multiplier),
            (
                "walking_speed_height_multiplier",
                self.walking_speed_height_multiplier,
            ),
        ];

        for (setting, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalculationError::InvalidSetting {
                    setting: setting.to_string(),
                    value,
                });
            }
        }

        // The shift may legitimately be zero
        if !self.running_speed_shift.is_finite() || self.running_speed_shift < 0.0 {
            return Err(CalculationError::InvalidSetting {
                setting: "running_speed_shift".to_string(),
                value: self.running_speed_shift,
            });
        }

        Ok(())
    }
}

/// Calculator bound to one set of coefficients
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalorieCalculator {
    settings: CalorieSettings,
}

impl CalorieCalculator {
    pub fn new(settings: CalorieSettings) -> Self {
        Self { settings }
    }

    /// Build a calculator after validating the coefficients
    pub fn with_settings(settings: CalorieSettings) -> Result<Self, CalculationError> {
        settings.validate()?;
        Ok(Self::new(settings))
    }

    /// Distance in kilometers covered by `steps`
    pub fn distance_km(&self, steps: u32) -> f64 {
        f64::from(steps) * self.settings.step_length_m / self.settings.meters_in_km
    }

    /// Mean speed in km/h, or exactly zero when `duration` is zero
    pub fn mean_speed_kmh(&self, steps: u32, duration: Duration) -> f64 {
        if duration.is_zero() {
            return 0.0;
        }
        self.distance_km(steps) / hours(duration)
    }

    /// Kilocalories burned while running.
    ///
    /// `(18.0 * mean_speed - 20.0) * weight_kg` with the default coefficients.
    pub fn running_calories(&self, steps: u32, weight_kg: f64, duration: Duration) -> f64 {
        let mean_speed = self.mean_speed_kmh(steps, duration);
        (self.settings.running_speed_multiplier * mean_speed - self.settings.running_speed_shift)
            * weight_kg
    }

    /// Kilocalories burned while walking.
    ///
    /// `(0.035 * weight_kg + (mean_speed^2 / height_m) * 0.029) * minutes / 60`
    /// with the default coefficients.
    pub fn walking_calories(
        &self,
        steps: u32,
        weight_kg: f64,
        height_m: f64,
        duration: Duration,
    ) -> f64 {
        let mean_speed = self.mean_speed_kmh(steps, duration);
        (self.settings.walking_weight_multiplier * weight_kg
            + (mean_speed * mean_speed / height_m) * self.settings.walking_speed_height_multiplier)
            * minutes(duration)
            / self.settings.minutes_in_hour
    }
}

/// Reject body metrics the formulas cannot use
pub fn validate_body_metrics(
    calculation: &str,
    weight_kg: f64,
    height_m: f64,
) -> Result<(), CalculationError> {
    validate_weight(calculation, weight_kg)?;
    require_positive(calculation, "height_m", height_m)
}

/// Reject a weight the formulas cannot use; running ignores height
pub fn validate_weight(calculation: &str, weight_kg: f64) -> Result<(), CalculationError> {
    require_positive(calculation, "weight_kg", weight_kg)
}

fn require_positive(calculation: &str, parameter: &str, value: f64) -> Result<(), CalculationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalculationError::InvalidParameter {
            calculation: calculation.to_string(),
            parameter: parameter.to_string(),
            value,
        });
    }
    Ok(())
}

/// Fractional hours in `duration`
pub fn hours(duration: Duration) -> f64 {
    duration.as_secs_f64() / 3600.0
}

/// Fractional minutes in `duration`
pub fn minutes(duration: Duration) -> f64 {
    duration.as_secs_f64() / 60.0
}

/// [`CalorieCalculator::distance_km`] with default coefficients
pub fn distance_km(steps: u32) -> f64 {
    CalorieCalculator::default().distance_km(steps)
}

/// [`CalorieCalculator::mean_speed_kmh`] with default coefficients
pub fn mean_speed_kmh(steps: u32, duration: Duration) -> f64 {
    CalorieCalculator::default().mean_speed_kmh(steps, duration)
}

/// [`CalorieCalculator::running_calories`] with default coefficients
pub fn running_calories(steps: u32, weight_kg: f64, duration: Duration) -> f64 {
    CalorieCalculator::default().running_calories(steps, weight_kg, duration)
}

/// [`CalorieCalculator::walking_calories`] with default coefficients
pub fn walking_calories(steps: u32, weight_kg: f64, height_m: f64, duration: Duration) -> f64 {
    CalorieCalculator::default().walking_calories(steps, weight_kg, height_m, duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_distance() {
        assert!((distance_km(1000) - 0.65).abs() < EPSILON);
        assert!((distance_km(500) - 0.325).abs() < EPSILON);
    }

    #[test]
    fn test_mean_speed() {
        let speed = mean_speed_kmh(1000, Duration::from_secs(30 * 60));
        assert!((speed - 1.3).abs() < EPSILON);
    }

    #[test]
    fn test_running_calories() {
        // speed 1.3 km/h -> (18 * 1.3 - 20) * 75 = 255
        let calories = running_calories(1000, 75.0, Duration::from_secs(30 * 60));
        assert!((calories - 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_walking_calories() {
        let duration = Duration::from_secs(45 * 60);
        let speed = 0.325 / 0.75;
        let expected = (0.035 * 70.0 + (speed * speed / 1.70) * 0.029) * 45.0 / 60.0;

        let calories = walking_calories(500, 70.0, 1.70, duration);
        assert!((calories - expected).abs() < EPSILON);
        assert_eq!(format!("{:.2}", calories), "1.84");
    }

    #[test]
    fn test_zero_duration_calories() {
        assert_eq!(walking_calories(500, 70.0, 1.70, Duration::ZERO), 0.0);
        // Running keeps the negative baseline at zero speed
        assert_eq!(running_calories(500, 70.0, Duration::ZERO), -1400.0);
    }

    #[test]
    fn test_custom_step_length() {
        let calculator = CalorieCalculator::with_settings(CalorieSettings {
            step_length_m: 0.8,
            ..CalorieSettings::default()
        })
        .unwrap();
        assert!((calculator.distance_km(1000) - 0.8).abs() < EPSILON);
    }

    #[test]
    fn test_settings_validation() {
        assert!(CalorieSettings::default().validate().is_ok());

        let settings = CalorieSettings {
            minutes_in_hour: 0.0,
            ..CalorieSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(CalculationError::InvalidSetting { ref setting, .. }) if setting == "minutes_in_hour"
        ));

        let settings = CalorieSettings {
            running_speed_shift: f64::NAN,
            ..CalorieSettings::default()
        };
        assert!(CalorieCalculator::with_settings(settings).is_err());
    }

    #[test]
    fn test_body_metric_validation() {
        assert!(validate_body_metrics("walking_calories", 70.0, 1.7).is_ok());
        assert!(validate_body_metrics("walking_calories", 70.0, 0.0).is_err());
        assert!(validate_body_metrics("running_calories", -1.0, 1.7).is_err());
        assert!(validate_body_metrics("running_calories", f64::INFINITY, 1.7).is_err());
    }

    #[test]
    fn test_weight_validation_ignores_height() {
        assert!(validate_weight("running_calories", 70.0).is_ok());
        assert!(matches!(
            validate_weight("running_calories", 0.0),
            Err(CalculationError::InvalidParameter { ref parameter, .. }) if parameter == "weight_kg"
        ));
        assert!(matches!(
            validate_body_metrics("walking_calories", 70.0, f64::NAN),
            Err(CalculationError::InvalidParameter { ref parameter, .. }) if parameter == "height_m"
        ));
    }

    proptest! {
        #[test]
        fn test_distance_is_proportional(steps in 1u32..1_000_000u32) {
            let single = distance_km(steps);
            let double = distance_km(steps * 2);
            prop_assert!((double - 2.0 * single).abs() < 1e-9 * double.max(1.0));
        }

        #[test]
        fn test_zero_duration_speed_is_zero(steps in 1u32..u32::MAX) {
            prop_assert_eq!(mean_speed_kmh(steps, Duration::ZERO), 0.0);
        }

        #[test]
        fn test_speed_is_non_negative(
            steps in 1u32..100_000u32,
            seconds in 1u64..86_400u64
        ) {
            let speed = mean_speed_kmh(steps, Duration::from_secs(seconds));
            prop_assert!(speed > 0.0);
            prop_assert!(speed.is_finite());
        }
    }
}
