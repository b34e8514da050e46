//! Report building and formatting
//!
//! The pipeline is parse, validate, compute, format. The typed methods on
//! [`ReportFormatter`] return `Result`s; the string entry points
//! ([`training_info`], [`day_action_info`]) swallow every error and hand
//! back an empty string or a message instead.

use std::fmt;

use tracing::{debug, warn};

use crate::calories::{self, CalorieCalculator, CalorieSettings};
use crate::error::{ParseError, Result, StepsError};
use crate::models::{ActivityKind, ActivityRecord, DayRecord, DayReport, TrainingReport};
use crate::parser;

/// Returned by [`training_info`] for labels other than walking or running
pub const UNKNOWN_ACTIVITY: &str = "Unknown activity type";

/// Prefix of the message [`training_info`] returns when a line cannot be parsed
pub const PARSE_ERROR_PREFIX: &str = "Error parsing training data";

/// Prefix of the message [`training_info`] returns when the athlete's body
/// metrics cannot be used by the formulas
pub const CALCULATION_ERROR_PREFIX: &str = "Error calculating training data";

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Activity: {}\nDuration: {:.2} h.\nDistance: {:.2} km.\nSpeed: {:.2} km/h\nCalories burned: {:.2} kcal.",
            self.kind, self.duration_hours, self.distance_km, self.mean_speed_kmh, self.calories
        )
    }
}

impl fmt::Display for DayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Steps: {}.\nDistance: {:.2} km.\nCalories burned: {:.2} kcal.",
            self.steps, self.distance_km, self.calories
        )
    }
}

/// Turns parsed records into reports
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatter {
    calculator: CalorieCalculator,
}

impl ReportFormatter {
    pub fn new(calculator: CalorieCalculator) -> Self {
        Self { calculator }
    }

    /// Formatter over validated coefficients
    pub fn with_settings(settings: CalorieSettings) -> Result<Self> {
        Ok(Self::new(CalorieCalculator::with_settings(settings)?))
    }

    /// Compute the report for an already parsed record
    pub fn training_report_for(
        &self,
        record: &ActivityRecord,
        weight_kg: f64,
        height_m: f64,
    ) -> Result<TrainingReport> {
        let calories = match &record.kind {
            ActivityKind::Walking => {
                calories::validate_body_metrics("walking_calories", weight_kg, height_m)?;
                self.calculator
                    .walking_calories(record.steps, weight_kg, height_m, record.duration)
            }
            ActivityKind::Running => {
                calories::validate_weight("running_calories", weight_kg)?;
                self.calculator
                    .running_calories(record.steps, weight_kg, record.duration)
            }
            ActivityKind::Unknown(label) => {
                return Err(StepsError::UnknownActivity {
                    label: label.clone(),
                });
            }
        };

        Ok(TrainingReport {
            kind: record.kind.clone(),
            duration_hours: calories::hours(record.duration),
            distance_km: self.calculator.distance_km(record.steps),
            mean_speed_kmh: self.calculator.mean_speed_kmh(record.steps, record.duration),
            calories,
        })
    }

    /// Parse a `steps,activity,duration` line and compute its report
    pub fn training_report(&self, line: &str, weight_kg: f64, height_m: f64) -> Result<TrainingReport> {
        let record = parser::parse_training_record(line)?;
        self.training_report_for(&record, weight_kg, height_m)
    }

    /// Compute the walking report for an already parsed day record
    pub fn day_report_for(&self, record: &DayRecord, weight_kg: f64, height_m: f64) -> Result<DayReport> {
        calories::validate_body_metrics("walking_calories", weight_kg, height_m)?;

        Ok(DayReport {
            steps: record.steps,
            distance_km: self.calculator.distance_km(record.steps),
            calories: self.calculator.walking_calories(
                record.steps,
                weight_kg,
                height_m,
                record.duration,
            ),
        })
    }

    /// Parse a `steps,duration` line and compute its walking report
    pub fn day_report(&self, line: &str, weight_kg: f64, height_m: f64) -> Result<DayReport> {
        let record = parser::parse_day_record(line)?;
        self.day_report_for(&record, weight_kg, height_m)
    }

    /// Formatted training report, or a message describing why there is none.
    ///
    /// Non-positive step counts yield an empty string, unknown activities
    /// yield [`UNKNOWN_ACTIVITY`], unusable body metrics yield a message
    /// starting with [`CALCULATION_ERROR_PREFIX`] and every other failure
    /// yields a message starting with [`PARSE_ERROR_PREFIX`].
    pub fn training_info(&self, line: &str, weight_kg: f64, height_m: f64) -> String {
        match self.training_report(line, weight_kg, height_m) {
            Ok(report) => report.to_string(),
            Err(StepsError::Parse(ParseError::NonPositiveSteps { steps })) => {
                debug!(steps, "Skipping training record without steps");
                String::new()
            }
            Err(StepsError::UnknownActivity { label }) => {
                warn!(label = %label, "Unknown activity type");
                UNKNOWN_ACTIVITY.to_string()
            }
            Err(StepsError::Calculation(err)) => {
                warn!(error = %err, weight_kg, height_m, "Cannot compute training record");
                format!("{}: {}", CALCULATION_ERROR_PREFIX, err)
            }
            Err(err) => {
                warn!(error = %err, line, "Rejected training record");
                format!("{}: {}", PARSE_ERROR_PREFIX, err)
            }
        }
    }

    /// Formatted walking report, or an empty string on any failure
    pub fn day_action_info(&self, line: &str, weight_kg: f64, height_m: f64) -> String {
        match self.day_report(line, weight_kg, height_m) {
            Ok(report) => report.to_string(),
            Err(StepsError::Parse(ParseError::NonPositiveSteps { steps })) => {
                debug!(steps, "Skipping day record without steps");
                String::new()
            }
            Err(err) => {
                warn!(error = %err, line, "Rejected day record");
                String::new()
            }
        }
    }
}

/// Walking report for a `steps,duration` line using the default
/// coefficients, or an empty string when the line is rejected
pub fn day_action_info(raw_line: &str, weight_kg: f64, height_m: f64) -> String {
    ReportFormatter::default().day_action_info(raw_line, weight_kg, height_m)
}

/// Walking or running report for a `steps,activity,duration` line using
/// the default coefficients
pub fn training_info(raw_line: &str, weight_kg: f64, height_m: f64) -> String {
    ReportFormatter::default().training_info(raw_line, weight_kg, height_m)
}
