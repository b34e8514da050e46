use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Activity kinds the calorie formulas understand
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    Walking,
    Running,
    /// Any other label, kept verbatim for reporting
    Unknown(String),
}

impl ActivityKind {
    /// Classify a raw activity label.
    ///
    /// Matching trims surrounding whitespace and ignores ASCII case, so
    /// `"running"` and `" Running "` both resolve to [`ActivityKind::Running`].
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case("walking") {
            ActivityKind::Walking
        } else if trimmed.eq_ignore_ascii_case("running") {
            ActivityKind::Running
        } else {
            ActivityKind::Unknown(trimmed.to_string())
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Walking => write!(f, "Walking"),
            ActivityKind::Running => write!(f, "Running"),
            ActivityKind::Unknown(label) => write!(f, "{}", label),
        }
    }
}

/// A parsed `steps,activity,duration` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    /// Number of steps, always positive
    pub steps: u32,

    /// Activity classification
    pub kind: ActivityKind,

    /// Elapsed time of the activity
    pub duration: Duration,
}

/// A parsed `steps,duration` line; the activity is implicitly walking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRecord {
    pub steps: u32,
    pub duration: Duration,
}

/// Summary derived from an [`ActivityRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Walking or running
    pub kind: ActivityKind,

    /// Elapsed time in hours
    pub duration_hours: f64,

    /// Distance covered in kilometers
    pub distance_km: f64,

    /// Mean speed in km/h, zero for a zero duration
    pub mean_speed_kmh: f64,

    /// Energy expenditure in kilocalories
    pub calories: f64,
}

/// Summary derived from a [`DayRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    pub steps: u32,
    pub distance_km: f64,
    pub calories: f64,
}
