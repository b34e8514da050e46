//! Batch processing of activity logs
//!
//! A log holds one record per line. Blank lines and lines starting with `#`
//! are skipped. Each remaining line produces either a report or a failure
//! tagged with its 1-based line number; the totals only count successful
//! lines.

use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, error, info, warn, Level};

use crate::error::{Result, StepsError};
use crate::models::{DayReport, TrainingReport};
use crate::parser;
use crate::report::ReportFormatter;

/// Which line layout a log uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogKind {
    /// `steps,activity,duration`
    Training,
    /// `steps,duration`
    Day,
}

impl FromStr for LogKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "training" => Ok(LogKind::Training),
            "day" | "steps" => Ok(LogKind::Day),
            _ => Err(format!("Invalid log kind: {}", s)),
        }
    }
}

/// Report produced for one log line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LineReport {
    Training(TrainingReport),
    Day(DayReport),
}

impl LineReport {
    pub fn distance_km(&self) -> f64 {
        match self {
            LineReport::Training(report) => report.distance_km,
            LineReport::Day(report) => report.distance_km,
        }
    }

    pub fn calories(&self) -> f64 {
        match self {
            LineReport::Training(report) => report.calories,
            LineReport::Day(report) => report.calories,
        }
    }
}

impl std::fmt::Display for LineReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineReport::Training(report) => write!(f, "{}", report),
            LineReport::Day(report) => write!(f, "{}", report),
        }
    }
}

/// A line that did not produce a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFailure {
    pub line_number: usize,
    pub message: String,
}

/// Aggregated result of processing a whole log
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogSummary {
    /// Successful lines with their 1-based line numbers
    pub reports: Vec<(usize, LineReport)>,
    pub failures: Vec<LineFailure>,
    pub total_distance_km: f64,
    pub total_calories: f64,
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

impl LogSummary {
    pub fn processed(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    fn record(&mut self, line_number: usize, report: LineReport, duration: Duration) {
        self.total_distance_km += report.distance_km();
        self.total_calories += report.calories();
        self.total_duration += duration;
        self.reports.push((line_number, report));
    }

    fn reject(&mut self, line_number: usize, err: &StepsError) {
        let level = err.severity().to_tracing_level();
        if level == Level::ERROR {
            error!(line_number, error = %err, "Skipping log line");
        } else if level == Level::WARN {
            warn!(line_number, error = %err, "Skipping log line");
        } else {
            debug!(line_number, error = %err, "Skipping log line");
        }
        self.failures.push(LineFailure {
            line_number,
            message: err.user_message(),
        });
    }
}

/// Processes activity logs with one [`ReportFormatter`] and one athlete
pub struct LogProcessor {
    formatter: ReportFormatter,
    weight_kg: f64,
    height_m: f64,
}

impl LogProcessor {
    pub fn new(formatter: ReportFormatter, weight_kg: f64, height_m: f64) -> Self {
        Self {
            formatter,
            weight_kg,
            height_m,
        }
    }

    /// Process every record in `content`
    pub fn process_str(&self, content: &str, kind: LogKind) -> LogSummary {
        let mut summary = LogSummary::default();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line_number = index + 1;
            match self.process_line(line, kind) {
                Ok((report, duration)) => summary.record(line_number, report, duration),
                Err(err) => summary.reject(line_number, &err),
            }
        }

        info!(
            reports = summary.reports.len(),
            failures = summary.failures.len(),
            "Processed activity log"
        );

        summary
    }

    /// Read and process a log file
    pub fn process_file<P: AsRef<Path>>(&self, path: P, kind: LogKind) -> Result<LogSummary> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(self.process_str(&content, kind))
    }

    fn process_line(&self, line: &str, kind: LogKind) -> Result<(LineReport, Duration)> {
        match kind {
            LogKind::Training => {
                let record = parser::parse_training_record(line)?;
                let report =
                    self.formatter
                        .training_report_for(&record, self.weight_kg, self.height_m)?;
                Ok((LineReport::Training(report), record.duration))
            }
            LogKind::Day => {
                let record = parser::parse_day_record(line)?;
                let report = self
                    .formatter
                    .day_report_for(&record, self.weight_kg, self.height_m)?;
                Ok((LineReport::Day(report), record.duration))
            }
        }
    }
}

// Durations serialize as whole seconds
mod duration_serde {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> LogProcessor {
        LogProcessor::new(ReportFormatter::default(), 75.0, 1.75)
    }

    #[test]
    fn test_training_log() {
        let log = "\
# morning
1000,Running,0h30m

2000,Walking,1h0m
1000,Swimming,0h30m
abc,Running,0h30m
";
        let summary = processor().process_str(log, LogKind::Training);

        assert_eq!(summary.reports.len(), 2);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.processed(), 4);
        assert_eq!(summary.reports[0].0, 2);
        assert_eq!(summary.reports[1].0, 4);
        assert_eq!(summary.failures[0].line_number, 5);
        assert!(summary.failures[0].message.contains("Swimming"));
        assert_eq!(summary.failures[1].line_number, 6);

        assert!((summary.total_distance_km - 1.95).abs() < 1e-9);
        assert_eq!(summary.total_duration, Duration::from_secs(90 * 60));
        let expected_calories = summary.reports[0].1.calories() + summary.reports[1].1.calories();
        assert!((summary.total_calories - expected_calories).abs() < 1e-9);
    }

    #[test]
    fn test_day_log() {
        let summary = processor().process_str("1000,30m\n0,30m\n500,15m\n", LogKind::Day);

        assert_eq!(summary.reports.len(), 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].line_number, 2);
        assert!((summary.total_distance_km - 0.975).abs() < 1e-9);
        assert!(matches!(summary.reports[0].1, LineReport::Day(_)));
    }

    #[test]
    fn test_log_kind_parsing() {
        assert_eq!("training".parse::<LogKind>().unwrap(), LogKind::Training);
        assert_eq!("Day".parse::<LogKind>().unwrap(), LogKind::Day);
        assert!("weekly".parse::<LogKind>().is_err());
    }

    #[test]
    fn test_summary_serializes() {
        let summary = processor().process_str("1000,Running,0h30m", LogKind::Training);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["total_duration"], 1800);
        assert_eq!(json["reports"][0][1]["kind"], "Running");
    }
}
