// Library interface for stepsrs
// Step counts and activity lines in, distance / speed / calorie reports out

pub mod calories;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod report;
pub mod summary;

// Re-export commonly used types for convenience
pub use calories::{CalorieCalculator, CalorieSettings};
pub use config::{AppConfig, AthleteProfile};
pub use error::{CalculationError, ParseError, Result, StepsError};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use report::{day_action_info, training_info, ReportFormatter, UNKNOWN_ACTIVITY};
pub use summary::{LogKind, LogProcessor, LogSummary};
