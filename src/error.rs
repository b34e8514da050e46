//! Unified error hierarchy for stepsrs
//!
//! Library code returns these typed errors. The string entry points in
//! [`crate::report`] never surface them to callers; they turn them into an
//! empty string or a message and log the cause through `tracing`.

use thiserror::Error;

/// Top-level error type for all stepsrs operations
#[derive(Debug, Error)]
pub enum StepsError {
    /// Activity line parsing errors
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Calculation errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Activity label is neither walking nor running
    #[error("Unknown activity type: {label}")]
    UnknownActivity { label: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while splitting and decoding a raw activity line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Wrong number of comma separated fields
    #[error("malformed input: expected {expected} fields, found {found}")]
    MalformedInput { expected: usize, found: usize },

    /// Step field is not an integer
    #[error("invalid step count {value:?}: {reason}")]
    InvalidNumber { value: String, reason: String },

    /// Step field parsed but is zero or negative
    #[error("step count must be positive, got {steps}")]
    NonPositiveSteps { steps: i64 },

    /// Duration field could not be read as a time span
    #[error("invalid duration {value:?}: {reason}")]
    InvalidDuration { value: String, reason: String },
}

impl ParseError {
    /// Whether the failure is about the step field, including a
    /// non-positive count
    pub fn is_invalid_number(&self) -> bool {
        matches!(
            self,
            ParseError::InvalidNumber { .. } | ParseError::NonPositiveSteps { .. }
        )
    }
}

/// Calculation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// Body metric outside the range the formulas accept
    #[error("Invalid parameter for {calculation}: {parameter}={value}")]
    InvalidParameter {
        calculation: String,
        parameter: String,
        value: f64,
    },

    /// Calculator coefficient that would make every result meaningless
    #[error("Invalid setting {setting}={value}: must be finite and positive")]
    InvalidSetting { setting: String, value: f64 },
}

/// Result type alias for stepsrs operations
pub type Result<T> = std::result::Result<T, StepsError>;

impl StepsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StepsError::Parse(ParseError::NonPositiveSteps { .. }) => ErrorSeverity::Info,
            StepsError::Parse(_) => ErrorSeverity::Warning,
            StepsError::UnknownActivity { .. } => ErrorSeverity::Warning,
            StepsError::Calculation(_) => ErrorSeverity::Error,
            StepsError::Io(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            StepsError::Parse(ParseError::MalformedInput { expected, .. }) => {
                format!(
                    "Activity line must contain {} comma separated fields",
                    expected
                )
            }
            StepsError::Parse(ParseError::InvalidDuration { value, .. }) => {
                format!("Could not read {:?} as a duration (try 1h30m or 45m)", value)
            }
            StepsError::Calculation(CalculationError::InvalidParameter { parameter, .. }) => {
                format!("Please provide a positive {} for the athlete", parameter)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
