use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::calories::{self, CalorieSettings};
use crate::logging::LogConfig;
use crate::report::ReportFormatter;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Coefficients for the distance and calorie formulas
    pub calculation: CalorieSettings,

    /// Body metrics used when the CLI is not given any
    pub athlete: AthleteProfile,

    /// Logging settings
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        let now = Utc::now();
        ConfigMetadata {
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Athlete body metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AthleteProfile {
    /// Weight in kilograms
    pub weight_kg: f64,

    /// Height in meters
    pub height_m: f64,
}

impl Default for AthleteProfile {
    fn default() -> Self {
        AthleteProfile {
            weight_kg: 75.0,
            height_m: 1.75,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::load_from_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".stepsrs")
            .join("config.toml")
    }

    /// Load the file at the default location, or built-in defaults when
    /// there is no such file
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_default_from(Self::default_config_path())
    }

    /// Load `path` if it exists, otherwise built-in defaults. A file that
    /// exists but cannot be read, parsed or validated is an error.
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from_file(path)
    }

    /// Load an explicitly requested file, or fall back to the default
    /// location and then to built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load_or_default(),
        }
    }

    /// Write a default configuration to `path` and return it
    pub fn create_default_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::default();
        config.save_to_file(path)?;
        Ok(config)
    }

    /// Reject coefficients or body metrics the formulas cannot use
    pub fn validate(&self) -> Result<()> {
        self.calculation
            .validate()
            .with_context(|| "Invalid [calculation] section")?;
        calories::validate_body_metrics("athlete profile", self.athlete.weight_kg, self.athlete.height_m)
            .with_context(|| "Invalid [athlete] section")?;
        Ok(())
    }

    /// Report formatter using the configured coefficients
    pub fn formatter(&self) -> Result<ReportFormatter> {
        Ok(ReportFormatter::with_settings(self.calculation)?)
    }
}
