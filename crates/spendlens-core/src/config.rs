//! Analysis configuration
//!
//! Thresholds used by the analyzer, the insight generator, and the reports.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/spendlens/config/analysis.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Thresholds for spending analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    /// |z-score| above which an expense is unusual (strict)
    pub anomaly_z_threshold: f64,
    /// |z-score| above which an unusual expense is high severity
    pub high_severity_z_threshold: f64,
    /// Global record count required before anomaly detection runs
    pub min_anomaly_records: usize,
    /// Trend ratio above which spending is increasing
    pub trend_increase_threshold: f64,
    /// Trend ratio below which spending is decreasing
    pub trend_decrease_threshold: f64,
    /// Savings rate (%) below which the rate is low
    pub savings_low_rate: f64,
    /// Recommended savings rate (%)
    pub savings_target_rate: f64,
    /// Categories shown in the category breakdown
    pub category_breakdown_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            anomaly_z_threshold: 2.0,
            high_severity_z_threshold: 3.0,
            min_anomaly_records: 3,
            trend_increase_threshold: 1.2,
            trend_decrease_threshold: 0.8,
            savings_low_rate: 10.0,
            savings_target_rate: 20.0,
            category_breakdown_limit: 10,
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Embedded defaults
    Embedded,
    /// A TOML file on disk
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Embedded => write!(f, "embedded defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration (explicit path or data-dir override first, then default)
    ///
    /// An explicit path that does not exist is an error; a missing data-dir
    /// override silently falls back to the embedded defaults.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            let config = Self::from_file(path)?;
            tracing::debug!(path = %path.display(), "Loaded analysis config");
            return Ok((config, ConfigSource::File(path.to_path_buf())));
        }

        if let Some(default_path) = default_config_path() {
            if default_path.exists() {
                let config = Self::from_file(&default_path)?;
                tracing::debug!(path = %default_path.display(), "Loaded analysis config override");
                return Ok((config, ConfigSource::File(default_path)));
            }
        }

        tracing::debug!("Using embedded analysis config");
        Ok((Self::from_toml(DEFAULT_CONFIG)?, ConfigSource::Embedded))
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse TOML, applying present keys over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(anomalies) = raw.anomalies {
            if let Some(z) = anomalies.z_threshold {
                config.anomaly_z_threshold = z;
            }
            if let Some(z) = anomalies.high_severity_z_threshold {
                config.high_severity_z_threshold = z;
            }
            if let Some(n) = anomalies.min_records {
                config.min_anomaly_records = n;
            }
        }

        if let Some(trend) = raw.trend {
            if let Some(t) = trend.increase_threshold {
                config.trend_increase_threshold = t;
            }
            if let Some(t) = trend.decrease_threshold {
                config.trend_decrease_threshold = t;
            }
        }

        if let Some(savings) = raw.savings {
            if let Some(rate) = savings.low_rate {
                config.savings_low_rate = rate;
            }
            if let Some(rate) = savings.target_rate {
                config.savings_target_rate = rate;
            }
        }

        if let Some(reports) = raw.reports {
            if let Some(limit) = reports.category_limit {
                config.category_breakdown_limit = limit;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject threshold combinations that would make the rules contradictory
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("anomalies.z_threshold", self.anomaly_z_threshold),
            (
                "anomalies.high_severity_z_threshold",
                self.high_severity_z_threshold,
            ),
            ("trend.increase_threshold", self.trend_increase_threshold),
            ("trend.decrease_threshold", self.trend_decrease_threshold),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a positive number, got {}",
                    key, value
                )));
            }
        }

        if self.high_severity_z_threshold <= self.anomaly_z_threshold {
            return Err(Error::Config(
                "anomalies.high_severity_z_threshold must exceed anomalies.z_threshold".into(),
            ));
        }
        if self.trend_decrease_threshold >= self.trend_increase_threshold {
            return Err(Error::Config(
                "trend.decrease_threshold must be below trend.increase_threshold".into(),
            ));
        }
        if self.savings_low_rate >= self.savings_target_rate {
            return Err(Error::Config(
                "savings.low_rate must be below savings.target_rate".into(),
            ));
        }

        Ok(())
    }
}

/// Get the default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendlens").join("config").join("analysis.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    anomalies: Option<RawAnomalies>,
    trend: Option<RawTrend>,
    savings: Option<RawSavings>,
    reports: Option<RawReports>,
}

#[derive(Debug, Deserialize)]
struct RawAnomalies {
    z_threshold: Option<f64>,
    high_severity_z_threshold: Option<f64>,
    min_records: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawTrend {
    increase_threshold: Option<f64>,
    decrease_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSavings {
    low_rate: Option<f64>,
    target_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawReports {
    category_limit: Option<usize>,
}
