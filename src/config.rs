//! Configuration module.
//!
//! Handles loading, validating, and merging a `config.toml`. Stock defaults
//! are the base layer; a user file overrides any subset of keys; CLI flags
//! override both (applied in `main.rs`).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [squeeze]
//! quality = 0.85            # JPEG quality, 0.0 (smallest) to 1.0 (best)
//!
//! [target]
//! width = 1080              # Bounding box the photo is shrunk into
//! height = 1920
//!
//! [report]
//! binary_units = false      # KiB/MiB instead of KB/MB
//!
//! [logging]
//! filter = "warn"           # tracing filter when RUST_LOG is unset
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, TargetSize};
use crate::metrics::ByteUnits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// All fields have defaults; a user file need only name what it overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Encoder settings.
    pub squeeze: SqueezeConfig,
    /// Bounding box for the fit-scale.
    pub target: TargetConfig,
    /// Report formatting.
    pub report: ReportConfig,
    /// Diagnostic logging.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.squeeze.quality) {
            return Err(ConfigError::Validation(
                "squeeze.quality must be 0.0-1.0".into(),
            ));
        }
        if self.target.width == 0 || self.target.height == 0 {
            return Err(ConfigError::Validation(
                "target.width and target.height must be non-zero".into(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.filter must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Validated quality. Only meaningful after [`validate`](Self::validate).
    pub fn quality(&self) -> Result<Quality, ConfigError> {
        Quality::new(self.squeeze.quality).map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Validated target size.
    pub fn target_size(&self) -> Result<TargetSize, ConfigError> {
        TargetSize::new(self.target.width, self.target.height)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    pub fn byte_units(&self) -> ByteUnits {
        if self.report.binary_units {
            ByteUnits::Binary
        } else {
            ByteUnits::Decimal
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqueezeConfig {
    /// JPEG quality (0.0 = smallest file, 1.0 = best fidelity).
    pub quality: f32,
}

impl Default for SqueezeConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
        }
    }
}

/// Bounding box in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        let (width, height) = TargetSize::default().as_tuple();
        Self { width, height }
    }
}

/// Report formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Use powers of 1024 (KiB, MiB) instead of powers of 1000 (KB, MB).
    pub binary_units: bool,
}

/// Diagnostic logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive, used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file path.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load config from `path` if given, stock defaults otherwise.
pub fn load_optional_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(p) => load_config(p),
        None => resolve_config(None),
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-squeeze configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Encoder
# ---------------------------------------------------------------------------
[squeeze]
# JPEG quality from 0.0 (smallest file) to 1.0 (best fidelity).
quality = 0.85

# ---------------------------------------------------------------------------
# Bounding box
# ---------------------------------------------------------------------------
[target]
# The photo is scaled down (never up) to fit inside width x height,
# preserving its aspect ratio.
width = 1080
height = 1920

# ---------------------------------------------------------------------------
# Report
# ---------------------------------------------------------------------------
[report]
# Show sizes in KiB/MiB (powers of 1024) instead of KB/MB (powers of 1000).
binary_units = false

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# tracing filter directive used when RUST_LOG is not set, e.g. "debug".
filter = "warn"
"##
}
