//! Ingestion configuration.
//!
//! Handles loading, validating, and merging `coverbox.toml`. Stock defaults
//! are overridden by whatever the user file specifies; everything is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [limits]
//! max_file_size = 5242880   # Bytes; larger uploads are rejected (5 MiB)
//! accepted_types = ["image/jpeg", "image/png", "image/webp"]
//!
//! [preview]
//! max_size = 200            # Longer edge of the grid preview, in pixels
//! quality = 70              # JPEG quality (1-100)
//!
//! [full]
//! max_width = 1200          # Full image width cap
//! max_height = 1800         # Full image height cap
//! quality = 85              # JPEG quality (1-100)
//!
//! [catalog]
//! path = "comics.json"      # Where ingested records are stored
//! default_condition = "Near Mint"
//!
//! [logging]
//! level = "info"            # tracing filter; RUST_LOG takes precedence
//! format = "pretty"         # "pretty" or "json"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [full]
//! quality = 92
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{FullConfig, PreviewConfig, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
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

/// Ingestion configuration loaded from `coverbox.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Per-file acceptance rules.
    pub limits: LimitsConfig,
    /// Grid preview variant.
    pub preview: PreviewImageConfig,
    /// Full-size variant.
    pub full: FullImageConfig,
    /// Catalog storage and record defaults.
    pub catalog: CatalogConfig,
    /// Diagnostic logging.
    pub logging: LoggingConfig,
}

impl IngestConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size == 0 {
            return Err(ConfigError::Validation(
                "limits.max_file_size must be non-zero".into(),
            ));
        }
        if self.limits.accepted_types.is_empty() {
            return Err(ConfigError::Validation(
                "limits.accepted_types must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .limits
            .accepted_types
            .iter()
            .find(|t| !t.starts_with("image/"))
        {
            return Err(ConfigError::Validation(format!(
                "limits.accepted_types entry '{bad}' is not an image type"
            )));
        }
        if self.preview.max_size == 0 {
            return Err(ConfigError::Validation(
                "preview.max_size must be non-zero".into(),
            ));
        }
        if self.full.max_width == 0 || self.full.max_height == 0 {
            return Err(ConfigError::Validation(
                "full.max_width and full.max_height must be non-zero".into(),
            ));
        }
        for (key, quality) in [
            ("preview.quality", self.preview.quality),
            ("full.quality", self.full.quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Validation(format!("{key} must be 1-100")));
            }
        }
        Ok(())
    }

    /// Preview variant settings for the imaging layer.
    pub fn preview_config(&self) -> PreviewConfig {
        PreviewConfig {
            max_edge: self.preview.max_size,
            quality: Quality::new(self.preview.quality),
        }
    }

    /// Full variant settings for the imaging layer.
    pub fn full_config(&self) -> FullConfig {
        FullConfig {
            max_width: self.full.max_width,
            max_height: self.full.max_height,
            quality: Quality::new(self.full.quality),
        }
    }
}

/// Per-file acceptance rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest accepted declared size, in bytes.
    pub max_file_size: u64,
    /// Declared media types accepted for normalization.
    pub accepted_types: Vec<String>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024,
            accepted_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

/// Grid preview settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewImageConfig {
    /// Longer-edge cap in pixels.
    pub max_size: u32,
    pub quality: u8,
}

impl Default for PreviewImageConfig {
    fn default() -> Self {
        Self {
            max_size: 200,
            quality: 70,
        }
    }
}

/// Full-size image settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FullImageConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
}

impl Default for FullImageConfig {
    fn default() -> Self {
        Self {
            max_width: 1200,
            max_height: 1800,
            quality: 85,
        }
    }
}

/// Catalog storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// JSON file holding all records. Relative paths resolve from the
    /// working directory.
    pub path: PathBuf,
    /// Condition grade given to newly ingested records.
    pub default_condition: String,
}

impl CatalogConfig {
    /// The catalog file to use: `cli_override` when given, else `path`.
    pub fn resolve_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override.map_or_else(|| self.path.clone(), Path::to_path_buf)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("comics.json"),
            default_condition: "Near Mint".to_string(),
        }
    }
}

/// Log output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Diagnostic logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(IngestConfig::default()).expect("default config must serialize")
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `path`, falling back to stock defaults if it is absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<IngestConfig, ConfigError> {
    let merged = match load_raw_config(path)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: IngestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `coverbox.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# coverbox configuration
# ======================
#
# Every key is optional. Delete anything you don't want to change.

[limits]
# Uploads whose declared size exceeds this many bytes are rejected.
max_file_size = 5242880
# Declared media types that are decoded and normalized. Other image/* files
# are reported as invalid; non-image files make a batch with nothing else
# in it fail as a whole.
accepted_types = ["image/jpeg", "image/png", "image/webp"]

[preview]
# Grid preview: longer edge in pixels, JPEG quality 1-100.
max_size = 200
quality = 70

[full]
# Full image: width and height caps in pixels, JPEG quality 1-100.
# The tighter of the two caps decides the scale.
max_width = 1200
max_height = 1800
quality = 85

[catalog]
# JSON file ingested records are appended to.
path = "comics.json"
# Condition grade assigned to new records.
default_condition = "Near Mint"

[logging]
# tracing filter directive (RUST_LOG overrides it), e.g. "coverbox=debug".
level = "info"
# "pretty" for humans, "json" for log shippers.
format = "pretty"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_limits() {
        let config = IngestConfig::default();
        assert_eq!(config.limits.max_file_size, 5_242_880);
        assert_eq!(
            config.limits.accepted_types,
            vec!["image/jpeg", "image/png", "image/webp"]
        );
    }

    #[test]
    fn default_config_image_settings() {
        let config = IngestConfig::default();
        assert_eq!(config.preview.max_size, 200);
        assert_eq!(config.preview.quality, 70);
        assert_eq!(config.full.max_width, 1200);
        assert_eq!(config.full.max_height, 1800);
        assert_eq!(config.full.quality, 85);
        assert_eq!(config.catalog.default_condition, "Near Mint");
    }

    #[test]
    fn imaging_configs_follow_settings() {
        let mut config = IngestConfig::default();
        config.preview.max_size = 150;
        config.full.quality = 90;
        assert_eq!(config.preview_config().max_edge, 150);
        assert_eq!(config.preview_config().quality.value(), 70);
        assert_eq!(config.full_config().quality.value(), 90);
        assert_eq!(config.full_config().max_height, 1800);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[full]
quality = 92
"#;
        let config: IngestConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.full.quality, 92);
        assert_eq!(config.full.max_width, 1200);
        assert_eq!(config.preview.max_size, 200);
    }

    #[test]
    fn parse_log_format() {
        let toml = r#"
[logging]
format = "json"
"#;
        let config: IngestConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"quality = 85"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"quality = 70"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_table_merge_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
[full]
max_width = 1200
quality = 85
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[full]
quality = 60
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let full = merged.get("full").unwrap();
        assert_eq!(full.get("quality").unwrap().as_integer(), Some(60));
        assert_eq!(full.get("max_width").unwrap().as_integer(), Some(1200));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value =
            toml::from_str(r#"accepted_types = ["image/jpeg", "image/png"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"accepted_types = ["image/png"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(
            merged.get("accepted_types").unwrap().as_array().unwrap().len(),
            1
        );
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<IngestConfig, _> = toml::from_str("[preview]\nqualty = 70\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<IngestConfig, _> = toml::from_str("[thumbnails]\nsize = 1\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(IngestConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = IngestConfig::default();
        config.preview.quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = IngestConfig::default();
        config.full.quality = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = IngestConfig::default();
        config.full.quality = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_zero_caps() {
        let mut config = IngestConfig::default();
        config.preview.max_size = 0;
        assert!(config.validate().is_err());

        let mut config = IngestConfig::default();
        config.full.max_height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepted_types() {
        let mut config = IngestConfig::default();
        config.limits.accepted_types.clear();
        assert!(config.validate().is_err());

        let mut config = IngestConfig::default();
        config.limits.accepted_types.push("text/plain".into());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("text/plain"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("coverbox.toml")).unwrap();
        assert_eq!(config.full.quality, 85);
    }

    #[test]
    fn load_config_merges_file_over_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("coverbox.toml");
        fs::write(
            &path,
            r#"
[limits]
max_file_size = 1024

[catalog]
path = "library.json"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.limits.max_file_size, 1024);
        assert_eq!(config.limits.accepted_types.len(), 3);
        assert_eq!(config.catalog.path, PathBuf::from("library.json"));
        assert_eq!(config.catalog.default_condition, "Near Mint");
    }

    #[test]
    fn catalog_path_prefers_cli_override() {
        let catalog = CatalogConfig::default();
        assert_eq!(catalog.resolve_path(None), PathBuf::from("comics.json"));
        assert_eq!(
            catalog.resolve_path(Some(Path::new("/tmp/other.json"))),
            PathBuf::from("/tmp/other.json")
        );
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("coverbox.toml");
        fs::write(&path, "this is not [valid toml").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("coverbox.toml");
        fs::write(&path, "[preview]\nquality = 0\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("coverbox.toml");
        fs::write(&path, "[full]\nmax_widht = 10\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    // =========================================================================
    // stock config tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: IngestConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = IngestConfig::default();
        assert_eq!(config.limits.max_file_size, defaults.limits.max_file_size);
        assert_eq!(config.limits.accepted_types, defaults.limits.accepted_types);
        assert_eq!(config.preview.max_size, defaults.preview.max_size);
        assert_eq!(config.full.max_height, defaults.full.max_height);
        assert_eq!(config.catalog.path, defaults.catalog.path);
        assert_eq!(config.logging.format, defaults.logging.format);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for section in ["limits", "preview", "full", "catalog", "logging"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }
}
