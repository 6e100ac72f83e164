//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `scenario-config.yaml` at the
//! project root. Every field has a default, so an empty file (or no file at
//! all) yields a working setup: ten-year timelines, 700 pixels wide, with
//! new interventions created as taxes.
//!
//! The scenario span is handed to the manager and the editor explicitly at
//! construction; nothing looks it up from a UI control at runtime.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use scenario_types::{CancelPolicy, InterventionKind};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The YAML parsed but a value is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `scenario-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudioConfig {
    /// Scenario defaults.
    #[serde(default)]
    pub scenario: ScenarioConfig,

    /// Pixel geometry reported to the renderer.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Intervention editor behavior.
    #[serde(default)]
    pub editor: EditorConfig,

    /// HTTP service settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StudioConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml maps an empty document to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scenario.span_years == 0 {
            return Err(ConfigError::Invalid {
                field: "scenario.span_years",
                reason: String::from("must be at least 1"),
            });
        }
        if self.layout.timeline_width == 0 {
            return Err(ConfigError::Invalid {
                field: "layout.timeline_width",
                reason: String::from("must be at least 1 pixel"),
            });
        }
        if self.layout.timeline_height == 0 {
            return Err(ConfigError::Invalid {
                field: "layout.timeline_height",
                reason: String::from("must be at least 1 pixel"),
            });
        }
        Ok(())
    }
}

/// Scenario defaults shared by the manager and the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScenarioConfig {
    /// Number of years every new timeline covers.
    #[serde(default = "default_span_years")]
    pub span_years: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            span_years: default_span_years(),
        }
    }
}

/// Pixel geometry of timelines and markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LayoutConfig {
    /// Left edge of every timeline bar.
    #[serde(default = "default_origin_x")]
    pub origin_x: u32,

    /// Width of a timeline bar; the full span maps onto it.
    #[serde(default = "default_timeline_width")]
    pub timeline_width: u32,

    /// Height of a timeline bar.
    #[serde(default = "default_timeline_height")]
    pub timeline_height: u32,

    /// Vertical gap between stacked timelines.
    #[serde(default = "default_padding")]
    pub padding: u32,

    /// Height of the viewport; timelines stack upward from its bottom.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Width of an intervention marker.
    #[serde(default = "default_marker_width")]
    pub marker_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: default_origin_x(),
            timeline_width: default_timeline_width(),
            timeline_height: default_timeline_height(),
            padding: default_padding(),
            viewport_height: default_viewport_height(),
            marker_width: default_marker_width(),
        }
    }
}

impl LayoutConfig {
    /// Timeline width as a floating-point pixel count.
    pub fn width_pixels(&self) -> f64 {
        f64::from(self.timeline_width)
    }
}

/// Intervention editor behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EditorConfig {
    /// Kind given to an intervention placed by a timeline click.
    #[serde(default = "default_kind")]
    pub default_kind: InterventionKind,

    /// What cancelling does to a never-saved new intervention.
    #[serde(default)]
    pub cancel_policy: CancelPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_kind: default_kind(),
            cancel_policy: CancelPolicy::default(),
        }
    }
}

/// HTTP service settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON file holding the persisted scenario document. When unset the
    /// document lives only in memory.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store_path: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is
    /// not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_span_years() -> u32 {
    10
}

const fn default_origin_x() -> u32 {
    150
}

const fn default_timeline_width() -> u32 {
    700
}

const fn default_timeline_height() -> u32 {
    25
}

const fn default_padding() -> u32 {
    10
}

const fn default_viewport_height() -> u32 {
    600
}

const fn default_marker_width() -> u32 {
    4
}

const fn default_kind() -> InterventionKind {
    InterventionKind::Tax
}

fn default_host() -> String {
    String::from("127.0.0.1")
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    String::from("info")
}
