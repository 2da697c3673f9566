//! Configuration file support for the viewers.
//!
//! Settings are stored as pretty-printed JSON. Every field has a default, so
//! a partial file (or `{}`) is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTAINER_SIZE, IMAGE_STROKE_WIDTH, IMAGE_ZOOM_FACTOR, PDF_HIGHLIGHT_ALPHA,
    PDF_INITIAL_SCALE, PDF_MAX_SCALE, PDF_MIN_SCALE, PDF_PAGE_SPACING, PDF_SCALE_STEP,
};
use crate::coords::YAxis;
use crate::model::SurfaceGeometry;
use crate::pdf_viewport::ScaleBounds;
use crate::zoom_math::ZoomLimits;

/// Verbosity of the `log` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    /// Pass completions and config loads
    #[default]
    Info,
    /// Per-surface rendering and zoom changes
    Debug,
    /// Per-highlight drawing
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match *self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    /// Case-insensitive level name, as given on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(ConfigError::Invalid(format!("Unknown log level '{}'", other))),
        }
    }
}

/// Format version written to new files; files with a higher version are
/// rejected.
pub const CONFIG_VERSION: u32 = 1;

/// Image viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageViewerConfig {
    /// Multiplicative zoom step
    pub zoom_factor: f32,
    /// Optional zoom bounds; unbounded when both are absent
    pub zoom_limits: ZoomLimits,
    /// Highlight outline width in pixels
    pub stroke_width: f32,
    /// Container size used when the host does not report one
    pub default_container: (f32, f32),
    /// Y direction of image annotations
    pub y_axis: YAxis,
}

impl Default for ImageViewerConfig {
    fn default() -> Self {
        Self {
            zoom_factor: IMAGE_ZOOM_FACTOR,
            zoom_limits: ZoomLimits::UNBOUNDED,
            stroke_width: IMAGE_STROKE_WIDTH,
            default_container: DEFAULT_CONTAINER_SIZE,
            y_axis: YAxis::TopDown,
        }
    }
}

impl ImageViewerConfig {
    pub fn default_container_geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry::new(self.default_container.0, self.default_container.1)
    }
}

/// PDF viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfViewerConfig {
    pub initial_scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub scale_step: f32,
    /// Vertical gap between pages in pixels
    pub page_spacing: f32,
    /// Fill alpha of highlights
    pub highlight_alpha: f32,
    /// Y direction of PDF annotations
    pub y_axis: YAxis,
    /// Quiet period before a zoom change triggers re-rasterization
    pub rerender_delay_ms: u64,
}

impl Default for PdfViewerConfig {
    fn default() -> Self {
        Self {
            initial_scale: PDF_INITIAL_SCALE,
            min_scale: PDF_MIN_SCALE,
            max_scale: PDF_MAX_SCALE,
            scale_step: PDF_SCALE_STEP,
            page_spacing: PDF_PAGE_SPACING,
            highlight_alpha: PDF_HIGHLIGHT_ALPHA,
            y_axis: YAxis::BottomUp,
            rerender_delay_ms: 0,
        }
    }
}

impl PdfViewerConfig {
    pub fn scale_bounds(&self) -> ScaleBounds {
        ScaleBounds {
            min: self.min_scale,
            max: self.max_scale,
            step: self.scale_step,
        }
    }

    pub fn rerender_delay(&self) -> Duration {
        Duration::from_millis(self.rerender_delay_ms)
    }
}

/// Viewer configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub image: ImageViewerConfig,

    #[serde(default)]
    pub pdf: PdfViewerConfig,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl ViewerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            image: ImageViewerConfig::default(),
            pdf: PdfViewerConfig::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        if !(config.pdf.min_scale > 0.0 && config.pdf.min_scale <= config.pdf.max_scale) {
            return Err(ConfigError::Invalid(format!(
                "PDF scale range [{}, {}] is empty",
                config.pdf.min_scale, config.pdf.max_scale
            )));
        }

        if config.image.zoom_factor <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "Image zoom factor must be greater than 1, got {}",
                config.image.zoom_factor
            )));
        }

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "hlview-config.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("hlview").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home| {
                home.join(".config")
                    .join("hlview")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to a file, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
