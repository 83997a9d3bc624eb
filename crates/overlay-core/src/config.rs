//! Engine configuration.
//!
//! Settings can be built in code, deserialized from a host-supplied object,
//! or read from a TOML file such as:
//!
//! ```toml
//! max_input_bytes = 5242880
//! max_image_dimension = 8192
//! apply_exif_orientation = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upload size limit (10 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Default maximum edge length of a decoded image.
pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 16_384;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Limits and switches for image loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum accepted size of an encoded upload in bytes.
    pub max_input_bytes: usize,
    /// Maximum width or height of a decoded image in pixels.
    pub max_image_dimension: u32,
    /// Rotate/flip decoded photos according to their EXIF orientation tag.
    pub apply_exif_orientation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
            apply_exif_orientation: true,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }
}
