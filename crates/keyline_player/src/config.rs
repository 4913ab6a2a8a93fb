// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration.
//!
//! Settings are stored as RON and cover:
//! - Composition defaults (canvas size, frame rate)
//! - The initial state of newly added layers

use keyline_timeline::{Composition, LayerTemplate, TimelineError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "keyline.ron";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be written as RON
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Settings parsed but are out of range
    #[error("Invalid config: {0}")]
    Invalid(#[from] TimelineError),
}

/// Canvas settings for new compositions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionSettings {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Frames per second
    pub frame_rate: u32,
}

impl Default for CompositionSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            frame_rate: 30,
        }
    }
}

impl CompositionSettings {
    /// Create an empty composition with these settings
    pub fn create(&self) -> Result<Composition, ConfigError> {
        Ok(Composition::new(self.width, self.height, self.frame_rate)?)
    }
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Format version
    pub version: u32,
    /// New composition settings
    pub composition: CompositionSettings,
    /// Initial state of added layers
    pub new_layer: LayerTemplate,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            composition: CompositionSettings::default(),
            new_layer: LayerTemplate::default(),
        }
    }
}

impl EditorConfig {
    /// Parse from RON; missing fields take their defaults
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&text)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check the settings produce a usable composition
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.composition.create()?;
        Ok(())
    }
}
