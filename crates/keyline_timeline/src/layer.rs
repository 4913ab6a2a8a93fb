// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layers: the animatable elements of a composition.

use crate::property::PropertyValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every layer id
const LAYER_ID_PREFIX: &str = "layer";

/// Stable layer identifier, `"layer"` followed by the creation index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Create the id for the layer created at `index`
    pub fn from_index(index: usize) -> Self {
        Self(format!("{LAYER_ID_PREFIX}{index}"))
    }

    /// Creation index encoded in this id, if it follows the naming scheme
    pub fn index(&self) -> Option<usize> {
        self.0.strip_prefix(LAYER_ID_PREFIX)?.parse().ok()
    }

    /// Get the raw id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// An animatable element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Unique layer id
    pub id: LayerId,
    /// Element tag the renderer creates
    pub tag: String,
    /// Inner content
    pub html: String,
    /// Stacking order assigned at creation
    #[serde(default)]
    pub z_index: i64,
}

/// Initial state written when a layer is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerTemplate {
    /// Element tag
    pub tag: String,
    /// Positioning keyword
    pub position: String,
    /// Initial left offset
    pub left: PropertyValue,
    /// Initial top offset
    pub top: PropertyValue,
    /// Initial text size
    pub font_size: PropertyValue,
    /// Initial opacity
    pub opacity: PropertyValue,
}

impl Default for LayerTemplate {
    fn default() -> Self {
        Self {
            tag: "span".to_string(),
            position: "absolute".to_string(),
            left: "100px".into(),
            top: "100px".into(),
            font_size: "27px".into(),
            opacity: 1.0.into(),
        }
    }
}
