// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the timeline engine.

use crate::keyframe::Easing;
use crate::layer::LayerId;
use crate::property::{Property, PropertyValue};
use crate::timecode::Millis;
use thiserror::Error;

/// Timeline errors
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Snapshot text failed shape or type validation
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Tween requested across keyframes with different easing kinds
    #[error("Unknown easing pair: {prev} -> {next}")]
    UnknownEasingPair {
        /// Easing of the keyframe before the query time
        prev: Easing,
        /// Easing of the keyframe after the query time
        next: Easing,
    },

    /// Property key outside the supported set
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Keyframe targets a layer that does not exist
    #[error("Layer not found: {0}")]
    UnknownLayer(LayerId),

    /// Value does not fit the property's value kind
    #[error("Invalid value for {property}: {value}")]
    InvalidValue {
        /// Target property
        property: Property,
        /// Rejected value
        value: PropertyValue,
    },

    /// Pass-through property keyed after layer creation
    #[error("{property} can only be keyed at time 0, got {time}")]
    PassThroughKeyframe {
        /// Non-tweenable property
        property: Property,
        /// Rejected keyframe time
        time: Millis,
    },

    /// Composition dimensions or frame rate out of range
    #[error("Invalid composition: {0}")]
    InvalidComposition(String),

    /// Snapshot could not be written
    #[error("Encode error: {0}")]
    Encode(String),
}

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;
