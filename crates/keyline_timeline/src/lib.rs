// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline engine for the Keyline animation editor.
//!
//! This crate stores and evaluates keyframe animation:
//! - Sparse per-property keyframe tracks per layer
//! - Surrounding-keyframe lookup for any query time
//! - Linear and circular ease-in-out tweening
//! - Frame index to timecode conversion
//! - JSON snapshots of a whole composition
//!
//! ## Architecture
//!
//! A [`Composition`] owns its layers and a [`KeyframeStore`]
//! (`layer -> property -> timestamp -> keyframe`). Evaluating a layer at a
//! time looks up the keyframes at-or-before and at-or-after that time on
//! each [`Track`] and tweens between them. Nothing here renders or keeps
//! playback state; that lives with the driver.

pub mod composition;
pub mod error;
pub mod keyframe;
pub mod layer;
pub mod property;
pub mod snapshot;
pub mod store;
pub mod timecode;
pub mod track;

pub use composition::{Composition, LayerState};
pub use error::{Result, TimelineError};
pub use keyframe::{evaluate, Easing, Interpolation, Keyframe, Sample};
pub use layer::{Layer, LayerId, LayerTemplate};
pub use property::{Property, PropertyValue, ValueKind};
pub use snapshot::{Snapshot, SnapshotFrame};
pub use store::{KeyframeStore, LayerTracks};
pub use timecode::{frame_to_time, time_to_frame, Millis, Timecode};
pub use track::Track;
