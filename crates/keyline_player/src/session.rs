// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session: the composition plus the playhead and selection.

use crate::config::{ConfigError, EditorConfig};
use indexmap::IndexMap;
use keyline_timeline::{
    Composition, LayerId, LayerState, LayerTemplate, Millis, Property, PropertyValue, Result,
    Timecode,
};
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Ticks are ignored
    #[default]
    Stopped,
    /// Each tick advances one frame, wrapping at the end
    Playing,
}

/// Editing session driving one composition
#[derive(Debug, Clone)]
pub struct Session {
    composition: Composition,
    /// Frame under the playhead
    current_frame: u64,
    /// Index of the selected layer
    current_layer: Option<usize>,
    state: PlaybackState,
    layer_template: LayerTemplate,
}

impl Session {
    /// Create a session with an empty composition
    pub fn new(config: &EditorConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self::with_composition(
            config.composition.create()?,
            config.new_layer.clone(),
        ))
    }

    /// Create a session around an existing composition
    pub fn with_composition(composition: Composition, layer_template: LayerTemplate) -> Self {
        let current_layer = (!composition.layers().is_empty()).then_some(0);
        Self {
            composition,
            current_frame: 0,
            current_layer,
            state: PlaybackState::Stopped,
            layer_template,
        }
    }

    /// The edited composition
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Frame under the playhead
    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    /// Time of the current frame
    pub fn current_timecode(&self) -> Timecode {
        self.composition.frame_time(self.current_frame)
    }

    /// Time of the current frame in milliseconds
    pub fn current_millis(&self) -> Millis {
        self.current_timecode().total_millis()
    }

    /// Selected layer, if any
    pub fn current_layer(&self) -> Option<&LayerId> {
        self.current_layer
            .and_then(|index| self.composition.layer_at(index))
            .map(|layer| &layer.id)
    }

    /// Select a layer by creation index
    pub fn select_layer(&mut self, index: usize) -> bool {
        if index < self.composition.layers().len() {
            self.current_layer = Some(index);
            true
        } else {
            false
        }
    }

    /// Step one frame forward
    pub fn advance_frame(&mut self) {
        self.current_frame = self.current_frame.saturating_add(1);
    }

    /// Step one frame back, stopping at frame zero
    pub fn retreat_frame(&mut self) {
        self.current_frame = self.current_frame.saturating_sub(1);
    }

    /// Jump to a frame
    pub fn seek_frame(&mut self, frame: u64) {
        self.current_frame = frame;
    }

    /// Start playback
    pub fn play(&mut self) {
        if self.state != PlaybackState::Playing {
            tracing::info!(frame = self.current_frame, "playback started");
        }
        self.state = PlaybackState::Playing;
    }

    /// Stop playback, keeping the playhead where it is
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            tracing::info!(frame = self.current_frame, "playback stopped");
        }
        self.state = PlaybackState::Stopped;
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Stopped => self.play(),
        }
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current playback state
    pub fn playback_state(&self) -> PlaybackState {
        self.state
    }

    /// Period of the playback timer
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.composition.frame_rate().get()
    }

    /// Handle one playback timer tick.
    ///
    /// Advances one frame unless that frame's time lies past the
    /// composition's duration, in which case the playhead wraps to frame
    /// zero. Returns whether the frame changed.
    pub fn tick(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }

        let previous = self.current_frame;
        let next = self.current_frame.saturating_add(1);
        if self.composition.frame_time(next).total_millis() > self.composition.duration() {
            self.current_frame = 0;
        } else {
            self.current_frame = next;
        }
        self.current_frame != previous
    }

    /// Add a layer using the configured template and select it
    pub fn add_layer(&mut self) -> Result<LayerId> {
        let id = self.composition.add_layer(&self.layer_template)?;
        self.current_layer = Some(self.composition.layers().len() - 1);
        tracing::info!(layer = %id, "layer added");
        Ok(id)
    }

    /// Record a property value on the selected layer at the current time.
    ///
    /// Returns `Ok(false)` when no layer is selected.
    pub fn set_property(
        &mut self,
        property: Property,
        value: impl Into<PropertyValue>,
    ) -> Result<bool> {
        let Some(layer) = self.current_layer().cloned() else {
            return Ok(false);
        };
        let time = self.current_millis();
        self.composition.set_keyframe(&layer, time, property, value)?;
        Ok(true)
    }

    /// Record a drag of the selected layer to a new position
    pub fn record_drag(&mut self, left: f64, top: f64) -> Result<bool> {
        Ok(self.set_property(Property::Left, left)? && self.set_property(Property::Top, top)?)
    }

    /// Record a resize of the selected layer
    pub fn record_resize(&mut self, width: f64, height: f64) -> Result<bool> {
        Ok(self.set_property(Property::Width, width)?
            && self.set_property(Property::Height, height)?)
    }

    /// Remove the selected layer's keyframe at the current time
    pub fn clear_property(&mut self, property: Property) -> bool {
        let Some(layer) = self.current_layer().cloned() else {
            return false;
        };
        let time = self.current_millis();
        self.composition.remove_keyframe(&layer, time, property)
    }

    /// Replace the selected layer's text content
    pub fn set_layer_text(&mut self, text: impl Into<String>) -> Result<bool> {
        let Some(layer) = self.current_layer().cloned() else {
            return Ok(false);
        };
        self.composition.set_layer_html(&layer, text)?;
        Ok(true)
    }

    /// Properties of the selected layer keyed at the current time
    pub fn keyed_properties(&self) -> Vec<Property> {
        match self.current_layer() {
            Some(layer) => self
                .composition
                .tracks()
                .keyed_properties(layer, self.current_millis()),
            None => Vec::new(),
        }
    }

    /// Evaluate every layer at the current time
    pub fn frame_state(&self) -> Result<IndexMap<LayerId, LayerState>> {
        self.composition.evaluate(self.current_millis())
    }

    /// Serialize the composition to snapshot JSON
    pub fn snapshot(&self) -> Result<String> {
        self.composition.to_json()
    }

    /// Replace the composition from snapshot JSON.
    ///
    /// On error the session is unchanged. On success the first layer is
    /// selected.
    pub fn load_snapshot(&mut self, json: &str) -> Result<()> {
        self.composition.load_json(json)?;
        self.current_layer = (!self.composition.layers().is_empty()).then_some(0);
        Ok(())
    }
}
