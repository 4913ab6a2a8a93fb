// SPDX-License-Identifier: MIT OR Apache-2.0
//! Composition: canvas settings, layers and their keyframes.

use crate::error::{Result, TimelineError};
use crate::keyframe::Keyframe;
use crate::layer::{Layer, LayerId, LayerTemplate};
use crate::property::{Property, PropertyValue};
use crate::store::KeyframeStore;
use crate::timecode::{self, Millis, Timecode};
use indexmap::IndexMap;
use std::num::NonZeroU32;

const fn non_zero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("zero default"),
    }
}

const DEFAULT_WIDTH: NonZeroU32 = non_zero(1280);
const DEFAULT_HEIGHT: NonZeroU32 = non_zero(720);
const DEFAULT_FRAME_RATE: NonZeroU32 = non_zero(30);

/// Evaluated property values of one layer at one time
pub type LayerState = IndexMap<Property, PropertyValue>;

/// The animated scene
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub(crate) width: NonZeroU32,
    pub(crate) height: NonZeroU32,
    pub(crate) frame_rate: NonZeroU32,
    /// Latest keyframe time, kept in sync on every mutation
    pub(crate) duration: Millis,
    pub(crate) layers: Vec<Layer>,
    pub(crate) tracks: KeyframeStore,
}

impl Composition {
    /// Create an empty composition
    pub fn new(width: u32, height: u32, frame_rate: u32) -> Result<Self> {
        let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Err(TimelineError::InvalidComposition(format!(
                "size must be positive, got {width}x{height}"
            )));
        };
        let frame_rate = NonZeroU32::new(frame_rate).ok_or_else(|| {
            TimelineError::InvalidComposition("frame rate must be positive".to_string())
        })?;

        Ok(Self {
            width,
            height,
            frame_rate,
            duration: 0,
            layers: Vec::new(),
            tracks: KeyframeStore::new(),
        })
    }

    /// Canvas width
    pub fn width(&self) -> NonZeroU32 {
        self.width
    }

    /// Canvas height
    pub fn height(&self) -> NonZeroU32 {
        self.height
    }

    /// Frames per second
    pub fn frame_rate(&self) -> NonZeroU32 {
        self.frame_rate
    }

    /// Time of the latest keyframe, 0 when there are none
    pub fn duration(&self) -> Millis {
        self.duration
    }

    /// Layers in creation order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Get a layer by id
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| &layer.id == id)
    }

    /// Get a layer by creation index
    pub fn layer_at(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Keyframe storage
    pub fn tracks(&self) -> &KeyframeStore {
        &self.tracks
    }

    /// Time shown at `frame`
    pub fn frame_time(&self, frame: u64) -> Timecode {
        timecode::frame_to_time(frame, self.frame_rate)
    }

    /// Frame showing the end of the composition
    pub fn last_frame(&self) -> u64 {
        timecode::time_to_frame(self.duration, self.frame_rate)
    }

    /// Append a layer and write its creation keyframes at time zero.
    ///
    /// Ids are never reused: the new index is past every existing one.
    pub fn add_layer(&mut self, template: &LayerTemplate) -> Result<LayerId> {
        let index = self.next_layer_index();
        let id = LayerId::from_index(index);
        let z_index = index as i64 + 1;

        let initial = [
            (Property::Position, PropertyValue::Text(template.position.clone())),
            (Property::Left, template.left.clone()),
            (Property::Top, template.top.clone()),
            (Property::FontSize, template.font_size.clone()),
            (Property::Opacity, template.opacity.clone()),
            (Property::ZIndex, PropertyValue::Number(z_index as f64)),
        ];
        if let Some((property, value)) = initial.iter().find(|(p, v)| !p.accepts(v)) {
            return Err(TimelineError::InvalidValue {
                property: *property,
                value: value.clone(),
            });
        }

        self.layers.push(Layer {
            id: id.clone(),
            tag: template.tag.clone(),
            html: format!("layer {index}"),
            z_index,
        });
        for (property, value) in initial {
            self.tracks.set_keyframe(&id, 0, property, Keyframe::new(value))?;
        }
        self.recompute_duration();

        tracing::debug!(layer = %id, tag = %template.tag, "added layer");
        Ok(id)
    }

    /// Replace a layer's content
    pub fn set_layer_html(&mut self, id: &LayerId, html: impl Into<String>) -> Result<()> {
        let layer = self
            .layers
            .iter_mut()
            .find(|layer| &layer.id == id)
            .ok_or_else(|| TimelineError::UnknownLayer(id.clone()))?;
        layer.html = html.into();
        Ok(())
    }

    /// Insert or overwrite a linear keyframe
    pub fn set_keyframe(
        &mut self,
        layer: &LayerId,
        time: Millis,
        property: Property,
        value: impl Into<PropertyValue>,
    ) -> Result<()> {
        self.set_keyframe_with_easing(layer, time, property, Keyframe::new(value))
    }

    /// Insert or overwrite a keyframe with its easing kind
    pub fn set_keyframe_with_easing(
        &mut self,
        layer: &LayerId,
        time: Millis,
        property: Property,
        keyframe: Keyframe,
    ) -> Result<()> {
        if self.layer(layer).is_none() {
            return Err(TimelineError::UnknownLayer(layer.clone()));
        }
        self.tracks.set_keyframe(layer, time, property, keyframe)?;
        self.recompute_duration();
        Ok(())
    }

    /// Remove a keyframe if present; returns whether it existed
    pub fn remove_keyframe(&mut self, layer: &LayerId, time: Millis, property: Property) -> bool {
        let existed = self.tracks.remove_keyframe(layer, time, property);
        if existed {
            self.recompute_duration();
        }
        existed
    }

    /// Check if a keyframe exists exactly at `time`
    pub fn has_keyframe(&self, layer: &LayerId, time: Millis, property: Property) -> bool {
        self.tracks.has_keyframe(layer, time, property)
    }

    /// Latest keyframe time at or before `time`
    pub fn find_prev(&self, layer: &LayerId, property: Property, time: Millis) -> Option<Millis> {
        self.tracks.find_prev(layer, property, time)
    }

    /// Earliest keyframe time at or after `time`
    pub fn find_next(&self, layer: &LayerId, property: Property, time: Millis) -> Option<Millis> {
        self.tracks.find_next(layer, property, time)
    }

    /// Property values of one layer at `time`.
    ///
    /// Properties without keyframes are absent. Pass-through properties
    /// always read their time-zero keyframe.
    pub fn evaluate_layer(&self, layer: &LayerId, time: Millis) -> Result<LayerState> {
        if self.layer(layer).is_none() {
            return Err(TimelineError::UnknownLayer(layer.clone()));
        }

        let mut state = LayerState::new();
        let Some(tracks) = self.tracks.layer_tracks(layer) else {
            return Ok(state);
        };
        for property in Property::ALL {
            let Some(track) = tracks.get(&property) else {
                continue;
            };
            let value = if property.is_tweenable() {
                track.evaluate(time)?
            } else {
                track.keyframe_at(0).map(|kf| kf.value.clone())
            };
            if let Some(value) = value {
                state.insert(property, value);
            }
        }
        Ok(state)
    }

    /// Property values of every layer at `time`, in layer order
    pub fn evaluate(&self, time: Millis) -> Result<IndexMap<LayerId, LayerState>> {
        self.layers
            .iter()
            .map(|layer| Ok((layer.id.clone(), self.evaluate_layer(&layer.id, time)?)))
            .collect()
    }

    fn next_layer_index(&self) -> usize {
        self.layers
            .iter()
            .filter_map(|layer| layer.id.index())
            .map(|index| index + 1)
            .max()
            .unwrap_or(0)
            .max(self.layers.len())
    }

    fn recompute_duration(&mut self) {
        self.duration = self.tracks.max_time();
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frame_rate: DEFAULT_FRAME_RATE,
            duration: 0,
            layers: Vec::new(),
            tracks: KeyframeStore::new(),
        }
    }
}
