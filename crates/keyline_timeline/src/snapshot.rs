// SPDX-License-Identifier: MIT OR Apache-2.0
//! Textual snapshots of a composition.
//!
//! The snapshot is the only exchanged state. Its JSON shape is
//! `{width, height, frameRate, duration, keyframes, layers}` where
//! `keyframes` maps `layerId -> timestamp -> {css: {property: value}}`.
//! Keyframes with a non-linear easing are listed in an optional
//! `easing: {property: kind}` map next to `css`.

use crate::composition::Composition;
use crate::error::{Result, TimelineError};
use crate::keyframe::{Easing, Keyframe};
use crate::layer::{Layer, LayerId};
use crate::property::{Property, PropertyValue};
use crate::store::KeyframeStore;
use crate::timecode::Millis;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::num::NonZeroU32;

/// Keyframes of one layer at one timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFrame {
    /// Property values
    pub css: IndexMap<Property, PropertyValue>,
    /// Easing kinds of non-linear keyframes
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub easing: IndexMap<Property, Easing>,
}

/// Serialized form of a [`Composition`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Canvas width
    pub width: NonZeroU32,
    /// Canvas height
    pub height: NonZeroU32,
    /// Frames per second
    pub frame_rate: NonZeroU32,
    /// Latest keyframe time in milliseconds
    pub duration: Millis,
    /// Keyframes per layer and timestamp
    pub keyframes: IndexMap<LayerId, BTreeMap<Millis, SnapshotFrame>>,
    /// Layers in creation order
    pub layers: Vec<Layer>,
}

impl Snapshot {
    /// Parse snapshot JSON without validating its contents
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TimelineError::MalformedSnapshot(e.to_string()))
    }
}

impl From<&Composition> for Snapshot {
    fn from(comp: &Composition) -> Self {
        let mut keyframes: IndexMap<LayerId, BTreeMap<Millis, SnapshotFrame>> = IndexMap::new();
        for (layer, property, time, keyframe) in comp.tracks.iter() {
            let frame = keyframes
                .entry(layer.clone())
                .or_default()
                .entry(time)
                .or_default();
            frame.css.insert(property, keyframe.value.clone());
            if keyframe.easing != Easing::Linear {
                frame.easing.insert(property, keyframe.easing);
            }
        }

        Self {
            width: comp.width,
            height: comp.height,
            frame_rate: comp.frame_rate,
            duration: comp.duration,
            keyframes,
            layers: comp.layers.clone(),
        }
    }
}

impl TryFrom<Snapshot> for Composition {
    type Error = TimelineError;

    fn try_from(snapshot: Snapshot) -> Result<Self> {
        let malformed = TimelineError::MalformedSnapshot;

        let mut ids = HashSet::new();
        for layer in &snapshot.layers {
            if !ids.insert(&layer.id) {
                return Err(malformed(format!("duplicate layer id {}", layer.id)));
            }
        }

        let mut tracks = KeyframeStore::new();
        for (layer, frames) in &snapshot.keyframes {
            if !ids.contains(layer) {
                return Err(malformed(format!("keyframes for unknown layer {layer}")));
            }
            for (&time, frame) in frames {
                if let Some(property) = frame.easing.keys().find(|p| !frame.css.contains_key(*p)) {
                    return Err(malformed(format!(
                        "easing without value for {layer}/{time}/{property}"
                    )));
                }
                for (&property, value) in &frame.css {
                    let easing = frame.easing.get(&property).copied().unwrap_or_default();
                    let keyframe = Keyframe::new(value.clone()).with_easing(easing);
                    tracks
                        .set_keyframe(layer, time, property, keyframe)
                        .map_err(|e| malformed(format!("{layer}/{time}: {e}")))?;
                }
            }
        }

        let max_time = tracks.max_time();
        if snapshot.duration != max_time {
            return Err(malformed(format!(
                "duration {} does not match last keyframe at {max_time}",
                snapshot.duration
            )));
        }

        Ok(Self {
            width: snapshot.width,
            height: snapshot.height,
            frame_rate: snapshot.frame_rate,
            duration: max_time,
            layers: snapshot.layers,
            tracks,
        })
    }
}

impl Composition {
    /// Capture the composition as a snapshot
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }

    /// Serialize to compact snapshot JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_snapshot()).map_err(|e| TimelineError::Encode(e.to_string()))
    }

    /// Serialize to indented snapshot JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| TimelineError::Encode(e.to_string()))
    }

    /// Build a composition from snapshot JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Snapshot::parse(json)?.try_into()
    }

    /// Replace this composition with the one in `json`.
    ///
    /// On error nothing is changed.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        match Self::from_json(json) {
            Ok(comp) => {
                tracing::info!(
                    layers = comp.layers.len(),
                    keyframes = comp.tracks.keyframe_count(),
                    duration = comp.duration,
                    "loaded snapshot"
                );
                *self = comp;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected snapshot: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerTemplate;

    fn sample_composition() -> Composition {
        let mut comp = Composition::new(640, 480, 24).unwrap();
        let first = comp.add_layer(&LayerTemplate::default()).unwrap();
        let second = comp.add_layer(&LayerTemplate::default()).unwrap();
        comp.set_keyframe(&first, 1000, Property::Left, "200px").unwrap();
        comp.set_keyframe(&first, 1000, Property::Opacity, 0.25).unwrap();
        comp.set_keyframe_with_easing(
            &second,
            0,
            Property::Width,
            Keyframe::new("10px").with_easing(Easing::Circular),
        )
        .unwrap();
        comp.set_keyframe_with_easing(
            &second,
            2000,
            Property::Width,
            Keyframe::new("90px").with_easing(Easing::Circular),
        )
        .unwrap();
        comp.set_layer_html(&second, "Title").unwrap();
        comp
    }

    #[test]
    fn test_round_trip() {
        let comp = sample_composition();
        let json = comp.to_json().unwrap();
        let loaded = Composition::from_json(&json).unwrap();
        assert_eq!(loaded, comp);
        assert_eq!(loaded.duration(), 2000);

        let pretty = comp.to_json_pretty().unwrap();
        assert_eq!(Composition::from_json(&pretty).unwrap(), comp);
    }

    /// Deterministic xorshift values in `[-500, 1500)` with full mantissas
    fn arbitrary_floats(mut seed: u64, count: usize) -> Vec<f64> {
        (0..count)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 7;
                seed ^= seed << 17;
                (seed >> 11) as f64 / (1u64 << 53) as f64 * 2000.0 - 500.0
            })
            .collect()
    }

    #[test]
    fn test_drag_positions_round_trip_exactly() {
        let mut comp = Composition::default();
        let id = comp.add_layer(&LayerTemplate::default()).unwrap();
        comp.set_keyframe(&id, 1000, Property::Left, 985.6906946328695).unwrap();
        comp.set_keyframe(&id, 1000, Property::Top, 0.1 + 0.2).unwrap();

        let loaded = Composition::from_json(&comp.to_json().unwrap()).unwrap();
        assert_eq!(
            loaded.tracks().keyframe(&id, 1000, Property::Left).map(|kf| &kf.value),
            Some(&PropertyValue::Number(985.6906946328695))
        );
        assert_eq!(loaded, comp);
    }

    #[test]
    fn test_arbitrary_values_round_trip() {
        let properties = [
            Property::Left,
            Property::Top,
            Property::Width,
            Property::Height,
            Property::FontSize,
            Property::Opacity,
        ];
        let mut comp = Composition::new(1920, 1080, 60).unwrap();
        let values = arbitrary_floats(0x9e37_79b9_7f4a_7c15, 600);
        let mut values = values.into_iter();

        for layer in 0..4 {
            let id = comp.add_layer(&LayerTemplate::default()).unwrap();
            for (i, property) in properties.into_iter().enumerate() {
                let easing = if (layer + i) % 2 == 0 { Easing::Circular } else { Easing::Linear };
                for step in 0..25 {
                    let Some(value) = values.next() else { break };
                    let time = step * 97 + layer as Millis * 13;
                    let keyframe = Keyframe::new(value).with_easing(easing);
                    comp.set_keyframe_with_easing(&id, time, property, keyframe).unwrap();
                }
            }
        }

        let loaded = Composition::from_json(&comp.to_json().unwrap()).unwrap();
        assert_eq!(loaded, comp);
        let pretty = Composition::from_json(&comp.to_json_pretty().unwrap()).unwrap();
        assert_eq!(pretty, comp);

        for time in [0, 48, 500, 1111, 2400] {
            assert_eq!(loaded.evaluate(time).unwrap(), comp.evaluate(time).unwrap());
        }
    }

    #[test]
    fn test_empty_round_trip() {
        let comp = Composition::default();
        let loaded = Composition::from_json(&comp.to_json().unwrap()).unwrap();
        assert_eq!(loaded, comp);
    }

    #[test]
    fn test_json_shape() {
        let comp = sample_composition();
        let value: serde_json::Value = serde_json::from_str(&comp.to_json().unwrap()).unwrap();
        assert_eq!(value["width"], 640);
        assert_eq!(value["frameRate"], 24);
        assert_eq!(value["duration"], 2000);
        assert_eq!(value["keyframes"]["layer0"]["1000"]["css"]["left"], "200px");
        assert_eq!(value["keyframes"]["layer0"]["0"]["css"]["font-size"], "27px");
        assert_eq!(value["keyframes"]["layer1"]["2000"]["easing"]["width"], "circular");
        assert!(value["keyframes"]["layer0"]["0"].get("easing").is_none());
        assert_eq!(value["layers"][1]["html"], "Title");
    }

    #[test]
    fn test_accepts_hand_written_snapshot() {
        let json = r#"{
            "width": 1280, "height": 720, "frameRate": 30, "duration": 1000,
            "keyframes": {"layer0": {
                "0": {"css": {"position": "absolute", "left": "100px"}},
                "1000": {"css": {"left": "200px"}}
            }},
            "layers": [{"id": "layer0", "tag": "span", "html": "layer 0"}]
        }"#;
        let comp = Composition::from_json(json).unwrap();
        let id = LayerId::from_index(0);
        let state = comp.evaluate_layer(&id, 500).unwrap();
        assert_eq!(state[&Property::Left], PropertyValue::Number(150.0));
        assert_eq!(comp.layer(&id).unwrap().z_index, 0);
    }

    #[test]
    fn test_missing_frame_rate_leaves_composition_untouched() {
        let mut comp = sample_composition();
        let before = comp.clone();
        let json = r#"{"width": 1, "height": 1, "duration": 0, "keyframes": {}, "layers": []}"#;

        let err = comp.load_json(json).unwrap_err();
        assert!(matches!(err, TimelineError::MalformedSnapshot(_)));
        assert_eq!(comp, before);
        assert_eq!(comp.frame_rate().get(), 24);
    }

    #[test]
    fn test_rejects_invalid_contents() {
        let cases = [
            // not JSON
            "{",
            // zero frame rate
            r#"{"width":1,"height":1,"frameRate":0,"duration":0,"keyframes":{},"layers":[]}"#,
            // wrong type
            r#"{"width":"wide","height":1,"frameRate":30,"duration":0,"keyframes":{},"layers":[]}"#,
            // unknown property
            r#"{"width":1,"height":1,"frameRate":30,"duration":0,
                "keyframes":{"layer0":{"0":{"css":{"color":"red"}}}},
                "layers":[{"id":"layer0","tag":"span","html":""}]}"#,
            // value of the wrong kind
            r#"{"width":1,"height":1,"frameRate":30,"duration":0,
                "keyframes":{"layer0":{"0":{"css":{"opacity":"none"}}}},
                "layers":[{"id":"layer0","tag":"span","html":""}]}"#,
            // keyframes for a missing layer
            r#"{"width":1,"height":1,"frameRate":30,"duration":0,
                "keyframes":{"layer3":{"0":{"css":{"left":"1px"}}}},
                "layers":[]}"#,
            // duplicate layer ids
            r#"{"width":1,"height":1,"frameRate":30,"duration":0,"keyframes":{},
                "layers":[{"id":"layer0","tag":"span","html":""},{"id":"layer0","tag":"b","html":""}]}"#,
            // duration disagrees with keyframes
            r#"{"width":1,"height":1,"frameRate":30,"duration":10,
                "keyframes":{"layer0":{"500":{"css":{"left":"1px"}}}},
                "layers":[{"id":"layer0","tag":"span","html":""}]}"#,
            // easing with no value
            r#"{"width":1,"height":1,"frameRate":30,"duration":0,
                "keyframes":{"layer0":{"0":{"css":{},"easing":{"left":"circular"}}}},
                "layers":[{"id":"layer0","tag":"span","html":""}]}"#,
            // pass-through property keyed after time zero
            r#"{"width":1,"height":1,"frameRate":30,"duration":500,
                "keyframes":{"layer0":{"500":{"css":{"z-index":2}}}},
                "layers":[{"id":"layer0","tag":"span","html":""}]}"#,
            // unknown easing kind
            r#"{"width":1,"height":1,"frameRate":30,"duration":0,
                "keyframes":{"layer0":{"0":{"css":{"left":"1px"},"easing":{"left":"bounce"}}}},
                "layers":[{"id":"layer0","tag":"span","html":""}]}"#,
        ];

        for json in cases {
            let mut comp = sample_composition();
            let before = comp.clone();
            let result = comp.load_json(json);
            assert!(
                matches!(result, Err(TimelineError::MalformedSnapshot(_))),
                "accepted: {json}"
            );
            assert_eq!(comp, before);
        }
    }

    #[test]
    fn test_load_replaces_everything() {
        let mut comp = Composition::default();
        let source = sample_composition();
        comp.load_json(&source.to_json().unwrap()).unwrap();
        assert_eq!(comp, source);
        assert_eq!(comp.width().get(), 640);
        assert_eq!(comp.layers().len(), 2);
    }
}
