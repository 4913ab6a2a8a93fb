// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sparse keyframe storage: layer -> property -> timestamp -> keyframe.

use crate::error::{Result, TimelineError};
use crate::keyframe::Keyframe;
use crate::layer::LayerId;
use crate::property::Property;
use crate::timecode::Millis;
use crate::track::Track;
use indexmap::IndexMap;

/// Tracks of a single layer
pub type LayerTracks = IndexMap<Property, Track>;

/// All keyframes of a composition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeStore {
    layers: IndexMap<LayerId, LayerTracks>,
}

impl KeyframeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a keyframe.
    ///
    /// The value must match the property's value kind. Pass-through
    /// properties only take a keyframe at time zero.
    pub fn set_keyframe(
        &mut self,
        layer: &LayerId,
        time: Millis,
        property: Property,
        keyframe: Keyframe,
    ) -> Result<()> {
        if !property.accepts(&keyframe.value) {
            return Err(TimelineError::InvalidValue {
                property,
                value: keyframe.value,
            });
        }
        if time != 0 && !property.is_tweenable() {
            return Err(TimelineError::PassThroughKeyframe { property, time });
        }

        tracing::debug!(%layer, time, %property, value = %keyframe.value, "set keyframe");
        self.layers
            .entry(layer.clone())
            .or_default()
            .entry(property)
            .or_default()
            .set_keyframe(time, keyframe);
        Ok(())
    }

    /// Remove a keyframe if present; returns whether it existed.
    ///
    /// Tracks and layer entries left empty are dropped.
    pub fn remove_keyframe(&mut self, layer: &LayerId, time: Millis, property: Property) -> bool {
        let Some(tracks) = self.layers.get_mut(layer) else {
            return false;
        };
        let Some(track) = tracks.get_mut(&property) else {
            return false;
        };

        let existed = track.remove_keyframe(time);
        if existed {
            tracing::debug!(%layer, time, %property, "removed keyframe");
            if track.is_empty() {
                tracks.shift_remove(&property);
            }
            if tracks.is_empty() {
                self.layers.shift_remove(layer);
            }
        }
        existed
    }

    /// Check if a keyframe exists exactly at `time`
    pub fn has_keyframe(&self, layer: &LayerId, time: Millis, property: Property) -> bool {
        self.track(layer, property)
            .is_some_and(|track| track.has_keyframe(time))
    }

    /// Get the keyframe exactly at `time`
    pub fn keyframe(&self, layer: &LayerId, time: Millis, property: Property) -> Option<&Keyframe> {
        self.track(layer, property)?.keyframe_at(time)
    }

    /// Get the track of one property of one layer
    pub fn track(&self, layer: &LayerId, property: Property) -> Option<&Track> {
        self.layers.get(layer)?.get(&property)
    }

    /// Get all tracks of a layer
    pub fn layer_tracks(&self, layer: &LayerId) -> Option<&LayerTracks> {
        self.layers.get(layer)
    }

    /// Latest keyframe time at or before `time`
    pub fn find_prev(&self, layer: &LayerId, property: Property, time: Millis) -> Option<Millis> {
        self.track(layer, property)?.find_prev(time)
    }

    /// Earliest keyframe time at or after `time`
    pub fn find_next(&self, layer: &LayerId, property: Property, time: Millis) -> Option<Millis> {
        self.track(layer, property)?.find_next(time)
    }

    /// Properties of `layer` with a keyframe exactly at `time`
    pub fn keyed_properties(&self, layer: &LayerId, time: Millis) -> Vec<Property> {
        Property::ALL
            .into_iter()
            .filter(|property| self.has_keyframe(layer, time, *property))
            .collect()
    }

    /// Latest keyframe time in the store, 0 when empty
    pub fn max_time(&self) -> Millis {
        self.layers
            .values()
            .flat_map(IndexMap::values)
            .map(Track::duration)
            .max()
            .unwrap_or(0)
    }

    /// Iterate every keyframe as `(layer, property, time, keyframe)`
    pub fn iter(&self) -> impl Iterator<Item = (&LayerId, Property, Millis, &Keyframe)> {
        self.layers.iter().flat_map(|(layer, tracks)| {
            tracks.iter().flat_map(move |(property, track)| {
                track.iter().map(move |(time, kf)| (layer, *property, time, kf))
            })
        })
    }

    /// Total number of keyframes
    pub fn keyframe_count(&self) -> usize {
        self.layers
            .values()
            .flat_map(IndexMap::values)
            .map(Track::keyframe_count)
            .sum()
    }

    /// Whether the store holds no keyframes
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyValue;

    fn layer0() -> LayerId {
        LayerId::from_index(0)
    }

    #[test]
    fn test_set_and_query() {
        let mut store = KeyframeStore::new();
        store
            .set_keyframe(&layer0(), 1000, Property::Left, Keyframe::new("200px"))
            .unwrap();

        assert!(store.has_keyframe(&layer0(), 1000, Property::Left));
        assert!(!store.has_keyframe(&layer0(), 1000, Property::Top));
        assert!(!store.has_keyframe(&layer0(), 999, Property::Left));
        assert_eq!(
            store.keyframe(&layer0(), 1000, Property::Left).map(|kf| &kf.value),
            Some(&PropertyValue::from("200px"))
        );
        assert_eq!(store.max_time(), 1000);
    }

    #[test]
    fn test_overwrite() {
        let mut store = KeyframeStore::new();
        store.set_keyframe(&layer0(), 0, Property::Top, Keyframe::new(1.0)).unwrap();
        store.set_keyframe(&layer0(), 0, Property::Top, Keyframe::new(2.0)).unwrap();
        assert_eq!(store.keyframe_count(), 1);
        assert_eq!(
            store.keyframe(&layer0(), 0, Property::Top),
            Some(&Keyframe::new(2.0))
        );
    }

    #[test]
    fn test_rejects_wrong_value_kind() {
        let mut store = KeyframeStore::new();
        let err = store
            .set_keyframe(&layer0(), 0, Property::Opacity, Keyframe::new("solid"))
            .unwrap_err();
        assert!(matches!(err, TimelineError::InvalidValue { property: Property::Opacity, .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_pass_through_only_at_time_zero() {
        let mut store = KeyframeStore::new();
        let err = store
            .set_keyframe(&layer0(), 800, Property::Position, Keyframe::new("relative"))
            .unwrap_err();
        assert!(matches!(
            err,
            TimelineError::PassThroughKeyframe { property: Property::Position, time: 800 }
        ));
        assert!(store
            .set_keyframe(&layer0(), 1, Property::ZIndex, Keyframe::new(3.0))
            .is_err());
        assert!(store.is_empty());

        store.set_keyframe(&layer0(), 0, Property::ZIndex, Keyframe::new(3.0)).unwrap();
        assert_eq!(store.max_time(), 0);
    }

    #[test]
    fn test_remove_prunes_and_is_idempotent() {
        let mut store = KeyframeStore::new();
        store.set_keyframe(&layer0(), 0, Property::Top, Keyframe::new(1.0)).unwrap();
        store.set_keyframe(&layer0(), 500, Property::Top, Keyframe::new(2.0)).unwrap();

        assert!(store.remove_keyframe(&layer0(), 500, Property::Top));
        let after_first = store.clone();
        assert!(!store.remove_keyframe(&layer0(), 500, Property::Top));
        assert_eq!(store, after_first);
        assert_eq!(store.max_time(), 0);

        assert!(store.remove_keyframe(&layer0(), 0, Property::Top));
        assert!(store.is_empty());
        assert_eq!(store, KeyframeStore::new());

        assert!(!store.remove_keyframe(&LayerId::from("ghost"), 0, Property::Left));
    }

    #[test]
    fn test_locator_per_property() {
        let mut store = KeyframeStore::new();
        store.set_keyframe(&layer0(), 0, Property::Left, Keyframe::new("100px")).unwrap();
        store.set_keyframe(&layer0(), 1000, Property::Left, Keyframe::new("200px")).unwrap();
        store.set_keyframe(&layer0(), 700, Property::Top, Keyframe::new("5px")).unwrap();

        assert_eq!(store.find_prev(&layer0(), Property::Left, 700), Some(0));
        assert_eq!(store.find_next(&layer0(), Property::Left, 700), Some(1000));
        assert_eq!(store.find_prev(&layer0(), Property::Width, 700), None);
        assert_eq!(store.find_next(&LayerId::from("ghost"), Property::Left, 0), None);
        assert_eq!(store.keyed_properties(&layer0(), 700), vec![Property::Top]);
    }

    #[test]
    fn test_iter_visits_every_keyframe() {
        let mut store = KeyframeStore::new();
        store.set_keyframe(&layer0(), 0, Property::Left, Keyframe::new("1px")).unwrap();
        store.set_keyframe(&layer0(), 10, Property::Left, Keyframe::new("2px")).unwrap();
        store
            .set_keyframe(&LayerId::from_index(1), 0, Property::Position, Keyframe::new("absolute"))
            .unwrap();
        assert_eq!(store.iter().count(), store.keyframe_count());
        assert_eq!(store.iter().count(), 3);
    }
}
