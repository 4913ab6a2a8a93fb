// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe track of a single property on a single layer.

use crate::error::Result;
use crate::keyframe::{self, Keyframe, Sample};
use crate::property::PropertyValue;
use crate::timecode::Millis;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keyframes of one property, keyed by timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Track {
    keyframes: BTreeMap<Millis, Keyframe>,
}

impl Track {
    /// Create an empty track
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the keyframe at `time`, returning the replaced one
    pub fn set_keyframe(&mut self, time: Millis, keyframe: Keyframe) -> Option<Keyframe> {
        self.keyframes.insert(time, keyframe)
    }

    /// Remove the keyframe at `time`; returns whether one existed
    pub fn remove_keyframe(&mut self, time: Millis) -> bool {
        self.keyframes.remove(&time).is_some()
    }

    /// Get keyframe at time (if exists)
    pub fn keyframe_at(&self, time: Millis) -> Option<&Keyframe> {
        self.keyframes.get(&time)
    }

    /// Check if a keyframe exists exactly at time
    pub fn has_keyframe(&self, time: Millis) -> bool {
        self.keyframes.contains_key(&time)
    }

    /// Latest keyframe time at or before `time`
    pub fn find_prev(&self, time: Millis) -> Option<Millis> {
        self.keyframes.range(..=time).next_back().map(|(t, _)| *t)
    }

    /// Earliest keyframe time at or after `time`
    pub fn find_next(&self, time: Millis) -> Option<Millis> {
        self.keyframes.range(time..).next().map(|(t, _)| *t)
    }

    /// Keyframes surrounding `time`, inclusive on both sides
    pub fn samples(&self, time: Millis) -> (Option<Sample<'_>>, Option<Sample<'_>>) {
        let prev = self
            .keyframes
            .range(..=time)
            .next_back()
            .map(|(t, keyframe)| Sample { time: *t, keyframe });
        let next = self
            .keyframes
            .range(time..)
            .next()
            .map(|(t, keyframe)| Sample { time: *t, keyframe });
        (prev, next)
    }

    /// Evaluate the track value at a given time
    pub fn evaluate(&self, time: Millis) -> Result<Option<PropertyValue>> {
        let (prev, next) = self.samples(time);
        keyframe::evaluate(time, prev, next)
    }

    /// Get the time of the last keyframe
    pub fn duration(&self) -> Millis {
        self.keyframes.keys().next_back().copied().unwrap_or(0)
    }

    /// Get keyframes in a time range
    pub fn keyframes_in_range(
        &self,
        start: Millis,
        end: Millis,
    ) -> impl Iterator<Item = (Millis, &Keyframe)> {
        let range = if start <= end { start..=end } else { end..=start };
        self.keyframes.range(range).map(|(t, kf)| (*t, kf))
    }

    /// Iterate keyframes in time order
    pub fn iter(&self) -> impl Iterator<Item = (Millis, &Keyframe)> {
        self.keyframes.iter().map(|(t, kf)| (*t, kf))
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the track holds no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}
