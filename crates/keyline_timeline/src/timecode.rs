// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame index to wall-clock time conversion.

use std::fmt;
use std::num::NonZeroU32;

/// Timeline position in whole milliseconds
pub type Millis = u64;

/// Broken-down time of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timecode {
    /// Whole hours
    pub hours: u64,
    /// Minutes within the hour
    pub minutes: u64,
    /// Seconds within the minute
    pub seconds: u64,
    /// Milliseconds within the second
    pub milliseconds: u64,
}

impl Timecode {
    /// Total milliseconds since frame zero
    pub fn total_millis(&self) -> Millis {
        self.hours
            .saturating_mul(60)
            .saturating_add(self.minutes)
            .saturating_mul(60)
            .saturating_add(self.seconds)
            .saturating_mul(1000)
            .saturating_add(self.milliseconds)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:03}",
            self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

/// Convert a frame index to the time it is shown at.
///
/// Milliseconds are floored per frame, so at 30 fps frame 1 is at 33 ms.
pub fn frame_to_time(frame: u64, frame_rate: NonZeroU32) -> Timecode {
    let rate = u64::from(frame_rate.get());
    let whole_seconds = frame / rate;
    Timecode {
        hours: whole_seconds / 3600,
        minutes: whole_seconds / 60 % 60,
        seconds: whole_seconds % 60,
        milliseconds: frame % rate * 1000 / rate,
    }
}

/// The frame showing time `millis`.
///
/// This is the floor inverse of [`frame_to_time`]: the last frame whose
/// time does not exceed `millis`.
pub fn time_to_frame(millis: Millis, frame_rate: NonZeroU32) -> u64 {
    let rate = u64::from(frame_rate.get());
    let whole_seconds = millis / 1000;
    let rem = millis % 1000;
    // Smallest r with floor(r * 1000 / rate) > rem, minus one.
    whole_seconds
        .saturating_mul(rate)
        .saturating_add(((rem + 1) * rate).div_ceil(1000) - 1)
}
