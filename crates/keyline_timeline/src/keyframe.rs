// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions and tweening.

use crate::error::{Result, TimelineError};
use crate::property::PropertyValue;
use crate::timecode::Millis;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Easing curve used when tweening towards or away from a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum Easing {
    /// Constant rate
    #[default]
    Linear,
    /// Circular ease-in-out (quarter circle in, quarter circle out)
    Circular,
}

impl Easing {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Circular => "circular",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A keyframe value on one property of one layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Value at this keyframe
    pub value: PropertyValue,
    /// Easing kind of this keyframe
    pub easing: Easing,
}

impl Keyframe {
    /// Create a new linear keyframe
    pub fn new(value: impl Into<PropertyValue>) -> Self {
        Self {
            value: value.into(),
            easing: Easing::Linear,
        }
    }

    /// Set easing kind
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// A keyframe together with its timestamp
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    /// Keyframe time
    pub time: Millis,
    /// Keyframe at that time
    pub keyframe: &'a Keyframe,
}

/// Tweening equations
pub struct Interpolation;

impl Interpolation {
    /// Tween from `b` by change `c` over duration `d`, at elapsed time `t`
    pub fn tween(easing: Easing, t: f64, b: f64, c: f64, d: f64) -> f64 {
        match easing {
            Easing::Linear => Self::linear(t, b, c, d),
            Easing::Circular => Self::circular_in_out(t, b, c, d),
        }
    }

    /// Linear tween
    pub fn linear(t: f64, b: f64, c: f64, d: f64) -> f64 {
        c * t / d + b
    }

    /// Circular ease-in-out tween
    pub fn circular_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let mut u = t / (d / 2.0);
        if u < 1.0 {
            return -c / 2.0 * ((1.0 - u * u).sqrt() - 1.0) + b;
        }
        u -= 2.0;
        c / 2.0 * ((1.0 - u * u).sqrt() + 1.0) + b
    }
}

/// Value of a property at `time` given its surrounding keyframes.
///
/// `prev` is the nearest keyframe at or before `time`, `next` the nearest at
/// or after. With one side missing the other side's value is held. Values
/// without a numeric reading cannot be tweened and hold `prev`.
pub fn evaluate(
    time: Millis,
    prev: Option<Sample<'_>>,
    next: Option<Sample<'_>>,
) -> Result<Option<PropertyValue>> {
    match (prev, next) {
        (None, None) => Ok(None),
        (Some(only), None) | (None, Some(only)) => Ok(Some(only.keyframe.value.clone())),
        (Some(prev), Some(next)) => {
            if next.time <= prev.time {
                return Ok(Some(prev.keyframe.value.clone()));
            }

            let easing = prev.keyframe.easing;
            if easing != next.keyframe.easing {
                return Err(TimelineError::UnknownEasingPair {
                    prev: easing,
                    next: next.keyframe.easing,
                });
            }

            let from = prev.keyframe.value.as_number();
            let to = next.keyframe.value.as_number();
            let (Some(from), Some(to)) = (from, to) else {
                return Ok(Some(prev.keyframe.value.clone()));
            };

            let t = time.saturating_sub(prev.time) as f64;
            let d = (next.time - prev.time) as f64;
            let value = Interpolation::tween(easing, t, from, to - from, d);
            Ok(Some(PropertyValue::Number(value)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: Millis, keyframe: &Keyframe) -> Option<Sample<'_>> {
        Some(Sample { time, keyframe })
    }

    #[test]
    fn test_step_hold() {
        let kf = Keyframe::new("200px");
        let held = Some(PropertyValue::from("200px"));
        assert_eq!(evaluate(1500, sample(1000, &kf), None).unwrap(), held);
        assert_eq!(evaluate(500, None, sample(1000, &kf)).unwrap(), held);
        assert_eq!(evaluate(500, None, None).unwrap(), None);
    }

    #[test]
    fn test_on_keyframe_is_exact() {
        let kf = Keyframe::new("100px").with_easing(Easing::Circular);
        let value = evaluate(1000, sample(1000, &kf), sample(1000, &kf)).unwrap();
        assert_eq!(value, Some(PropertyValue::from("100px")));
    }

    #[test]
    fn test_linear_midpoint() {
        let a = Keyframe::new("100px");
        let b = Keyframe::new("200px");
        let value = evaluate(500, sample(0, &a), sample(1000, &b)).unwrap();
        assert_eq!(value, Some(PropertyValue::Number(150.0)));

        let value = evaluate(250, sample(0, &a), sample(1000, &b)).unwrap();
        assert_eq!(value, Some(PropertyValue::Number(125.0)));
    }

    #[test]
    fn test_circular_curve() {
        let ease = |t: f64| Interpolation::circular_in_out(t, 0.0, 100.0, 1000.0);
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(500.0), 50.0);
        assert_eq!(ease(1000.0), 100.0);

        // Quarter circle in: slow start
        let quarter = ease(250.0);
        let expected = 50.0 * (1.0 - (1.0f64 - 0.25).sqrt());
        assert!((quarter - expected).abs() < 1e-9);
        assert!(quarter < 25.0);

        // Symmetric ease out
        assert!((ease(750.0) - (100.0 - quarter)).abs() < 1e-9);
    }

    #[test]
    fn test_circular_keyframes() {
        let a = Keyframe::new(0.0).with_easing(Easing::Circular);
        let b = Keyframe::new(1.0).with_easing(Easing::Circular);
        let value = evaluate(500, sample(0, &a), sample(1000, &b)).unwrap();
        assert_eq!(value, Some(PropertyValue::Number(0.5)));
    }

    #[test]
    fn test_mixed_easing_fails() {
        let a = Keyframe::new(0.0);
        let b = Keyframe::new(1.0).with_easing(Easing::Circular);
        let err = evaluate(500, sample(0, &a), sample(1000, &b)).unwrap_err();
        assert!(matches!(
            err,
            TimelineError::UnknownEasingPair { prev: Easing::Linear, next: Easing::Circular }
        ));
    }

    #[test]
    fn test_mixed_easing_checked_before_values() {
        let a = Keyframe::new("auto").with_easing(Easing::Circular);
        let b = Keyframe::new("200px");
        assert!(evaluate(500, sample(0, &a), sample(1000, &b)).is_err());
    }

    #[test]
    fn test_tween_dispatches_on_easing() {
        assert_eq!(Interpolation::tween(Easing::Linear, 250.0, 0.0, 100.0, 1000.0), 25.0);
        assert_eq!(
            Interpolation::tween(Easing::Circular, 250.0, 0.0, 100.0, 1000.0),
            Interpolation::circular_in_out(250.0, 0.0, 100.0, 1000.0)
        );
    }

    #[test]
    fn test_non_numeric_holds_prev() {
        let a = Keyframe::new("auto");
        let b = Keyframe::new("200px");
        let value = evaluate(500, sample(0, &a), sample(1000, &b)).unwrap();
        assert_eq!(value, Some(PropertyValue::from("auto")));
    }
}
