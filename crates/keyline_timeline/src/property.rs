// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animatable layer properties and their values.

use crate::error::TimelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A CSS-like property recorded on a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    /// Offset from the top edge
    Top,
    /// Offset from the left edge
    Left,
    /// Box width
    Width,
    /// Box height
    Height,
    /// Text size
    FontSize,
    /// Opacity in `0..=1`
    Opacity,
    /// Positioning scheme, set once at layer creation
    Position,
    /// Stacking order, set once at layer creation
    ZIndex,
}

/// Kind of value a property accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A number, or text starting with a number (`"100px"`)
    Numeric,
    /// A non-empty keyword (`"absolute"`)
    Keyword,
}

impl Property {
    /// Every property, tweenable ones first
    pub const ALL: [Property; 8] = [
        Property::Top,
        Property::Left,
        Property::Width,
        Property::Height,
        Property::FontSize,
        Property::Opacity,
        Property::Position,
        Property::ZIndex,
    ];

    /// Properties that are interpolated between keyframes
    pub const TWEENABLE: [Property; 6] = [
        Property::Top,
        Property::Left,
        Property::Width,
        Property::Height,
        Property::FontSize,
        Property::Opacity,
    ];

    /// The CSS key for this property
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Left => "left",
            Self::Width => "width",
            Self::Height => "height",
            Self::FontSize => "font-size",
            Self::Opacity => "opacity",
            Self::Position => "position",
            Self::ZIndex => "z-index",
        }
    }

    /// Whether values are interpolated over time
    pub fn is_tweenable(&self) -> bool {
        !matches!(self, Self::Position | Self::ZIndex)
    }

    /// Value kind accepted by this property
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::Position => ValueKind::Keyword,
            _ => ValueKind::Numeric,
        }
    }

    /// Check a value against this property's value kind
    pub fn accepts(&self, value: &PropertyValue) -> bool {
        match self.value_kind() {
            ValueKind::Numeric => value.as_number().is_some(),
            ValueKind::Keyword => {
                matches!(value, PropertyValue::Text(text) if !text.trim().is_empty())
            }
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for Property {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.css_name() == s)
            .ok_or_else(|| TimelineError::UnknownProperty(s.to_string()))
    }
}

/// Value stored in a keyframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Plain number
    Number(f64),
    /// Text, usually a number with a unit
    Text(String),
}

impl PropertyValue {
    /// Numeric reading of this value.
    ///
    /// Text is read by its leading float prefix, so `"100px"` is `100.0`
    /// and `"auto"` has no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Self::Text(text) => parse_float_prefix(text),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Parse the longest float literal at the start of `text`.
///
/// Leading whitespace is skipped; anything after the literal is ignored.
fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_digits = frac_end - (end + 1);
        if frac_digits > 0 {
            mantissa_digits += frac_digits;
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
