// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session and playback driver for Keyline.
//!
//! The timeline engine is stateless between calls; this crate holds the
//! state a host editor needs around it:
//! - The playhead (current frame) and playback toggle
//! - The selected layer and the edits reported by the renderer
//! - Editor configuration loaded from RON
//!
//! The host owns the timer and the renderer. It calls [`Session::tick`]
//! every [`Session::tick_interval`] while playing and draws the result of
//! [`Session::frame_state`].

pub mod config;
pub mod session;

pub use config::{
    CompositionSettings, ConfigError, EditorConfig, CONFIG_FILE_NAME, CONFIG_FORMAT_VERSION,
};
pub use session::{PlaybackState, Session};
