//! Liar's Dice engine
//!
//! Rendering-independent state machine behind the dice table: the per-die roll
//! animation, the roll coordinator with its completion barrier, and the
//! wildcard counter used for the Liar's Dice tally.
//!
//! This crate is organized into modules:
//! - `face` - `FaceValue`, the clamped 1-6 face type
//! - `dots` - Dot layouts for each face
//! - `tween` - Easing used by the settle animation
//! - `die` - A single animated die
//! - `coordinator` - Drives a roll across all dice
//! - `counter` - Wildcard counting and highlight application
//! - `table` - Session facade consumed by the hosts (input events, selection, layout)
//! - `sound` - Sound cues, the emitter trait and procedural synthesis
//! - `render` - View model handed to renderers
//! - `config` - `GameConfig` loaded from RON
//! - `error` - Error types

pub mod config;
pub mod coordinator;
pub mod counter;
pub mod die;
pub mod dots;
pub mod error;
pub mod face;
pub mod render;
pub mod sound;
pub mod table;
pub mod tween;

// Re-export the public types for convenient access
pub use config::*;
pub use coordinator::*;
pub use counter::*;
pub use die::*;
pub use dots::*;
pub use error::*;
pub use face::*;
pub use render::*;
pub use sound::{SoundCue, SoundEmitter};
pub use table::*;
pub use tween::*;

pub use bevy_math::Vec2;
