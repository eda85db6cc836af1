//! Core types for overture.
//!
//! This includes the tick-based time and tweening toolkit, the mixer volume settings,
//! clip registries and the audio cue sheet format.

#![allow(clippy::uninlined_format_args)]

pub mod clip;
pub mod cue;
pub mod time;
pub mod volume;
