//! Grading tools — the red-channel enhancer and its depth presets.

pub mod depth;
pub mod red_channel;
