//! Deterministic scroll- and timer-driven animation state for a single-page
//! portfolio. The render layer owns every raw input (scroll offset, element
//! geometry, the clock, the strings to reveal) and applies the returned state;
//! nothing in here touches a DOM, a window or a global.

pub mod anim;
pub mod config;
pub mod utils;

pub use anim::error::MotionError;
pub use config::{ConfigError, MotionConfig};
