// src/anim/mod.rs
pub mod ease;
pub mod error;
pub mod gate;
pub mod phase;
pub mod region;
pub mod reveal;
pub mod scene;
pub mod signal;
pub mod stepper;
pub mod timers;
pub mod typewriter;
