// src/anim/gate.rs
//! Scroll-direction visibility for the fixed header and the floating nav bar.
//!
//! One decision per scroll notification, no smoothing window: direction comes
//! purely from the sign of `current - previous`. Callers must feed one sample
//! per scroll event, or sub-pixel jitter will toggle the state.

use crate::anim::error::MotionError;
use log::trace;

/// `true` near the top or while scrolling up, `false` otherwise. A repeated
/// sample past the threshold carries no upward motion, so it hides.
#[inline(always)]
pub fn decide(current: f32, previous: f32, near_top: f32) -> bool {
    current < near_top || current < previous
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateState {
    pub visible: bool,
    pub last: Option<f32>,
}

impl Default for GateState {
    fn default() -> Self {
        Self { visible: true, last: None }
    }
}

/// `(state, sample) -> state`. The first sample only has the near-top rule
/// to go on, so anything at or past the threshold starts hidden.
#[inline(always)]
pub fn reduce(state: GateState, position: f32, near_top: f32) -> GateState {
    let visible = match state.last {
        Some(previous) => decide(position, previous, near_top),
        None => position < near_top,
    };
    GateState { visible, last: Some(position) }
}

/// Owns one visibility flag; only [`HysteresisGate::update`] changes it.
#[derive(Clone, Debug)]
pub struct HysteresisGate {
    near_top: f32,
    state: GateState,
}

impl HysteresisGate {
    pub fn new(near_top: f32) -> Result<Self, MotionError> {
        if !near_top.is_finite() || near_top < 0.0 {
            return Err(MotionError::Threshold { name: "near_top", value: near_top });
        }
        Ok(Self { near_top, state: GateState::default() })
    }

    pub fn near_top(&self) -> f32 { self.near_top }

    pub fn visible(&self) -> bool { self.state.visible }

    pub fn update(&mut self, position: f32) -> bool {
        let next = reduce(self.state, position, self.near_top);
        if next.visible != self.state.visible {
            trace!("gate(near_top={}) -> {} at {:.1}", self.near_top, next.visible, position);
        }
        self.state = next;
        next.visible
    }
}

/// Plain threshold flag: on strictly past `show_after` (the scroll-to-top button).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdFlag {
    show_after: f32,
}

impl ThresholdFlag {
    pub fn new(show_after: f32) -> Result<Self, MotionError> {
        if !show_after.is_finite() {
            return Err(MotionError::Threshold { name: "show_after", value: show_after });
        }
        Ok(Self { show_after })
    }

    #[inline(always)]
    pub fn eval(&self, position: f32) -> bool {
        position > self.show_after
    }
}
