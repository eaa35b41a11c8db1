// src/anim/signal.rs
//! Raw inputs (scroll offset, elapsed time) folded into a bounded `[0, 1]` signal.
//!
//! Scroll domains are resolved once per layout pass from two viewport anchors:
//! the signal is 0 when the observed element's top edge sits at `enter` (a
//! fraction of the viewport height, measured from the top) and 1 when it has
//! risen to `settle`. Everything between is linear; everything outside
//! saturates.

use crate::anim::error::MotionError;
use crate::utils::math::{clamp01, inv_lerp};
use log::trace;

/// One scroll/resize notification as seen by the render layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSample {
    pub offset: f32,
    pub viewport_height: f32,
}

impl ScrollSample {
    pub const fn new(offset: f32, viewport_height: f32) -> Self {
        Self { offset, viewport_height }
    }
}

/// The explicit producer of scroll samples. The render layer owns the
/// subscription; the engine only ever borrows a source to read the latest sample.
pub trait ScrollSource {
    fn sample(&self) -> ScrollSample;
}

impl ScrollSource for ScrollSample {
    fn sample(&self) -> ScrollSample { *self }
}

/// Clamp `raw` into `[start, end]` and rescale to `[0, 1]`.
/// A degenerate domain (`end <= start`) behaves as a step at `start`.
#[inline(always)]
pub fn normalize(raw: f32, domain_start: f32, domain_end: f32) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    if domain_end <= domain_start {
        return if raw >= domain_start { 1.0 } else { 0.0 };
    }
    clamp01(inv_lerp(domain_start, domain_end, raw))
}

/// Elapsed-time signal: 0 at `start_ms`, 1 at `start_ms + duration_ms`.
#[inline(always)]
pub fn normalize_time(now_ms: u64, start_ms: u64, duration_ms: u64) -> f32 {
    if duration_ms == 0 {
        return if now_ms >= start_ms { 1.0 } else { 0.0 };
    }
    let elapsed = now_ms.saturating_sub(start_ms);
    (elapsed as f64 / duration_ms as f64).min(1.0) as f32
}

/// A validated, non-empty signal domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalDomain {
    start: f32,
    end: f32,
}

impl SignalDomain {
    pub fn new(start: f32, end: f32) -> Result<Self, MotionError> {
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(MotionError::EmptyDomain { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f32 { self.start }
    pub fn end(&self) -> f32 { self.end }

    #[inline(always)]
    pub fn sample(&self, raw: f32) -> f32 {
        normalize(raw, self.start, self.end)
    }
}

/// Two viewport fractions bracketing a scroll-driven animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAnchors {
    enter: f32,
    settle: f32,
}

impl ScrollAnchors {
    pub fn new(enter: f32, settle: f32) -> Result<Self, MotionError> {
        let ok = enter.is_finite()
            && settle.is_finite()
            && (0.0..=1.0).contains(&enter)
            && (0.0..=1.0).contains(&settle)
            && settle < enter;
        if !ok {
            return Err(MotionError::Anchors { enter, settle });
        }
        Ok(Self { enter, settle })
    }

    // Caller guarantees 0 <= settle < enter <= 1.
    pub(crate) const fn new_unchecked(enter: f32, settle: f32) -> Self {
        Self { enter, settle }
    }

    pub fn enter(&self) -> f32 { self.enter }
    pub fn settle(&self) -> f32 { self.settle }

    /// Scroll offsets at which the element's top edge (document space) reaches
    /// each anchor. Fails only for a viewport with no height.
    pub fn resolve(&self, element_top: f32, viewport_height: f32) -> Result<SignalDomain, MotionError> {
        let start = element_top - self.enter * viewport_height;
        let end = element_top - self.settle * viewport_height;
        trace!("resolved scroll domain [{:.1}, {:.1}] for top {:.1}", start, end, element_top);
        SignalDomain::new(start, end)
    }
}
