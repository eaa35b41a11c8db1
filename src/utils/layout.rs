// src/utils/layout.rs
// Pure, stateless geometry helpers. Everything is in CSS pixels, y grows downward.

use serde::Serialize;

/// Vertical extent of an element. `top` is either document space or viewport
/// space; the owner of the value says which.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub top: f32,
    pub height: f32,
}

impl Bounds {
    #[inline(always)]
    pub const fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 { self.top + self.height }

    #[inline(always)]
    pub fn center(&self) -> f32 { self.top + 0.5 * self.height }

    /// Document-space bounds seen from a viewport scrolled to `offset`.
    #[inline(always)]
    pub fn to_viewport(&self, offset: f32) -> Bounds {
        Bounds { top: self.top - offset, height: self.height }
    }

    /// Length of the vertical intersection with `[top, bottom]`, never negative.
    #[inline(always)]
    pub fn overlap(&self, top: f32, bottom: f32) -> f32 {
        (self.bottom().min(bottom) - self.top.max(top)).max(0.0)
    }
}

/// Margins shrinking the viewport into an observation band: a fixed pixel
/// inset from the top and a fraction of the viewport height cut from the bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Insets {
    pub top_px: f32,
    pub bottom_frac: f32,
}

// Compute the observation band for a viewport of `height` px.
// A band that collapses (insets larger than the viewport) has zero height.
#[inline(always)]
pub fn inset_band(height: f32, insets: Insets) -> (f32, f32) {
    let top = insets.top_px.max(0.0);
    let bottom = (height * (1.0 - insets.bottom_frac.clamp(0.0, 1.0))).max(top);
    (top, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_clipped_to_band() {
        let b = Bounds::new(100.0, 200.0);
        assert_eq!(b.overlap(0.0, 150.0), 50.0);
        assert_eq!(b.overlap(150.0, 250.0), 100.0);
        assert_eq!(b.overlap(400.0, 500.0), 0.0);
    }

    #[test]
    fn band_follows_insets() {
        let (top, bottom) = inset_band(800.0, Insets { top_px: 50.0, bottom_frac: 0.5 });
        assert_eq!(top, 50.0);
        assert_eq!(bottom, 400.0);

        let (top, bottom) = inset_band(60.0, Insets { top_px: 50.0, bottom_frac: 0.5 });
        assert_eq!(top, 50.0);
        assert_eq!(bottom, 50.0);
    }
}
