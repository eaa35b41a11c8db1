// src/anim/region.rs
//! Which content section is "in focus" for the navigation pin.
//!
//! A region is a candidate when at least `min_ratio` of its own height lies
//! inside the observation window (the viewport minus a top inset and a bottom
//! fraction). The candidate whose centre is nearest the window's reference
//! line wins; equal distances go to the lower `order`. With no candidate the
//! previous answer sticks, so gaps between sections never read as "nothing".

use crate::anim::error::MotionError;
use crate::utils::layout::{inset_band, Bounds, Insets};
use log::debug;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub order: u32,
}

impl Region {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: u32) -> Self {
        Self { id: id.into(), name: name.into(), order }
    }
}

/// Viewport-space band plus the line candidates are measured against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObservationWindow {
    pub top: f32,
    pub bottom: f32,
    pub reference: f32,
}

impl ObservationWindow {
    pub fn from_viewport(viewport_height: f32, insets: Insets, reference_frac: f32) -> Self {
        let (top, bottom) = inset_band(viewport_height, insets);
        let reference = top + (bottom - top) * reference_frac.clamp(0.0, 1.0);
        Self { top, bottom, reference }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocatorConfig {
    pub min_ratio: f32,
    pub insets: Insets,
    pub reference_frac: f32,
}

impl LocatorConfig {
    pub fn validate(&self) -> Result<(), MotionError> {
        if !(self.min_ratio > 0.0 && self.min_ratio <= 1.0) {
            return Err(MotionError::Threshold { name: "min_ratio", value: self.min_ratio });
        }
        if !(0.0..=1.0).contains(&self.reference_frac) {
            return Err(MotionError::Threshold { name: "reference_frac", value: self.reference_frac });
        }
        if !(self.insets.top_px.is_finite() && self.insets.top_px >= 0.0) {
            return Err(MotionError::Threshold { name: "inset_top_px", value: self.insets.top_px });
        }
        if !(0.0..1.0).contains(&self.insets.bottom_frac) {
            return Err(MotionError::Threshold { name: "inset_bottom_frac", value: self.insets.bottom_frac });
        }
        Ok(())
    }

    pub fn window(&self, viewport_height: f32) -> ObservationWindow {
        ObservationWindow::from_viewport(viewport_height, self.insets, self.reference_frac)
    }
}

#[inline(always)]
fn visible_ratio(b: &Bounds, window: &ObservationWindow) -> f32 {
    if b.height <= 0.0 {
        return 0.0;
    }
    b.overlap(window.top, window.bottom) / b.height
}

/// Pure reducer. `bounds[i]` is the viewport-space extent of `regions[i]`.
pub fn locate(
    regions: &[Region],
    bounds: &[Bounds],
    window: &ObservationWindow,
    min_ratio: f32,
    previous: Option<usize>,
) -> Option<usize> {
    regions
        .iter()
        .zip(bounds)
        .enumerate()
        .filter(|(_, (_, b))| b.height > 0.0 && visible_ratio(b, window) >= min_ratio)
        .min_by(|(_, (ra, ba)), (_, (rb, bb))| {
            let da = (ba.center() - window.reference).abs();
            let db = (bb.center() - window.reference).abs();
            da.total_cmp(&db).then(ra.order.cmp(&rb.order))
        })
        .map(|(i, _)| i)
        .or(previous)
}

/// Owns the active-region id; consumers only read it.
#[derive(Clone, Debug)]
pub struct ActiveRegionLocator {
    regions: Vec<Region>,
    config: LocatorConfig,
    active: Option<usize>,
}

impl ActiveRegionLocator {
    pub fn new(regions: Vec<Region>, config: LocatorConfig) -> Result<Self, MotionError> {
        config.validate()?;
        Ok(Self { regions, config, active: None })
    }

    /// Start with `id` active (e.g. the hero section before any scroll).
    pub fn with_initial(mut self, id: &str) -> Self {
        self.active = self.regions.iter().position(|r| r.id == id);
        self
    }

    pub fn regions(&self) -> &[Region] { &self.regions }

    pub fn active(&self) -> Option<&Region> {
        self.active.map(|i| &self.regions[i])
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active().map(|r| r.id.as_str())
    }

    /// Feed one geometry snapshot (viewport space).
    pub fn update(&mut self, bounds: &[Bounds], viewport_height: f32) -> Option<&Region> {
        let window = self.config.window(viewport_height);
        let next = locate(&self.regions, bounds, &window, self.config.min_ratio, self.active);
        if next != self.active {
            if let Some(i) = next {
                debug!("active region -> '{}'", self.regions[i].id);
            }
        }
        self.active = next;
        self.active()
    }

    /// Same as [`update`](Self::update) for document-space bounds at scroll `offset`.
    pub fn update_document(&mut self, bounds: &[Bounds], offset: f32, viewport_height: f32) -> Option<&Region> {
        let local: Vec<Bounds> = bounds.iter().map(|b| b.to_viewport(offset)).collect();
        self.update(&local, viewport_height)
    }
}

/// Scroll offset that lands a region's top just below a fixed header.
#[inline(always)]
pub fn scroll_target(region_top: f32, header_offset: f32) -> f32 {
    (region_top - header_offset).max(0.0)
}
