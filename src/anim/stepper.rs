// src/anim/stepper.rs
// Scroll-driven tab index for the work-history section.

use crate::anim::error::MotionError;
use crate::utils::layout::Bounds;
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepperConfig {
    /// A single scroll notification must move further than this to step.
    pub step_threshold: f32,
    /// Viewport fraction of slack above and below the section.
    pub buffer_frac: f32,
}

#[derive(Clone, Debug)]
pub struct TabStepper {
    count: usize,
    active: usize,
    last: f32,
    config: StepperConfig,
}

impl TabStepper {
    pub fn new(count: usize, config: StepperConfig) -> Result<Self, MotionError> {
        if count == 0 {
            return Err(MotionError::NoPhases);
        }
        if !(config.step_threshold.is_finite() && config.step_threshold >= 0.0) {
            return Err(MotionError::Threshold { name: "step_threshold", value: config.step_threshold });
        }
        if !(config.buffer_frac.is_finite() && config.buffer_frac >= 0.0) {
            return Err(MotionError::Threshold { name: "buffer_frac", value: config.buffer_frac });
        }
        Ok(Self { count, active: 0, last: 0.0, config })
    }

    pub fn active(&self) -> usize { self.active }
    pub fn count(&self) -> usize { self.count }

    /// Direct pick (a click on a tab). Clamped to the last tab.
    pub fn select(&mut self, index: usize) -> usize {
        self.active = index.min(self.count - 1);
        self.active
    }

    /// One scroll notification. `section` is in document space.
    pub fn update(&mut self, offset: f32, section: Bounds, viewport_height: f32) -> usize {
        let slack = viewport_height * self.config.buffer_frac;
        let inside = offset >= section.top - slack && offset <= section.bottom() + slack;
        let delta = offset - self.last;

        if inside && delta.abs() > self.config.step_threshold {
            let before = self.active;
            if delta > 0.0 {
                self.active = (self.active + 1).min(self.count - 1);
            } else {
                self.active = self.active.saturating_sub(1);
            }
            if before != self.active {
                trace!("tab {} -> {} (delta {:.1})", before, self.active, delta);
            }
        }

        self.last = offset;
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepper(count: usize) -> TabStepper {
        TabStepper::new(count, StepperConfig { step_threshold: 100.0, buffer_frac: 1.0 / 3.0 }).unwrap()
    }

    const SECTION: Bounds = Bounds::new(1000.0, 600.0);

    #[test]
    fn large_moves_step_small_moves_do_not() {
        let mut s = stepper(3);
        s.update(900.0, SECTION, 900.0);
        assert_eq!(s.active(), 1);
        assert_eq!(s.update(950.0, SECTION, 900.0), 1);
        assert_eq!(s.update(1100.0, SECTION, 900.0), 2);
        assert_eq!(s.update(1250.0, SECTION, 900.0), 2);
        assert_eq!(s.update(1100.0, SECTION, 900.0), 1);
        assert_eq!(s.update(900.0, SECTION, 900.0), 0);
        assert_eq!(s.update(700.0, SECTION, 900.0), 0);
    }

    #[test]
    fn outside_the_section_only_tracks_position() {
        let mut s = stepper(3);
        assert_eq!(s.update(300.0, SECTION, 900.0), 0);
        assert_eq!(s.update(5000.0, SECTION, 900.0), 0);
        // the jump back in is measured from 5000
        assert_eq!(s.update(1500.0, SECTION, 900.0), 0);
    }

    #[test]
    fn select_clamps() {
        let mut s = stepper(3);
        assert_eq!(s.select(9), 2);
        assert!(TabStepper::new(0, StepperConfig { step_threshold: 1.0, buffer_frac: 0.0 }).is_err());
    }
}
