// src/anim/scene.rs
//! Every scroll-driven consumer on the page, fed from one sample at a time.
//!
//! `pump` reads a single [`ScrollSample`] from the source and derives every
//! output from that same value, so a frame never mixes a stale offset with a
//! fresh one. Layout-dependent domains are resolved in `relayout` (or when the
//! viewport height changes), never per sample.

use crate::anim::error::MotionError;
use crate::anim::gate::{HysteresisGate, ThresholdFlag};
use crate::anim::phase::{CardDeck, CardState};
use crate::anim::region::{ActiveRegionLocator, Region};
use crate::anim::signal::{ScrollAnchors, ScrollSource, SignalDomain};
use crate::anim::stepper::TabStepper;
use crate::config::MotionConfig;
use crate::utils::layout::Bounds;
use log::{debug, warn};
use serde::Serialize;

/// Document-space geometry from the last layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneLayout {
    /// One entry per region, in the order the regions were declared.
    pub regions: Vec<Bounds>,
    /// The element driving the card deck.
    pub deck: Option<Bounds>,
    /// The tabbed work-history section.
    pub tabs: Option<Bounds>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneFrame {
    pub offset: f32,
    pub header_visible: bool,
    pub nav_visible: bool,
    /// The section pin stands in for the nav bar while it is hidden, naming
    /// the active region (a region with an empty name shows no pin).
    pub pin_visible: bool,
    pub scroll_top_visible: bool,
    pub active_region: Option<String>,
    pub deck_progress: f32,
    pub cards: Vec<CardState>,
    pub active_tab: usize,
}

pub struct Scene {
    header: HysteresisGate,
    nav: HysteresisGate,
    scroll_top: ThresholdFlag,
    locator: ActiveRegionLocator,
    deck: CardDeck,
    deck_anchors: ScrollAnchors,
    deck_domain: Option<SignalDomain>,
    stepper: TabStepper,
    layout: SceneLayout,
    layout_height: f32,
}

impl Scene {
    pub fn new(config: &MotionConfig, regions: Vec<Region>, cards: usize, tabs: usize) -> Result<Self, MotionError> {
        let first = regions.first().map(|r| r.id.clone());
        let mut locator = ActiveRegionLocator::new(regions, config.sections)?;
        if let Some(id) = first {
            locator = locator.with_initial(&id);
        }
        Ok(Self {
            header: HysteresisGate::new(config.header_near_top)?,
            nav: HysteresisGate::new(config.nav_near_top)?,
            scroll_top: ThresholdFlag::new(config.scroll_top_after)?,
            locator,
            deck: CardDeck::new(cards, config.deck_crossfade)?,
            deck_anchors: config.deck_anchors,
            deck_domain: None,
            stepper: TabStepper::new(tabs, config.tabs)?,
            layout: SceneLayout::default(),
            layout_height: 0.0,
        })
    }

    /// New geometry from the render layer (mount, resize, content change).
    pub fn relayout(&mut self, layout: SceneLayout, viewport_height: f32) {
        if layout.regions.len() != self.locator.regions().len() {
            warn!(
                "layout has {} region bounds for {} regions; extra entries are ignored",
                layout.regions.len(),
                self.locator.regions().len()
            );
        }
        self.layout = layout;
        self.resolve_domains(viewport_height);
    }

    fn resolve_domains(&mut self, viewport_height: f32) {
        self.layout_height = viewport_height;
        self.deck_domain = match self.layout.deck {
            Some(b) => match self.deck_anchors.resolve(b.top, viewport_height) {
                Ok(d) => Some(d),
                Err(e) => {
                    warn!("card deck domain unavailable: {}", e);
                    None
                }
            },
            None => None,
        };
        debug!("scene laid out for viewport {:.0}px, deck domain {:?}", viewport_height, self.deck_domain);
    }

    pub fn pump<S: ScrollSource + ?Sized>(&mut self, source: &S) -> SceneFrame {
        let sample = source.sample();
        let offset = sample.offset;
        let vh = sample.viewport_height;

        if vh != self.layout_height {
            self.resolve_domains(vh);
        }

        let header_visible = self.header.update(offset);
        let nav_visible = self.nav.update(offset);
        let scroll_top_visible = self.scroll_top.eval(offset);

        let (active_region, named) = match self.locator.update_document(&self.layout.regions, offset, vh) {
            Some(r) => (Some(r.id.clone()), !r.name.is_empty()),
            None => (None, false),
        };
        let pin_visible = !nav_visible && named;

        let deck_progress = self.deck_domain.map_or(0.0, |d| d.sample(offset));
        let cards = self.deck.cards(deck_progress);

        let active_tab = match self.layout.tabs {
            Some(section) => self.stepper.update(offset, section, vh),
            None => self.stepper.active(),
        };

        SceneFrame {
            offset,
            header_visible,
            nav_visible,
            pin_visible,
            scroll_top_visible,
            active_region,
            deck_progress,
            cards,
            active_tab,
        }
    }

    pub fn select_tab(&mut self, index: usize) -> usize {
        self.stepper.select(index)
    }

    pub fn active_region(&self) -> Option<&Region> {
        self.locator.active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::signal::ScrollSample;

    fn scene() -> Scene {
        let regions = vec![
            Region::new("home", "", 0),
            Region::new("about", "About", 1),
            Region::new("projects", "Projects", 2),
        ];
        let mut s = Scene::new(&MotionConfig::default(), regions, 3, 2).unwrap();
        s.relayout(
            SceneLayout {
                regions: vec![
                    Bounds::new(0.0, 900.0),
                    Bounds::new(900.0, 1200.0),
                    Bounds::new(2100.0, 1500.0),
                ],
                deck: Some(Bounds::new(2100.0, 1500.0)),
                tabs: None,
            },
            900.0,
        );
        s
    }

    #[test]
    fn one_sample_drives_every_output() {
        let mut s = scene();
        let f = s.pump(&ScrollSample::new(0.0, 900.0));
        assert!(f.header_visible && f.nav_visible && !f.pin_visible && !f.scroll_top_visible);
        assert_eq!(f.active_region.as_deref(), Some("home"));
        assert_eq!(f.deck_progress, 0.0);
        assert_eq!(f.cards.iter().filter(|c| c.interactive).count(), 1);

        let f = s.pump(&ScrollSample::new(1200.0, 900.0));
        assert!(!f.header_visible && !f.nav_visible && f.scroll_top_visible);
        assert!(f.pin_visible);
        assert_eq!(f.active_region.as_deref(), Some("about"));

        // deck domain: [2100 - 315, 2100 - 90]
        let f = s.pump(&ScrollSample::new(2010.0, 900.0));
        assert_eq!(f.deck_progress, 1.0);
        assert!(f.cards[2].interactive);

        let f = s.pump(&ScrollSample::new(1900.0, 900.0));
        assert!(f.header_visible && f.nav_visible && !f.pin_visible);
        assert!(f.deck_progress > 0.0 && f.deck_progress < 1.0);
    }

    #[test]
    fn pin_replaces_the_nav_bar_while_scrolling_down() {
        let mut s = scene();
        let f = s.pump(&ScrollSample::new(0.0, 900.0));
        assert!(f.nav_visible && !f.pin_visible);

        // still on the unnamed hero section: nav hidden, nothing to pin
        let f = s.pump(&ScrollSample::new(300.0, 900.0));
        assert_eq!(f.active_region.as_deref(), Some("home"));
        assert!(!f.nav_visible && !f.pin_visible);

        let f = s.pump(&ScrollSample::new(1000.0, 900.0));
        assert_eq!(f.active_region.as_deref(), Some("about"));
        assert!(!f.nav_visible && f.pin_visible);

        let f = s.pump(&ScrollSample::new(950.0, 900.0));
        assert!(f.nav_visible && !f.pin_visible);
    }

    #[test]
    fn resize_reresolves_the_deck_domain() {
        let mut s = scene();
        let a = s.pump(&ScrollSample::new(1900.0, 900.0)).deck_progress;
        let b = s.pump(&ScrollSample::new(1900.0, 600.0)).deck_progress;
        assert_ne!(a, b);
    }

    #[test]
    fn frames_serialize() {
        let mut s = scene();
        let f = s.pump(&ScrollSample::new(0.0, 900.0));
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("\"active_region\":\"home\""));
    }
}
