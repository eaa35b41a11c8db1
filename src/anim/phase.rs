// src/anim/phase.rs
//! Phase-sequenced channel mapping over a `[0, 1]` signal.
//!
//! Two compositions:
//! - [`SequenceMapper`]: exclusive phases, exactly one current at a time, with an
//!   optional crossfade window centred on each boundary. Phase opacities always
//!   sum to 1.
//! - [`ChannelSet`]: independent named tracks (position, opacity, rotation...)
//!   each with their own keyed phases over the same signal.
//!
//! [`CardDeck`] is the timeline/card-flip preset built on a `SequenceMapper`.

use crate::anim::ease::Ease;
use crate::anim::error::MotionError;
use crate::utils::math::{clamp01, inv_lerp, lerp};
use serde::Serialize;

/// Layers at or below this opacity must not receive input.
pub const INTERACTIVE_THRESHOLD: f32 = 0.5;

pub const OPACITY: &str = "opacity";
pub const TRANSLATE_Y: &str = "translateY";
pub const ROTATION_DEG: &str = "rotationDeg";

/// Degrees a card turns over its own phase.
pub const FLIP_DEGREES: f32 = 180.0;

#[inline(always)]
pub fn interactive(opacity: f32) -> bool {
    opacity > INTERACTIVE_THRESHOLD
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Phase {
    id: String,
    start: f32,
    end: f32,
}

impl Phase {
    /// Zero-width phases are allowed and act as an instantaneous boundary.
    pub fn new(id: impl Into<String>, start: f32, end: f32) -> Result<Self, MotionError> {
        let id = id.into();
        let in_unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(start) || !in_unit(end) || end < start {
            return Err(MotionError::PhaseBounds { id, start, end });
        }
        Ok(Self { id, start, end })
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn start(&self) -> f32 { self.start }
    pub fn end(&self) -> f32 { self.end }
    pub fn width(&self) -> f32 { self.end - self.start }

    /// Local progress through this phase, clamped. Zero width steps at `start`.
    #[inline(always)]
    pub fn progress(&self, signal: f32) -> f32 {
        inv_lerp(self.start, self.end, clamp01(signal))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curve {
    pub from: f32,
    pub to: f32,
    pub ease: Ease,
}

impl Curve {
    pub const fn new(from: f32, to: f32, ease: Ease) -> Self {
        Self { from, to, ease }
    }

    pub const fn linear(from: f32, to: f32) -> Self {
        Self::new(from, to, Ease::Linear)
    }

    #[inline(always)]
    pub fn eval(&self, phase: &Phase, signal: f32) -> f32 {
        lerp(self.from, self.to, self.ease.apply(phase.progress(signal)))
    }
}

/* ------------------------ exclusive-sequential ------------------------ */

#[derive(Clone, Debug)]
pub struct SequenceMapper {
    phases: Vec<Phase>,
    crossfade: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SequenceFrame {
    pub signal: f32,
    pub current: usize,
    /// Opacity per phase; sums to 1.
    pub weights: Vec<f32>,
    /// Local progress per phase.
    pub progress: Vec<f32>,
}

impl SequenceFrame {
    pub fn interactive(&self, index: usize) -> bool {
        self.weights.get(index).is_some_and(|w| interactive(*w))
    }
}

impl SequenceMapper {
    /// `phases` must be ordered and must not overlap (contiguous or disjoint).
    /// `crossfade` is the full width of the blend window around each boundary;
    /// 0 switches instantaneously.
    pub fn new(phases: Vec<Phase>, crossfade: f32) -> Result<Self, MotionError> {
        if phases.is_empty() {
            return Err(MotionError::NoPhases);
        }
        for pair in phases.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(MotionError::PhaseOrder { id: pair[1].id.clone() });
            }
        }
        if !crossfade.is_finite() || crossfade < 0.0 {
            return Err(MotionError::Threshold { name: "crossfade", value: crossfade });
        }
        if crossfade > 0.0 {
            let narrowest = phases.iter().map(Phase::width).fold(f32::INFINITY, f32::min);
            if crossfade > narrowest {
                return Err(MotionError::Crossfade { width: crossfade, narrowest });
            }
        }
        Ok(Self { phases, crossfade })
    }

    pub fn phases(&self) -> &[Phase] { &self.phases }
    pub fn crossfade(&self) -> f32 { self.crossfade }

    /// Last phase whose start has been reached. Before the first start the
    /// first phase is current; a gap keeps the previous phase current.
    pub fn current(&self, signal: f32) -> usize {
        let s = clamp01(signal);
        self.phases.iter().rposition(|p| p.start <= s).unwrap_or(0)
    }

    pub fn weights(&self, signal: f32) -> Vec<f32> {
        let s = clamp01(signal);
        let n = self.phases.len();
        let cur = self.current(s);
        let mut w = vec![0.0; n];

        if self.crossfade > 0.0 {
            let half = 0.5 * self.crossfade;
            // approaching the next boundary
            if cur + 1 < n {
                let b = self.phases[cur + 1].start;
                if s >= b - half {
                    let t = ((s - (b - half)) / self.crossfade).clamp(0.0, 1.0);
                    w[cur] = 1.0 - t;
                    w[cur + 1] = t;
                    return w;
                }
            }
            // just past our own boundary
            if cur >= 1 {
                let b = self.phases[cur].start;
                if s < b + half {
                    let t = ((s - (b - half)) / self.crossfade).clamp(0.0, 1.0);
                    w[cur - 1] = 1.0 - t;
                    w[cur] = t;
                    return w;
                }
            }
        }

        w[cur] = 1.0;
        w
    }

    pub fn frame(&self, signal: f32) -> SequenceFrame {
        let s = clamp01(signal);
        SequenceFrame {
            signal: s,
            current: self.current(s),
            weights: self.weights(s),
            progress: self.phases.iter().map(|p| p.progress(s)).collect(),
        }
    }
}

/* ------------------------ independent channels ------------------------ */

#[derive(Clone, Debug, PartialEq)]
pub struct ChannelKey {
    pub phase: Phase,
    pub curve: Curve,
}

impl ChannelKey {
    pub fn new(phase: Phase, curve: Curve) -> Self {
        Self { phase, curve }
    }
}

/// One named output with its own keyed phases. Keys may overlap; the one that
/// started most recently drives the value. Gaps hold the previous key's end value.
#[derive(Clone, Debug)]
pub struct ChannelTrack {
    name: String,
    keys: Vec<ChannelKey>,
}

impl ChannelTrack {
    pub fn new(name: impl Into<String>, keys: Vec<ChannelKey>) -> Result<Self, MotionError> {
        if keys.is_empty() {
            return Err(MotionError::NoPhases);
        }
        for pair in keys.windows(2) {
            if pair[1].phase.start < pair[0].phase.start {
                return Err(MotionError::PhaseOrder { id: pair[1].phase.id.clone() });
            }
        }
        Ok(Self { name: name.into(), keys })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn eval(&self, signal: f32) -> f32 {
        let s = clamp01(signal);
        match self.keys.iter().rposition(|k| k.phase.start <= s) {
            Some(i) => {
                let k = &self.keys[i];
                k.curve.eval(&k.phase, s)
            }
            None => self.keys[0].curve.from,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChannelFrame {
    pub signal: f32,
    pub values: Vec<(String, f32)>,
}

impl ChannelFrame {
    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Derived from the opacity channel; a set without one is fully opaque.
    pub fn interactive(&self) -> bool {
        interactive(self.get(OPACITY).unwrap_or(1.0))
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChannelSet {
    tracks: Vec<ChannelTrack>,
}

impl ChannelSet {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, track: ChannelTrack) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn push(&mut self, track: ChannelTrack) {
        self.tracks.push(track);
    }

    pub fn evaluate(&self, signal: f32) -> ChannelFrame {
        let s = clamp01(signal);
        ChannelFrame {
            signal: s,
            values: self.tracks.iter().map(|t| (t.name.clone(), t.eval(s))).collect(),
        }
    }
}

/* ------------------------------ card deck ------------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CardState {
    pub index: usize,
    pub opacity: f32,
    pub rotation_deg: f32,
    pub interactive: bool,
}

/// `count` equal-width exclusive phases; each card fades per the sequence
/// weights and flips through [`FLIP_DEGREES`] over its own phase.
#[derive(Clone, Debug)]
pub struct CardDeck {
    seq: SequenceMapper,
    flip: Curve,
}

impl CardDeck {
    pub fn new(count: usize, crossfade: f32) -> Result<Self, MotionError> {
        if count == 0 {
            return Err(MotionError::NoPhases);
        }
        let n = count as f32;
        let phases = (0..count)
            .map(|i| Phase::new(format!("card-{}", i), i as f32 / n, (i + 1) as f32 / n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            seq: SequenceMapper::new(phases, crossfade)?,
            flip: Curve::new(0.0, FLIP_DEGREES, Ease::Smooth),
        })
    }

    pub fn len(&self) -> usize { self.seq.phases.len() }

    pub fn is_empty(&self) -> bool { self.seq.phases.is_empty() }

    pub fn cards(&self, signal: f32) -> Vec<CardState> {
        let s = clamp01(signal);
        let weights = self.seq.weights(s);
        self.seq
            .phases
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(index, (phase, opacity))| CardState {
                index,
                opacity,
                rotation_deg: self.flip.eval(phase, s),
                interactive: interactive(opacity),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab(crossfade: f32) -> SequenceMapper {
        SequenceMapper::new(
            vec![Phase::new("A", 0.0, 0.4).unwrap(), Phase::new("B", 0.4, 1.0).unwrap()],
            crossfade,
        )
        .unwrap()
    }

    #[test]
    fn instantaneous_switch_without_crossfade() {
        let m = ab(0.0);
        assert_eq!(m.weights(0.39), vec![1.0, 0.0]);
        assert_eq!(m.weights(0.4), vec![0.0, 1.0]);
        assert_eq!(m.current(0.39), 0);
        assert_eq!(m.current(0.4), 1);
    }

    #[test]
    fn weights_sum_to_one_everywhere() {
        for m in [ab(0.0), ab(0.2)] {
            for i in 0..=1000 {
                let s = i as f32 / 1000.0;
                let w = m.weights(s);
                let sum: f32 = w.iter().sum();
                assert!((sum - 1.0).abs() <= f32::EPSILON, "s={} w={:?}", s, w);
                let full = w.iter().filter(|v| **v >= 1.0).count();
                assert!(full <= 1, "two fully active phases at s={}", s);
            }
        }
    }

    #[test]
    fn crossfade_blends_in_inverse_proportion() {
        let m = ab(0.2);
        // window is [0.3, 0.5]
        assert_eq!(m.weights(0.29), vec![1.0, 0.0]);
        let mid = m.weights(0.4);
        assert!((mid[0] - 0.5).abs() < 1e-6 && (mid[1] - 0.5).abs() < 1e-6);
        let late = m.weights(0.45);
        assert!((late[0] - 0.25).abs() < 1e-5 && (late[1] - 0.75).abs() < 1e-5);
        assert_eq!(m.weights(0.5), vec![0.0, 1.0]);
    }

    #[test]
    fn interactive_is_a_strict_step_at_half() {
        assert!(!interactive(0.5));
        assert!(interactive(0.500_001));
        assert!(!interactive(0.0));

        let m = ab(0.2);
        let f = m.frame(0.35);
        assert!(f.interactive(0) && !f.interactive(1));
        let f = m.frame(0.45);
        assert!(!f.interactive(0) && f.interactive(1));
        assert!(!f.interactive(7));
    }

    #[test]
    fn out_of_range_signal_is_clamped() {
        let m = ab(0.0);
        assert_eq!(m.frame(-5.0).signal, 0.0);
        assert_eq!(m.weights(-5.0), vec![1.0, 0.0]);
        assert_eq!(m.weights(5.0), vec![0.0, 1.0]);
    }

    #[test]
    fn gaps_hold_previous_phase() {
        let m = SequenceMapper::new(
            vec![Phase::new("A", 0.1, 0.3).unwrap(), Phase::new("B", 0.6, 0.9).unwrap()],
            0.0,
        )
        .unwrap();
        assert_eq!(m.current(0.0), 0);
        assert_eq!(m.current(0.45), 0);
        assert_eq!(m.current(0.95), 1);
    }

    #[test]
    fn rejects_malformed_sequences() {
        let a = Phase::new("A", 0.0, 0.5).unwrap();
        let b = Phase::new("B", 0.4, 1.0).unwrap();
        assert_eq!(
            SequenceMapper::new(vec![a.clone(), b], 0.0).unwrap_err(),
            MotionError::PhaseOrder { id: "B".into() }
        );
        let c = Phase::new("C", 0.5, 0.6).unwrap();
        assert!(matches!(
            SequenceMapper::new(vec![a.clone(), c], 0.2),
            Err(MotionError::Crossfade { .. })
        ));
        assert!(SequenceMapper::new(vec![a], -0.1).is_err());
        assert_eq!(SequenceMapper::new(vec![], 0.0).unwrap_err(), MotionError::NoPhases);
        assert!(Phase::new("X", 0.6, 0.5).is_err());
        assert!(Phase::new("X", 0.0, 1.5).is_err());
    }

    #[test]
    fn zero_width_phase_returns_endpoint() {
        let p = Phase::new("cut", 0.5, 0.5).unwrap();
        let c = Curve::linear(10.0, 20.0);
        assert_eq!(c.eval(&p, 0.49), 10.0);
        assert_eq!(c.eval(&p, 0.5), 20.0);
        assert_eq!(c.eval(&p, 0.9), 20.0);
    }

    #[test]
    fn independent_tracks_share_one_sample() {
        let set = ChannelSet::new()
            .with(
                ChannelTrack::new(
                    TRANSLATE_Y,
                    vec![ChannelKey::new(Phase::new("rise", 0.0, 0.5).unwrap(), Curve::linear(40.0, 0.0))],
                )
                .unwrap(),
            )
            .with(
                ChannelTrack::new(
                    OPACITY,
                    vec![
                        ChannelKey::new(Phase::new("in", 0.2, 0.4).unwrap(), Curve::linear(0.0, 1.0)),
                        ChannelKey::new(Phase::new("out", 0.8, 1.0).unwrap(), Curve::linear(1.0, 0.0)),
                    ],
                )
                .unwrap(),
            );

        let f = set.evaluate(0.1);
        assert_eq!(f.get(TRANSLATE_Y), Some(32.0));
        assert_eq!(f.get(OPACITY), Some(0.0));
        assert!(!f.interactive());

        // gap between the opacity keys holds the fade-in's end
        let f = set.evaluate(0.6);
        assert_eq!(f.get(TRANSLATE_Y), Some(0.0));
        assert_eq!(f.get(OPACITY), Some(1.0));
        assert!(f.interactive());

        let f = set.evaluate(1.0);
        assert_eq!(f.get(OPACITY), Some(0.0));
        assert_eq!(f.get(ROTATION_DEG), None);
    }

    #[test]
    fn overlapping_keys_latest_start_wins() {
        let t = ChannelTrack::new(
            ROTATION_DEG,
            vec![
                ChannelKey::new(Phase::new("spin", 0.0, 1.0).unwrap(), Curve::linear(0.0, 360.0)),
                ChannelKey::new(Phase::new("snap", 0.5, 0.5).unwrap(), Curve::linear(0.0, 90.0)),
            ],
        )
        .unwrap();
        assert_eq!(t.eval(0.25), 90.0);
        assert_eq!(t.eval(0.75), 90.0);
    }

    #[test]
    fn card_deck_flips_one_card_at_a_time() {
        let deck = CardDeck::new(4, 0.0).unwrap();
        let cards = deck.cards(0.3);
        let active: Vec<_> = cards.iter().filter(|c| c.interactive).map(|c| c.index).collect();
        assert_eq!(active, vec![1]);
        assert_eq!(cards[0].rotation_deg, FLIP_DEGREES);
        assert_eq!(cards[3].rotation_deg, 0.0);
        assert!(cards[1].rotation_deg > 0.0 && cards[1].rotation_deg < FLIP_DEGREES);

        assert!(CardDeck::new(0, 0.0).is_err());
        assert!(CardDeck::new(4, 0.3).is_err());
    }
}
