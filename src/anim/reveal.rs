// src/anim/reveal.rs
//! Character-by-character "decryption" reveal.
//!
//! ```ignore
//! let mut rs = RevealScheduler::new(RandomGlyphs::from_os("01"), 35);
//! rs.schedule("hello there", 0, 20, clock.now_ms());
//!
//! // each frame
//! rs.advance(clock.now_ms());
//! let snap = rs.snapshot();
//! ```
//!
//! Unit `i` (char index, whitespace included) reveals at
//! `start + base_delay + (i + 1) * unit_interval`, one interval later than
//! `base_delay + i * unit_interval`: the first unit waits a full step too.
//! Deadlines saturate at `u64::MAX`. Whitespace is revealed from the start and
//! only separates words. While anything is still hidden a scramble tick
//! redraws the placeholder of every hidden unit; a jump in time redraws once.

use crate::anim::timers::{TimerId, Timers};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

pub const DEFAULT_ALPHABET: &str = "01";

/// Where placeholder glyphs come from. Swap in a deterministic source for tests.
pub trait GlyphSource {
    fn next_glyph(&mut self) -> char;
}

/// Uniform picks from an alphabet.
pub struct RandomGlyphs<R: Rng> {
    alphabet: Vec<char>,
    rng: R,
}

impl<R: Rng> RandomGlyphs<R> {
    /// An empty alphabet falls back to [`DEFAULT_ALPHABET`].
    pub fn new(alphabet: &str, rng: R) -> Self {
        let mut chars: Vec<char> = alphabet.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.is_empty() {
            chars = DEFAULT_ALPHABET.chars().collect();
        }
        Self { alphabet: chars, rng }
    }
}

impl RandomGlyphs<StdRng> {
    pub fn seeded(alphabet: &str, seed: u64) -> Self {
        Self::new(alphabet, StdRng::seed_from_u64(seed))
    }

    pub fn from_os(alphabet: &str) -> Self {
        Self::new(alphabet, StdRng::from_os_rng())
    }
}

impl<R: Rng> GlyphSource for RandomGlyphs<R> {
    fn next_glyph(&mut self) -> char {
        let i = self.rng.random_range(0..self.alphabet.len());
        self.alphabet[i]
    }
}

/// Walks a fixed glyph list round-robin.
#[derive(Clone, Debug)]
pub struct CycleGlyphs {
    glyphs: Vec<char>,
    next: usize,
}

impl CycleGlyphs {
    pub fn new(glyphs: &str) -> Self {
        let mut g: Vec<char> = glyphs.chars().collect();
        if g.is_empty() {
            g = DEFAULT_ALPHABET.chars().collect();
        }
        Self { glyphs: g, next: 0 }
    }
}

impl GlyphSource for CycleGlyphs {
    fn next_glyph(&mut self) -> char {
        let c = self.glyphs[self.next % self.glyphs.len()];
        self.next = self.next.wrapping_add(1);
        c
    }
}

/* ------------------------------ task ------------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TaskHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RevealUnit {
    pub content: char,
    pub revealed: bool,
    /// Placeholder shown until `revealed`.
    pub glyph: char,
}

impl RevealUnit {
    #[inline(always)]
    pub fn is_separator(&self) -> bool {
        self.content.is_whitespace()
    }

    #[inline(always)]
    pub fn display(&self) -> char {
        if self.revealed { self.content } else { self.glyph }
    }
}

/// Contiguous non-whitespace units, as an index range into the task's units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WordGroup {
    pub start: usize,
    pub end: usize,
    pub trailing_space: bool,
}

#[derive(Clone, Debug)]
pub struct RevealTask {
    handle: TaskHandle,
    units: Vec<RevealUnit>,
    started_ms: u64,
    base_delay_ms: u64,
    unit_interval_ms: u64,
    hidden: usize,
    completed_ms: Option<u64>,
}

impl RevealTask {
    pub fn handle(&self) -> TaskHandle { self.handle }
    pub fn units(&self) -> &[RevealUnit] { &self.units }
    pub fn started_ms(&self) -> u64 { self.started_ms }
    pub fn completed_ms(&self) -> Option<u64> { self.completed_ms }
    pub fn is_complete(&self) -> bool { self.hidden == 0 }

    /// Reveal time of unit `index`; `None` for separators and out-of-range indices.
    pub fn deadline(&self, index: usize) -> Option<u64> {
        let u = self.units.get(index)?;
        if u.is_separator() {
            return None;
        }
        let step = (index as u64 + 1).saturating_mul(self.unit_interval_ms);
        Some(self.started_ms.saturating_add(self.base_delay_ms).saturating_add(step))
    }

    pub fn display(&self) -> String {
        self.units.iter().map(RevealUnit::display).collect()
    }

    pub fn words(&self) -> Vec<WordGroup> {
        let mut groups = Vec::new();
        let mut start: Option<usize> = None;
        for (i, u) in self.units.iter().enumerate() {
            match (u.is_separator(), start) {
                (true, Some(s)) => {
                    groups.push(WordGroup { start: s, end: i, trailing_space: true });
                    start = None;
                }
                (false, None) => start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = start {
            groups.push(WordGroup { start: s, end: self.units.len(), trailing_space: false });
        }
        groups
    }

    pub fn snapshot(&self) -> RevealSnapshot {
        RevealSnapshot {
            task: self.handle,
            complete: self.is_complete(),
            units: self
                .units
                .iter()
                .map(|u| UnitView { glyph: u.display(), revealed: u.revealed })
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct UnitView {
    pub glyph: char,
    pub revealed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RevealSnapshot {
    pub task: TaskHandle,
    pub complete: bool,
    pub units: Vec<UnitView>,
}

/* ---------------------------- scheduler ---------------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RevealEvent {
    Reveal { task: TaskHandle, index: usize },
    Scramble { task: TaskHandle },
}

/// Owns at most one live [`RevealTask`] and every timer belonging to it.
pub struct RevealScheduler<G: GlyphSource> {
    glyphs: G,
    timers: Timers<RevealEvent>,
    task: Option<RevealTask>,
    scramble: Option<TimerId>,
    scramble_period_ms: u64,
    next_handle: u64,
}

impl<G: GlyphSource> RevealScheduler<G> {
    pub fn new(glyphs: G, scramble_period_ms: u64) -> Self {
        Self {
            glyphs,
            timers: Timers::new(),
            task: None,
            scramble: None,
            scramble_period_ms: scramble_period_ms.max(1),
            next_handle: 0,
        }
    }

    /// Replace any running task with a fresh one for `text`, starting at `now_ms`.
    pub fn schedule(&mut self, text: &str, base_delay_ms: u64, unit_interval_ms: u64, now_ms: u64) -> TaskHandle {
        self.cancel();

        self.next_handle += 1;
        let handle = TaskHandle(self.next_handle);

        let units: Vec<RevealUnit> = text
            .chars()
            .map(|c| {
                if c.is_whitespace() {
                    RevealUnit { content: c, revealed: true, glyph: c }
                } else {
                    RevealUnit { content: c, revealed: false, glyph: self.glyphs.next_glyph() }
                }
            })
            .collect();

        let mut task = RevealTask {
            handle,
            units,
            started_ms: now_ms,
            base_delay_ms,
            unit_interval_ms,
            hidden: 0,
            completed_ms: None,
        };

        for index in 0..task.units.len() {
            if let Some(at) = task.deadline(index) {
                self.timers.once(at, RevealEvent::Reveal { task: handle, index });
                task.hidden += 1;
            }
        }

        if task.hidden == 0 {
            task.completed_ms = Some(now_ms);
        } else {
            let p = self.scramble_period_ms;
            self.scramble = Some(self.timers.every(now_ms.saturating_add(p), p, RevealEvent::Scramble { task: handle }));
        }

        debug!(
            "reveal task {:?}: {} units, {} hidden, base {}ms, step {}ms",
            handle, task.units.len(), task.hidden, base_delay_ms, unit_interval_ms
        );
        self.task = Some(task);
        handle
    }

    /// Tear down the current task (unmount). Every pending deadline and the
    /// scramble tick are removed, not merely ignored.
    pub fn cancel(&mut self) -> Option<TaskHandle> {
        self.timers.clear();
        self.scramble = None;
        let gone = self.task.take().map(|t| t.handle);
        if let Some(h) = gone {
            trace!("reveal task {:?} cancelled", h);
        }
        gone
    }

    /// Fire everything due at or before `now_ms`. Returns how many timers fired.
    pub fn advance(&mut self, now_ms: u64) -> usize {
        let mut fired = 0;
        while let Some((_, event)) = self.timers.pop_due(now_ms) {
            let Some(task) = self.task.as_mut() else { break };
            fired += 1;
            match event {
                RevealEvent::Reveal { task: owner, index } => {
                    debug_assert_eq!(owner, task.handle);
                    let at = task.deadline(index).unwrap_or(now_ms);
                    let unit = &mut task.units[index];
                    if !unit.revealed {
                        unit.revealed = true;
                        task.hidden -= 1;
                    }
                    if task.hidden == 0 {
                        task.completed_ms = Some(at);
                        if let Some(id) = self.scramble.take() {
                            self.timers.cancel(id);
                        }
                        debug!("reveal task {:?} complete at {}ms", task.handle, at);
                    }
                }
                RevealEvent::Scramble { task: owner } => {
                    debug_assert_eq!(owner, task.handle);
                    for u in task.units.iter_mut().filter(|u| !u.revealed) {
                        u.glyph = self.glyphs.next_glyph();
                    }
                }
            }
        }
        fired
    }

    pub fn task(&self) -> Option<&RevealTask> { self.task.as_ref() }

    pub fn snapshot(&self) -> Option<RevealSnapshot> {
        self.task.as_ref().map(RevealTask::snapshot)
    }

    pub fn is_scrambling(&self) -> bool {
        self.scramble.is_some_and(|id| self.timers.is_pending(id))
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timers.next_due()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> RevealScheduler<CycleGlyphs> {
        RevealScheduler::new(CycleGlyphs::new("01"), 35)
    }

    fn revealed(rs: &RevealScheduler<CycleGlyphs>) -> Vec<bool> {
        rs.task().unwrap().units().iter().map(|u| u.revealed).collect()
    }

    #[test]
    fn two_units_reveal_on_schedule() {
        let mut rs = scheduler();
        rs.schedule("ab", 0, 100, 0);
        rs.advance(0);
        assert_eq!(revealed(&rs), vec![false, false]);
        assert!(rs.is_scrambling());

        rs.advance(99);
        assert_eq!(revealed(&rs), vec![false, false]);
        rs.advance(100);
        assert_eq!(revealed(&rs), vec![true, false]);
        rs.advance(199);
        assert_eq!(revealed(&rs), vec![true, false]);
        rs.advance(200);
        assert_eq!(revealed(&rs), vec![true, true]);
        assert!(!rs.is_scrambling());
        assert_eq!(rs.pending_timers(), 0);
        assert_eq!(rs.task().unwrap().completed_ms(), Some(200));

        let before = rs.snapshot();
        assert_eq!(rs.advance(10_000), 0);
        assert_eq!(rs.snapshot(), before);
        assert_eq!(rs.task().unwrap().display(), "ab");
    }

    #[test]
    fn scramble_only_touches_hidden_units() {
        let mut rs = RevealScheduler::new(CycleGlyphs::new("xyz"), 10);
        rs.schedule("ab", 0, 100, 0);
        // initial placeholders drawn in order
        assert_eq!(rs.task().unwrap().display(), "xy");
        rs.advance(10);
        assert_eq!(rs.task().unwrap().display(), "zx");
        rs.advance(100);
        // missed ticks collapse into one redraw; `a` now shows through
        let d = rs.task().unwrap().display();
        assert!(d.starts_with('a'));
        let after_reveal = d.chars().nth(1).unwrap();
        rs.advance(110);
        assert_ne!(rs.task().unwrap().display().chars().nth(1).unwrap(), after_reveal);
        assert_eq!(rs.task().unwrap().display().chars().next(), Some('a'));
    }

    #[test]
    fn whitespace_is_prerevealed_and_keeps_its_slot() {
        let mut rs = scheduler();
        rs.schedule("a b", 50, 10, 1000);
        let task = rs.task().unwrap();
        assert_eq!(revealed(&rs), vec![false, true, false]);
        assert_eq!(task.deadline(0), Some(1060));
        assert_eq!(task.deadline(1), None);
        assert_eq!(task.deadline(2), Some(1080));
        assert_eq!(
            task.words(),
            vec![
                WordGroup { start: 0, end: 1, trailing_space: true },
                WordGroup { start: 2, end: 3, trailing_space: false },
            ]
        );
    }

    #[test]
    fn empty_text_completes_without_timers() {
        let mut rs = scheduler();
        rs.schedule("", 0, 20, 5);
        assert!(rs.task().unwrap().is_complete());
        assert_eq!(rs.task().unwrap().completed_ms(), Some(5));
        assert_eq!(rs.pending_timers(), 0);
        assert!(!rs.is_scrambling());

        rs.schedule("   ", 0, 20, 5);
        assert!(rs.task().unwrap().is_complete());
        assert_eq!(rs.pending_timers(), 0);
    }

    #[test]
    fn rescheduling_cancels_the_previous_task() {
        let mut rs = scheduler();
        let first = rs.schedule("abcdef", 0, 100, 0);
        rs.advance(250);
        assert_eq!(revealed(&rs), vec![true, true, false, false, false, false]);

        let second = rs.schedule("abcdef", 0, 100, 250);
        assert_ne!(first, second);
        // restarted from index 0, nothing carried over
        assert_eq!(revealed(&rs), vec![false; 6]);
        assert_eq!(rs.pending_timers(), 7);

        rs.advance(349);
        assert_eq!(revealed(&rs), vec![false; 6]);
        rs.advance(350);
        assert!(revealed(&rs)[0]);
    }

    #[test]
    fn huge_delays_saturate_instead_of_overflowing() {
        let mut rs = scheduler();
        rs.schedule("ab", u64::MAX - 50, 100, 0);
        assert_eq!(rs.task().unwrap().deadline(0), Some(u64::MAX));
        assert_eq!(rs.task().unwrap().deadline(1), Some(u64::MAX));
        rs.advance(1_000);
        assert_eq!(revealed(&rs), vec![false, false]);
        rs.advance(u64::MAX);
        assert!(rs.task().unwrap().is_complete());
        assert_eq!(rs.pending_timers(), 0);

        rs.schedule("a", 0, 0, u64::MAX - 10);
        assert_eq!(rs.next_due(), Some(u64::MAX - 10));
        rs.advance(u64::MAX - 10);
        assert!(rs.task().unwrap().is_complete());
        assert!(!rs.is_scrambling());
        assert_eq!(rs.pending_timers(), 0);
    }

    #[test]
    fn cancel_removes_every_timer() {
        let mut rs = scheduler();
        rs.schedule("hello", 0, 10, 0);
        assert!(rs.cancel().is_some());
        assert_eq!(rs.pending_timers(), 0);
        assert_eq!(rs.advance(1_000_000), 0);
        assert!(rs.task().is_none());
        assert!(rs.cancel().is_none());
    }

    #[test]
    fn seeded_random_glyphs_are_reproducible() {
        let mut a = RandomGlyphs::seeded("01", 7);
        let mut b = RandomGlyphs::seeded("01", 7);
        let sa: String = (0..32).map(|_| a.next_glyph()).collect();
        let sb: String = (0..32).map(|_| b.next_glyph()).collect();
        assert_eq!(sa, sb);
        assert!(sa.chars().all(|c| c == '0' || c == '1'));

        let mut fallback = RandomGlyphs::seeded("", 1);
        assert!(DEFAULT_ALPHABET.contains(fallback.next_glyph()));
    }
}
