// src/anim/timers.rs
//! Cooperative one-shot and periodic timers in a generational slot arena.
//!
//! Nothing here sleeps or spawns; the owner calls [`Timers::pop_due`] with the
//! current time and handles each fired payload before asking for the next.
//! Cancelling a timer bumps its slot generation, so a stale [`TimerId`] can
//! never address (or fire) whatever reuses the slot later.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId {
    slot: u32,
    generation: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Repeat {
    Once,
    Every(u64),
}

#[derive(Debug)]
struct Live<E> {
    due: u64,
    seq: u64,
    repeat: Repeat,
    event: E,
}

#[derive(Debug)]
struct Slot<E> {
    generation: u32,
    live: Option<Live<E>>,
}

#[derive(Debug)]
pub struct Timers<E> {
    slots: Vec<Slot<E>>,
    free: Vec<u32>,
    seq: u64,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self { slots: Vec::new(), free: Vec::new(), seq: 0 }
    }
}

impl<E: Clone> Timers<E> {
    pub fn new() -> Self { Self::default() }

    fn insert(&mut self, due: u64, repeat: Repeat, event: E) -> TimerId {
        self.seq += 1;
        let live = Live { due, seq: self.seq, repeat, event };
        match self.free.pop() {
            Some(slot) => {
                let s = &mut self.slots[slot as usize];
                s.live = Some(live);
                TimerId { slot, generation: s.generation }
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, live: Some(live) });
                TimerId { slot, generation: 0 }
            }
        }
    }

    /// Fire once at `at_ms`.
    pub fn once(&mut self, at_ms: u64, event: E) -> TimerId {
        self.insert(at_ms, Repeat::Once, event)
    }

    /// Fire at `first_ms`, then every `period_ms` (at least 1) until cancelled.
    pub fn every(&mut self, first_ms: u64, period_ms: u64, event: E) -> TimerId {
        self.insert(first_ms, Repeat::Every(period_ms.max(1)), event)
    }

    fn release(&mut self, slot: u32) {
        let s = &mut self.slots[slot as usize];
        s.live = None;
        s.generation = s.generation.wrapping_add(1);
        self.free.push(slot);
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.slots
            .get(id.slot as usize)
            .is_some_and(|s| s.generation == id.generation && s.live.is_some())
    }

    /// Returns false if the timer already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if !self.is_pending(id) {
            return false;
        }
        self.release(id.slot);
        true
    }

    pub fn clear(&mut self) {
        for slot in 0..self.slots.len() as u32 {
            if self.slots[slot as usize].live.is_some() {
                self.release(slot);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.live.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn next_due(&self) -> Option<u64> {
        self.slots.iter().filter_map(|s| s.live.as_ref().map(|l| l.due)).min()
    }

    /// Earliest timer due at or before `now_ms` (ties in scheduling order).
    /// A periodic timer fires once per call however many ticks were missed,
    /// then re-arms on its period grid strictly after `now_ms`. One whose next
    /// tick would pass `u64::MAX` is retired.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerId, E)> {
        let (slot, _) = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.live.as_ref().map(|l| (i, (l.due, l.seq))))
            .filter(|(_, (due, _))| *due <= now_ms)
            .min_by_key(|(_, key)| *key)?;

        let slot = slot as u32;
        let generation = self.slots[slot as usize].generation;
        let id = TimerId { slot, generation };
        let live = self.slots[slot as usize].live.as_ref()?;

        match live.repeat {
            Repeat::Once => {
                let event = live.event.clone();
                self.release(slot);
                Some((id, event))
            }
            Repeat::Every(period) => {
                let event = live.event.clone();
                let steps = (now_ms - live.due) / period + 1;
                let next = period.checked_mul(steps).and_then(|d| live.due.checked_add(d));
                match next {
                    Some(due) => {
                        self.seq += 1;
                        let seq = self.seq;
                        if let Some(l) = self.slots[slot as usize].live.as_mut() {
                            l.due = due;
                            l.seq = seq;
                        }
                    }
                    None => self.release(slot),
                }
                Some((id, event))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(t: &mut Timers<&'static str>, now: u64) -> Vec<&'static str> {
        let mut out = Vec::new();
        while let Some((_, e)) = t.pop_due(now) {
            out.push(e);
        }
        out
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut t = Timers::new();
        t.once(30, "c");
        t.once(10, "a");
        t.once(20, "b");
        t.once(20, "b2");
        assert_eq!(drain(&mut t, 5), Vec::<&str>::new());
        assert_eq!(drain(&mut t, 20), vec!["a", "b", "b2"]);
        assert_eq!(drain(&mut t, 100), vec!["c"]);
        assert!(t.is_empty());
    }

    #[test]
    fn periodic_skips_missed_ticks_and_stops_on_cancel() {
        let mut t = Timers::new();
        let id = t.every(10, 10, "tick");
        assert_eq!(drain(&mut t, 35).len(), 1);
        assert_eq!(t.next_due(), Some(40));
        assert_eq!(drain(&mut t, 40).len(), 1);
        assert_eq!(t.next_due(), Some(50));
        assert!(t.cancel(id));
        assert!(!t.cancel(id));
        assert_eq!(drain(&mut t, 1000).len(), 0);
    }

    #[test]
    fn periodic_near_the_end_of_time_retires() {
        let mut t = Timers::new();
        let id = t.every(u64::MAX - 5, 10, "tick");
        assert_eq!(drain(&mut t, u64::MAX), vec!["tick"]);
        assert!(!t.is_pending(id));
        assert!(t.is_empty());
    }

    #[test]
    fn stale_ids_cannot_touch_reused_slots() {
        let mut t = Timers::new();
        let old = t.once(10, "old");
        assert!(t.cancel(old));
        let new = t.once(10, "new");
        assert!(!t.is_pending(old));
        assert!(!t.cancel(old));
        assert!(t.is_pending(new));
        assert_eq!(drain(&mut t, 10), vec!["new"]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut t = Timers::new();
        let a = t.once(1, "a");
        t.every(1, 5, "b");
        t.clear();
        assert!(t.is_empty());
        assert!(!t.is_pending(a));
        assert_eq!(drain(&mut t, 100).len(), 0);
    }
}
