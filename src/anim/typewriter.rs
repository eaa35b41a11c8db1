// src/anim/typewriter.rs
//! Splash-screen typewriter: type the word out, hold, delete it, then finish.
//! Closed-form in elapsed time, so any frame can be rendered without replaying
//! the steps before it.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypewriterTiming {
    pub start_delay_ms: u64,
    pub type_interval_ms: u64,
    pub hold_ms: u64,
    pub delete_interval_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Stage {
    Typing,
    Holding,
    Deleting,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TypewriterFrame {
    pub shown: usize,
    pub stage: Stage,
}

#[derive(Clone, Debug)]
pub struct Typewriter {
    text: String,
    len: u64,
    timing: TypewriterTiming,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, timing: TypewriterTiming) -> Self {
        let text = text.into();
        let len = text.chars().count() as u64;
        Self { text, len, timing }
    }

    pub fn text(&self) -> &str { &self.text }

    // Time at which the last character appears.
    fn typed_end(&self) -> u64 {
        let typing = self.len.saturating_sub(1).saturating_mul(self.timing.type_interval_ms);
        self.timing.start_delay_ms.saturating_add(typing)
    }

    // One more type step passes before the hold starts counting.
    fn hold_end(&self) -> u64 {
        self.typed_end()
            .saturating_add(self.timing.type_interval_ms)
            .saturating_add(self.timing.hold_ms)
    }

    fn deleted_end(&self) -> u64 {
        self.hold_end().saturating_add(self.len.saturating_mul(self.timing.delete_interval_ms))
    }

    /// When the sequence hands control back (the splash can unmount).
    pub fn finished_at(&self) -> u64 {
        if self.len == 0 {
            return self.timing.start_delay_ms;
        }
        self.deleted_end().saturating_add(self.timing.delete_interval_ms)
    }

    pub fn frame(&self, elapsed_ms: u64) -> TypewriterFrame {
        let t = &self.timing;
        let typing = |shown: u64| TypewriterFrame { shown: shown as usize, stage: Stage::Typing };

        if elapsed_ms >= self.finished_at() {
            return TypewriterFrame { shown: 0, stage: Stage::Finished };
        }
        if elapsed_ms < t.start_delay_ms {
            return typing(0);
        }
        if elapsed_ms < self.typed_end() {
            let step = t.type_interval_ms.max(1);
            return typing(1 + (elapsed_ms - t.start_delay_ms) / step);
        }
        if elapsed_ms < self.hold_end() {
            return TypewriterFrame { shown: self.len as usize, stage: Stage::Holding };
        }
        let removed = if t.delete_interval_ms == 0 {
            self.len
        } else {
            ((elapsed_ms - self.hold_end()) / t.delete_interval_ms).min(self.len)
        };
        TypewriterFrame { shown: (self.len - removed) as usize, stage: Stage::Deleting }
    }

    pub fn text_at(&self, elapsed_ms: u64) -> &str {
        let shown = self.frame(elapsed_ms).shown;
        match self.text.char_indices().nth(shown) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }
}
