//! Word-by-word replay of a finished response.
//!
//! The completion arrives in one piece; this paces its display so the reply
//! appears to be typed. The pacing is purely cosmetic.

use std::time::{Duration, Instant};

pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(40);

/// Shown after the partial text while a reveal is in progress.
pub const CURSOR_MARKER: &str = "▌";

#[derive(Debug, Clone)]
pub struct Reveal {
    text: String,
    chunks: Vec<String>,
    shown: usize,
    delay: Duration,
    next_at: Instant,
}

impl Reveal {
    pub fn new(text: impl Into<String>, delay: Duration, now: Instant) -> Self {
        let text = text.into();
        let chunks = text.split_whitespace().map(str::to_string).collect();
        Self {
            text,
            chunks,
            shown: 0,
            delay,
            next_at: now + delay,
        }
    }

    /// Reveal every chunk whose deadline has passed. Returns true when the
    /// visible text changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let before = self.shown;
        while !self.is_complete() && now >= self.next_at {
            self.shown += 1;
            self.next_at += self.delay;
        }
        self.shown != before
    }

    pub fn finish(&mut self) {
        self.shown = self.chunks.len();
    }

    pub fn is_complete(&self) -> bool {
        self.shown >= self.chunks.len()
    }

    /// Text to draw this frame: the revealed prefix plus the cursor marker,
    /// or the full response once every chunk is out.
    pub fn visible_text(&self) -> String {
        if self.is_complete() {
            return self.text.clone();
        }
        let mut visible = String::new();
        for chunk in &self.chunks[..self.shown] {
            visible.push_str(chunk);
            visible.push(' ');
        }
        visible.push_str(CURSOR_MARKER);
        visible
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
