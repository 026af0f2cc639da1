//! Per-model chat history held for the lifetime of a session.

use std::collections::HashMap;

use crate::core::message::Turn;

/// In-memory mapping from model id to that model's ordered turns.
///
/// Transcripts never observe each other: every operation is keyed by model
/// id. Turns are appended in call order; alternation between user and
/// assistant is not enforced.
#[derive(Debug, Default, Clone)]
pub struct TranscriptStore {
    transcripts: HashMap<String, Vec<Turn>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the transcript for `model_id`, creating an empty one if absent.
    pub fn get_or_create(&mut self, model_id: &str) -> &[Turn] {
        self.transcripts.entry(model_id.to_string()).or_default()
    }

    /// Read-only lookup that never creates an entry.
    pub fn get(&self, model_id: &str) -> Option<&[Turn]> {
        self.transcripts.get(model_id).map(Vec::as_slice)
    }

    pub fn append(&mut self, model_id: &str, turn: Turn) {
        self.transcripts
            .entry(model_id.to_string())
            .or_default()
            .push(turn);
    }

    pub fn clear(&mut self, model_id: &str) {
        self.transcripts.insert(model_id.to_string(), Vec::new());
    }

    pub fn len(&self, model_id: &str) -> usize {
        self.get(model_id).map_or(0, <[Turn]>::len)
    }

    pub fn is_empty(&self, model_id: &str) -> bool {
        self.len(model_id) == 0
    }
}
