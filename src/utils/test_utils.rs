//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::completion::{Completer, CompletionError};
use crate::core::message::Turn;
use crate::core::session::{Session, SessionSettings, Temperature};

pub const MISTRAL: &str = "mistralai/mistral-7b-instruct:free";
pub const GROK: &str = "x-ai/grok-4-fast:free";

/// Session over the built-in catalog.
pub fn test_session(settings: SessionSettings) -> Session {
    Session::new(settings)
}

/// Default settings with the standard reveal pacing.
pub fn paced_settings() -> SessionSettings {
    SessionSettings {
        reveal_delay: Duration::from_millis(40),
        ..SessionSettings::default()
    }
}

/// Completer returning a canned result and recording what it was sent.
pub struct ScriptedCompleter {
    pub reply: Result<String, CompletionError>,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<(Vec<Turn>, String, Temperature)>>,
}

impl ScriptedCompleter {
    pub fn replying(reply: Result<&str, CompletionError>) -> Self {
        Self {
            reply: reply.map(str::to_string),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Completer for ScriptedCompleter {
    async fn complete(
        &self,
        turns: &[Turn],
        model_id: &str,
        temperature: Temperature,
    ) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((turns.to_vec(), model_id.to_string(), temperature));
        self.reply.clone()
    }
}
