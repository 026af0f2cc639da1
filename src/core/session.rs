//! Session-scoped chat state and the per-turn state machine.
//!
//! A [`Session`] is the explicit context the UI reads from and writes back
//! into. It owns every transcript together with the selected model,
//! temperature and theme. Nothing here is process-global, so several
//! sessions can coexist without observing each other.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::core::completion::{Completer, CompletionError, CompletionMessage, CompletionParams};
use crate::core::message::Turn;
use crate::core::models::{load_builtin_models, model_index, ModelOption};
use crate::core::reveal::{Reveal, DEFAULT_REVEAL_DELAY};
use crate::core::transcript::TranscriptStore;
use crate::ui::theme::ThemeMode;

/// Sampling temperature in the range 0.0-1.0, held as whole tenths so the
/// 0.1 step of the settings control is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temperature(u8);

impl Temperature {
    pub const MIN: Temperature = Temperature(0);
    pub const MAX: Temperature = Temperature(10);
    pub const DEFAULT: Temperature = Temperature(7);

    pub fn from_tenths(tenths: u8) -> Option<Self> {
        (tenths <= Self::MAX.0).then_some(Self(tenths))
    }

    /// Snap a value in 0.0-1.0 to the nearest tenth.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return None;
        }
        Self::from_tenths((value * 10.0).round() as u8)
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    pub fn raised(self) -> Self {
        Self((self.0 + 1).min(Self::MAX.0))
    }

    pub fn lowered(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

impl FromStr for Temperature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f64>()
            .ok()
            .and_then(Self::from_f64)
            .ok_or_else(|| format!("temperature must be between 0.0 and 1.0, got '{s}'"))
    }
}

/// Startup choices for a new session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub model_id: Option<String>,
    pub temperature: Temperature,
    pub theme: ThemeMode,
    pub reveal_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model_id: None,
            temperature: Temperature::DEFAULT,
            theme: ThemeMode::default(),
            reveal_delay: DEFAULT_REVEAL_DELAY,
        }
    }
}

#[derive(Debug, Clone)]
pub enum TurnPhase {
    Idle,
    AwaitingResponse {
        request_id: u64,
        model_id: String,
        started: Instant,
    },
    Revealing {
        model_id: String,
        reveal: Reveal,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Empty or whitespace-only input; nothing happened.
    Ignored,
    /// A request is already in flight for this session.
    Busy,
    /// The user turn was appended and this request should be sent.
    Send(CompletionParams),
}

pub const BUSY_NOTICE: &str = "Wait for the current response to finish.";

pub struct Session {
    models: Vec<ModelOption>,
    selected: usize,
    temperature: Temperature,
    theme: ThemeMode,
    transcripts: TranscriptStore,
    phase: TurnPhase,
    notice: Option<Notice>,
    next_request_id: u64,
    reveal_delay: Duration,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_models(load_builtin_models(), settings)
            .expect("builtin_models.toml lists at least one model")
    }

    /// Build a session over an explicit catalog. Returns `None` for an empty
    /// catalog, since a session always has a selected model.
    pub fn with_models(models: Vec<ModelOption>, settings: SessionSettings) -> Option<Self> {
        if models.is_empty() {
            return None;
        }
        let selected = settings
            .model_id
            .as_deref()
            .and_then(|id| model_index(&models, id))
            .unwrap_or(0);

        let mut session = Self {
            models,
            selected,
            temperature: settings.temperature,
            theme: settings.theme,
            transcripts: TranscriptStore::new(),
            phase: TurnPhase::Idle,
            notice: None,
            next_request_id: 1,
            reveal_delay: settings.reveal_delay,
        };
        session.ensure_selected_transcript();
        Some(session)
    }

    pub fn models(&self) -> &[ModelOption] {
        &self.models
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_model(&self) -> &ModelOption {
        &self.models[self.selected]
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, TurnPhase::Idle)
    }

    pub fn is_awaiting_response(&self) -> bool {
        matches!(self.phase, TurnPhase::AwaitingResponse { .. })
    }

    /// Turns of the selected model's transcript.
    pub fn transcript(&self) -> &[Turn] {
        self.transcripts
            .get(&self.selected_model().id)
            .unwrap_or(&[])
    }

    pub fn transcripts(&self) -> &TranscriptStore {
        &self.transcripts
    }

    /// Partially revealed assistant text for the selected model, if any.
    pub fn revealing_text(&self) -> Option<String> {
        match &self.phase {
            TurnPhase::Revealing { model_id, reveal } if *model_id == self.selected_model().id => {
                Some(reveal.visible_text())
            }
            _ => None,
        }
    }

    fn ensure_selected_transcript(&mut self) {
        let id = self.models[self.selected].id.clone();
        self.transcripts.get_or_create(&id);
    }

    /// Switch the displayed and mutated transcript. Refused while a turn is
    /// in flight so the pending reply lands where it was asked.
    pub fn select_model(&mut self, index: usize) -> bool {
        if index >= self.models.len() {
            return false;
        }
        if self.is_busy() {
            self.notice = Some(Notice::Info(BUSY_NOTICE.to_string()));
            return false;
        }
        self.selected = index;
        self.ensure_selected_transcript();
        debug!(model = %self.selected_model().id, "model selected");
        true
    }

    pub fn select_next_model(&mut self) -> bool {
        let next = (self.selected + 1) % self.models.len();
        self.select_model(next)
    }

    pub fn select_previous_model(&mut self) -> bool {
        let previous = if self.selected == 0 {
            self.models.len() - 1
        } else {
            self.selected - 1
        };
        self.select_model(previous)
    }

    pub fn set_temperature(&mut self, temperature: Temperature) {
        self.temperature = temperature;
    }

    pub fn raise_temperature(&mut self) {
        self.temperature = self.temperature.raised();
    }

    pub fn lower_temperature(&mut self) {
        self.temperature = self.temperature.lowered();
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Empty the selected model's transcript. Other models are untouched.
    pub fn clear_history(&mut self) -> bool {
        if self.is_busy() {
            self.notice = Some(Notice::Info(BUSY_NOTICE.to_string()));
            return false;
        }
        let id = self.selected_model().id.clone();
        self.transcripts.clear(&id);
        self.notice = None;
        true
    }

    /// Accept user input: append it as a user turn and hand back the request
    /// to issue. The caller must route the result to [`Session::complete_turn`].
    pub fn begin_turn(&mut self, input: &str, now: Instant) -> SubmitOutcome {
        if input.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.is_busy() {
            return SubmitOutcome::Busy;
        }

        let model_id = self.selected_model().id.clone();
        self.transcripts.append(&model_id, Turn::user(input));
        self.notice = None;

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.phase = TurnPhase::AwaitingResponse {
            request_id,
            model_id: model_id.clone(),
            started: now,
        };

        SubmitOutcome::Send(CompletionParams {
            turns: self.transcripts.get(&model_id).unwrap_or(&[]).to_vec(),
            model_id,
            temperature: self.temperature,
            request_id,
        })
    }

    /// Settle an in-flight request. Results for any other request id are
    /// dropped.
    pub fn complete_turn(&mut self, request_id: u64, message: CompletionMessage, now: Instant) {
        let model_id = match &self.phase {
            TurnPhase::AwaitingResponse {
                request_id: pending,
                model_id,
                started,
            } if *pending == request_id => {
                debug!(
                    request_id,
                    elapsed_ms = now.saturating_duration_since(*started).as_millis() as u64,
                    "completion settled"
                );
                model_id.clone()
            }
            _ => {
                debug!(request_id, "ignoring stale completion result");
                return;
            }
        };

        match message {
            CompletionMessage::Completed(text) if !text.is_empty() => {
                self.phase = TurnPhase::Revealing {
                    model_id,
                    reveal: Reveal::new(text, self.reveal_delay, now),
                };
                self.tick(now);
            }
            CompletionMessage::Completed(_) => {
                self.fail_turn(CompletionError::EmptyResponse.to_string());
            }
            CompletionMessage::Failed(err) => self.fail_turn(err.to_string()),
        }
    }

    fn fail_turn(&mut self, detail: String) {
        self.phase = TurnPhase::Idle;
        self.notice = Some(Notice::Error(format!(
            "⚠️ Failed to get AI response: {detail}"
        )));
    }

    /// Advance the reveal animation. Returns true when anything visible
    /// changed. Once the full reply has been shown it is appended to the
    /// transcript it was requested for and the session returns to idle.
    pub fn tick(&mut self, now: Instant) -> bool {
        let TurnPhase::Revealing { reveal, .. } = &mut self.phase else {
            return false;
        };
        let changed = reveal.advance(now);
        if !reveal.is_complete() {
            return changed;
        }

        if let TurnPhase::Revealing { model_id, reveal } =
            std::mem::replace(&mut self.phase, TurnPhase::Idle)
        {
            self.transcripts
                .append(&model_id, Turn::assistant(reveal.into_text()));
        }
        true
    }

    /// Skip the rest of the animation.
    pub fn finish_reveal(&mut self) {
        if let TurnPhase::Revealing { reveal, .. } = &mut self.phase {
            reveal.finish();
        }
        self.tick(Instant::now());
    }

    /// Run one full turn inline: submit, wait for the completer, and commit
    /// the reply without pacing. Returns `Ok(None)` when the input was
    /// ignored, and `EmptyResponse` when the reply cleaned to nothing.
    pub async fn submit<C>(
        &mut self,
        input: &str,
        completer: &C,
    ) -> Result<Option<String>, CompletionError>
    where
        C: Completer + ?Sized,
    {
        let params = match self.begin_turn(input, Instant::now()) {
            SubmitOutcome::Send(params) => params,
            SubmitOutcome::Ignored | SubmitOutcome::Busy => return Ok(None),
        };

        let result = completer
            .complete(&params.turns, &params.model_id, params.temperature)
            .await
            .and_then(|text| {
                if text.is_empty() {
                    Err(CompletionError::EmptyResponse)
                } else {
                    Ok(text)
                }
            });
        let message = match &result {
            Ok(text) => CompletionMessage::Completed(text.clone()),
            Err(err) => CompletionMessage::Failed(err.clone()),
        };
        self.complete_turn(params.request_id, message, Instant::now());
        self.finish_reveal();

        result.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::TranscriptRole;
    use crate::utils::test_utils::{paced_settings, ScriptedCompleter, GROK, MISTRAL};
    use std::sync::atomic::Ordering;

    fn session() -> Session {
        Session::new(paced_settings())
    }

    #[test]
    fn defaults_match_settings_panel() {
        let session = session();
        assert_eq!(session.selected_model().id, MISTRAL);
        assert_eq!(session.temperature(), Temperature::DEFAULT);
        assert_eq!(session.temperature().to_string(), "0.7");
        assert_eq!(session.theme(), ThemeMode::Light);
        assert!(session.transcript().is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn unknown_startup_model_falls_back_to_first() {
        let session = Session::new(SessionSettings {
            model_id: Some("nope/nope".to_string()),
            ..SessionSettings::default()
        });
        assert_eq!(session.selected_index(), 0);
    }

    #[tokio::test]
    async fn hello_produces_user_then_assistant_turn() {
        let mut session = session();
        let completer = ScriptedCompleter::replying(Ok("Hi there"));

        let reply = session.submit("Hello", &completer).await;

        assert_eq!(reply, Ok(Some("Hi there".to_string())));
        assert_eq!(
            session.transcript(),
            &[Turn::user("Hello"), Turn::assistant("Hi there")][..]
        );
        assert!(!session.is_busy());

        let seen = completer.seen.lock().unwrap();
        let (turns, model, temperature) = &seen[0];
        assert_eq!(turns, &vec![Turn::user("Hello")]);
        assert_eq!(model, MISTRAL);
        assert_eq!(*temperature, Temperature::DEFAULT);
    }

    #[tokio::test]
    async fn whitespace_input_is_ignored_without_a_call() {
        let mut session = session();
        let completer = ScriptedCompleter::replying(Ok("unused"));

        assert_eq!(session.submit("  \n\t ", &completer).await, Ok(None));
        assert_eq!(session.submit("", &completer).await, Ok(None));

        assert!(session.transcript().is_empty());
        assert_eq!(completer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_keeps_user_turn_and_sets_error_notice() {
        let mut session = session();
        let completer = ScriptedCompleter::replying(Err(CompletionError::Http {
            status: 500,
            body: "quota exceeded".to_string(),
        }));

        let reply = session.submit("Hello", &completer).await;

        assert!(reply.is_err());
        assert_eq!(session.transcript(), &[Turn::user("Hello")][..]);
        assert!(!session.is_busy());
        let notice = session.notice().expect("error notice");
        assert!(notice.is_error());
        assert!(notice.text().contains("quota exceeded"));
    }

    #[test]
    fn second_submission_while_awaiting_is_refused() {
        let mut session = session();
        let now = Instant::now();

        assert!(matches!(
            session.begin_turn("first", now),
            SubmitOutcome::Send(_)
        ));
        assert!(matches!(
            session.begin_turn("second", now),
            SubmitOutcome::Busy
        ));
        assert_eq!(session.transcript(), &[Turn::user("first")][..]);
    }

    #[test]
    fn request_carries_full_history_including_new_turn() {
        let mut session = session();
        let now = Instant::now();

        let SubmitOutcome::Send(first) = session.begin_turn("one", now) else {
            panic!("expected request");
        };
        session.complete_turn(
            first.request_id,
            CompletionMessage::Completed("reply one".to_string()),
            now,
        );
        session.finish_reveal();

        session.raise_temperature();
        let SubmitOutcome::Send(second) = session.begin_turn("two", now) else {
            panic!("expected request");
        };
        assert_eq!(
            second.turns,
            vec![
                Turn::user("one"),
                Turn::assistant("reply one"),
                Turn::user("two")
            ]
        );
        assert_eq!(second.temperature.to_string(), "0.8");
        assert!(second.request_id > first.request_id);
    }

    #[test]
    fn reveal_paces_reply_before_committing_it() {
        let mut session = session();
        let start = Instant::now();
        let step = Duration::from_millis(40);

        let SubmitOutcome::Send(params) = session.begin_turn("Hello", start) else {
            panic!("expected request");
        };
        assert!(session.is_awaiting_response());

        session.complete_turn(
            params.request_id,
            CompletionMessage::Completed("one two".to_string()),
            start,
        );
        assert_eq!(session.revealing_text().as_deref(), Some("▌"));
        assert_eq!(session.transcript().len(), 1);

        assert!(session.tick(start + step));
        assert_eq!(session.revealing_text().as_deref(), Some("one ▌"));
        assert_eq!(session.transcript().len(), 1);

        assert!(session.tick(start + step * 2));
        assert!(session.revealing_text().is_none());
        assert!(!session.is_busy());
        let last = session.transcript().last().expect("assistant turn");
        assert_eq!(last.role, TranscriptRole::Assistant);
        assert_eq!(last.content, "one two");
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut session = session();
        let now = Instant::now();
        let SubmitOutcome::Send(params) = session.begin_turn("Hello", now) else {
            panic!("expected request");
        };

        session.complete_turn(
            params.request_id + 1,
            CompletionMessage::Completed("wrong".to_string()),
            now,
        );
        assert!(session.is_awaiting_response());
    }

    #[test]
    fn empty_reply_counts_as_failure() {
        let mut session = session();
        let now = Instant::now();
        let SubmitOutcome::Send(params) = session.begin_turn("Hello", now) else {
            panic!("expected request");
        };

        session.complete_turn(
            params.request_id,
            CompletionMessage::Completed(String::new()),
            now,
        );
        assert!(!session.is_busy());
        assert_eq!(session.transcript().len(), 1);
        assert!(session.notice().is_some_and(Notice::is_error));
    }

    #[tokio::test]
    async fn inline_submit_reports_empty_reply_as_error() {
        let mut session = session();
        let completer = ScriptedCompleter::replying(Ok(""));

        let result = session.submit("Hello", &completer).await;
        assert_eq!(result, Err(CompletionError::EmptyResponse));
        assert_eq!(session.transcript(), &[Turn::user("Hello")]);
        assert!(!session.is_busy());
        assert!(session
            .notice()
            .is_some_and(|n| n.text().contains("empty response")));
    }

    #[test]
    fn empty_catalog_builds_no_session() {
        assert!(Session::with_models(Vec::new(), SessionSettings::default()).is_none());
    }

    #[test]
    fn submit_outcome_debug_names_the_request() {
        let mut session = session();
        let outcome = session.begin_turn("Hello", Instant::now());
        let rendered = format!("{outcome:?}");
        assert!(rendered.contains("Send"));
        assert!(rendered.contains("Hello"));
    }

    #[tokio::test]
    async fn clear_only_touches_selected_model() {
        let mut session = session();
        let completer = ScriptedCompleter::replying(Ok("hi"));
        session.submit("for mistral", &completer).await.unwrap();

        assert!(session.select_model(3));
        assert_eq!(session.selected_model().id, GROK);
        assert!(session.transcript().is_empty());
        session.submit("for grok", &completer).await.unwrap();

        assert!(session.clear_history());
        assert!(session.transcript().is_empty());
        assert!(session.transcripts().is_empty(GROK));
        assert_eq!(session.transcripts().len(MISTRAL), 2);

        session.select_previous_model();
        session.select_previous_model();
        session.select_previous_model();
        assert_eq!(session.selected_model().id, MISTRAL);
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn model_switch_and_clear_refused_while_busy() {
        let mut session = session();
        let _ = session.begin_turn("Hello", Instant::now());

        assert!(!session.select_next_model());
        assert!(!session.clear_history());
        assert_eq!(session.selected_model().id, MISTRAL);
        assert_eq!(session.transcript().len(), 1);
        assert!(session.notice().is_some());
    }

    #[test]
    fn model_selection_wraps() {
        let mut session = session();
        assert!(session.select_previous_model());
        assert_eq!(session.selected_index(), 3);
        assert!(session.select_next_model());
        assert_eq!(session.selected_index(), 0);
        assert!(!session.select_model(9));
    }

    #[test]
    fn temperature_clamps_to_range() {
        let mut session = session();
        for _ in 0..20 {
            session.raise_temperature();
        }
        assert_eq!(session.temperature(), Temperature::MAX);
        for _ in 0..20 {
            session.lower_temperature();
        }
        assert_eq!(session.temperature(), Temperature::MIN);
    }

    #[test]
    fn temperature_parsing() {
        assert_eq!("0.3".parse::<Temperature>().unwrap().tenths(), 3);
        assert_eq!("1".parse::<Temperature>().unwrap(), Temperature::MAX);
        assert_eq!("0.75".parse::<Temperature>().unwrap().to_string(), "0.8");
        assert!("1.5".parse::<Temperature>().is_err());
        assert!("-0.1".parse::<Temperature>().is_err());
        assert!("warm".parse::<Temperature>().is_err());
        assert!(Temperature::from_f64(f64::NAN).is_none());
        assert!(Temperature::from_tenths(11).is_none());
    }

    #[test]
    fn theme_toggle_flips_mode() {
        let mut session = session();
        session.toggle_theme();
        assert_eq!(session.theme(), ThemeMode::Dark);
        session.toggle_theme();
        assert_eq!(session.theme(), ThemeMode::Light);
    }
}
