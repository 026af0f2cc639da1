//! Main chat event loop.
//!
//! The loop polls the terminal, routes keys through [`keybindings`], settles
//! finished completions from the background service, and advances the reply
//! reveal before drawing each frame.

mod keybindings;
mod lifecycle;

pub use self::keybindings::{resolve_key, KeyAction};
pub use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};

use std::{
    error::Error,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Local;
use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::{debug, info};
use tui_textarea::{Input as TAInput, TextArea};

use crate::commands::{clear_selected_history, process_input, CommandResult};
use crate::core::completion::{Completer, CompletionParams, CompletionService};
use crate::core::session::{Notice, Session, SubmitOutcome, BUSY_NOTICE};
use crate::ui::renderer::{ui, FrameState};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const PAGE_SCROLL_LINES: u16 = 10;
const CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Input box and scroll position; everything else lives in [`Session`].
pub struct ChatView {
    pub input: TextArea<'static>,
    pub scroll_from_bottom: u16,
    pub pulse_start: Instant,
    pub should_quit: bool,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            input: TextArea::default(),
            scroll_from_bottom: 0,
            pulse_start: Instant::now(),
            should_quit: false,
        }
    }

    pub fn input_text(&self) -> String {
        self.input.lines().join("\n")
    }

    fn clear_input(&mut self) {
        self.input = TextArea::default();
    }

    pub fn insert_paste(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.input.insert_str(normalized);
    }

    /// Apply one key press. Returns the request to issue when the press
    /// submitted a message.
    pub fn handle_key(
        &mut self,
        session: &mut Session,
        key: KeyEvent,
        now: Instant,
    ) -> Option<CompletionParams> {
        match resolve_key(&key) {
            KeyAction::Submit => return self.submit(session, now),
            KeyAction::InsertNewline => self.input.insert_newline(),
            KeyAction::NextModel => {
                if session.select_next_model() {
                    self.scroll_from_bottom = 0;
                }
            }
            KeyAction::PreviousModel => {
                if session.select_previous_model() {
                    self.scroll_from_bottom = 0;
                }
            }
            KeyAction::RaiseTemperature => session.raise_temperature(),
            KeyAction::LowerTemperature => session.lower_temperature(),
            KeyAction::ToggleTheme => session.toggle_theme(),
            KeyAction::ClearHistory => {
                if clear_selected_history(session) {
                    self.scroll_from_bottom = 0;
                }
            }
            KeyAction::ScrollUp => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(PAGE_SCROLL_LINES);
            }
            KeyAction::ScrollDown => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(PAGE_SCROLL_LINES);
            }
            KeyAction::DismissNotice => session.dismiss_notice(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Edit => {
                self.input.input(TAInput::from(key));
            }
        }
        None
    }

    fn submit(&mut self, session: &mut Session, now: Instant) -> Option<CompletionParams> {
        let text = self.input_text();
        match process_input(session, &text) {
            CommandResult::Continue => {
                self.clear_input();
                None
            }
            CommandResult::Quit => {
                self.should_quit = true;
                None
            }
            CommandResult::ProcessAsMessage(message) => match session.begin_turn(&message, now) {
                SubmitOutcome::Ignored => None,
                SubmitOutcome::Busy => {
                    session.set_notice(Notice::Info(BUSY_NOTICE.to_string()));
                    None
                }
                SubmitOutcome::Send(params) => {
                    self.clear_input();
                    self.scroll_from_bottom = 0;
                    self.pulse_start = now;
                    Some(params)
                }
            },
        }
    }
}

fn draw(
    terminal: &mut ChatTerminal,
    session: &Session,
    view: &mut ChatView,
) -> Result<(), Box<dyn Error>> {
    let clock = Local::now().format(CLOCK_FORMAT).to_string();
    let pulse_elapsed = view.pulse_start.elapsed();
    let mut scroll_from_bottom = view.scroll_from_bottom;

    terminal.draw(|f| {
        let mut state = FrameState {
            input: &mut view.input,
            scroll_from_bottom,
            pulse_elapsed,
            clock,
        };
        ui(f, session, &mut state);
        scroll_from_bottom = state.scroll_from_bottom;
    })?;

    view.scroll_from_bottom = scroll_from_bottom;
    Ok(())
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    session: &mut Session,
    completer: Arc<dyn Completer>,
) -> Result<(), Box<dyn Error>> {
    let (service, mut rx) = CompletionService::new();
    let mut view = ChatView::new();

    loop {
        let now = Instant::now();
        while let Ok((message, request_id)) = rx.try_recv() {
            session.complete_turn(request_id, message, now);
            view.scroll_from_bottom = 0;
        }
        session.tick(now);

        draw(terminal, session, &mut view)?;
        if view.should_quit {
            break;
        }

        if !event::poll(FRAME_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(params) = view.handle_key(session, key, Instant::now()) {
                    debug!(request_id = params.request_id, "dispatching completion");
                    service.spawn_completion(Arc::clone(&completer), params);
                }
            }
            Event::Paste(text) => view.insert_paste(&text),
            _ => {}
        }
    }

    Ok(())
}

/// Run the full-screen chat until the user quits. The terminal is restored
/// even when the loop fails.
pub async fn run_chat(
    mut session: Session,
    completer: Arc<dyn Completer>,
) -> Result<(), Box<dyn Error>> {
    info!(model = %session.selected_model().id, "starting chat");
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut session, completer).await;
    restore_terminal(&mut terminal)?;
    result
}
