use std::time::Duration;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use super::layout::{layout_transcript, scroll_offset, wrap_text};
use super::theme::Theme;
use crate::core::session::{Session, Temperature};

pub const APP_TITLE: &str = "Parley";
pub const APP_SUBTITLE: &str = "Ask me anything, and I'll try my best to help you!";
pub const INPUT_PLACEHOLDER: &str = "💬 Type your message here...";
pub const THINKING_LABEL: &str = "Thinking...";

const SIDEBAR_WIDTH: u16 = 34;
const MAX_INPUT_LINES: u16 = 5;
const MAX_NOTICE_LINES: u16 = 10;

const KEY_HINTS: &[(&str, &str)] = &[
    ("Enter", "send"),
    ("Alt+Enter", "new line"),
    ("Ctrl+N/P", "next/prev model"),
    ("Ctrl+↑/↓", "temperature"),
    ("Ctrl+T", "toggle theme"),
    ("Ctrl+L", "clear history"),
    ("PgUp/PgDn", "scroll"),
    ("Ctrl+C", "quit"),
];

/// Per-frame view state owned by the chat loop.
pub struct FrameState<'a, 'b> {
    pub input: &'a mut TextArea<'b>,
    /// Lines scrolled up from the newest turn; zero follows the tail.
    pub scroll_from_bottom: u16,
    /// Time since the current request was issued, drives the spinner.
    pub pulse_elapsed: Duration,
    /// Preformatted local time for the status bar.
    pub clock: String,
}

/// Three-step pulse that cycles twice per second.
pub fn pulse_symbol(elapsed: Duration) -> &'static str {
    let elapsed = elapsed.as_millis() as f32 / 1000.0;
    let phase = (elapsed * 2.0) % 2.0;
    let intensity = if phase < 1.0 { phase } else { 2.0 - phase };

    if intensity < 0.33 {
        "○"
    } else if intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

pub fn temperature_bar(temperature: Temperature) -> String {
    let filled = usize::from(temperature.tenths());
    let empty = usize::from(Temperature::MAX.tenths()) - filled;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

pub fn ui(f: &mut Frame, session: &Session, state: &mut FrameState<'_, '_>) {
    let theme = Theme::for_mode(session.theme());
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        area,
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);

    render_sidebar(f, session, &theme, columns[0]);
    render_main(f, session, &theme, state, columns[1]);
}

fn heading(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), theme.panel_heading_style))
}

fn render_sidebar(f: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Settings ", theme.panel_heading_style))
        .borders(Borders::ALL)
        .border_style(theme.panel_border_style);
    let inner_width = usize::from(area.width.saturating_sub(2));

    let mut lines = vec![
        heading("Theme", theme),
        Line::from(Span::styled(
            format!("  {}", session.theme()),
            theme.info_text_style,
        )),
        Line::default(),
        heading("Model", theme),
    ];

    let selected = session.selected_index();
    for (idx, model) in session.models().iter().enumerate() {
        let line = if idx == selected {
            Span::styled(
                format!("▸ {}. {}", idx + 1, model.display_name),
                theme.selected_item_style,
            )
        } else {
            Span::styled(
                format!("  {}. {}", idx + 1, model.display_name),
                theme.info_text_style,
            )
        };
        lines.push(Line::from(line));
    }

    lines.push(Line::default());
    for wrapped in wrap_text(&session.selected_model().description, inner_width) {
        lines.push(Line::from(Span::styled(wrapped, theme.description_style)));
    }

    let temperature = session.temperature();
    lines.push(Line::default());
    lines.push(heading("Temperature", theme));
    lines.push(Line::from(Span::styled(
        format!("  {} {}", temperature, temperature_bar(temperature)),
        theme.info_text_style,
    )));

    lines.push(Line::default());
    lines.push(heading("Keys", theme));
    for (key, action) in KEY_HINTS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme.selected_item_style),
            Span::styled(*action, theme.description_style),
        ]));
    }
    lines.push(Line::from(Span::styled(
        "  /help for commands",
        theme.description_style,
    )));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_main(
    f: &mut Frame,
    session: &Session,
    theme: &Theme,
    state: &mut FrameState<'_, '_>,
    area: Rect,
) {
    let input_lines = u16::try_from(state.input.lines().len())
        .unwrap_or(MAX_INPUT_LINES)
        .clamp(1, MAX_INPUT_LINES);
    let notice_height = session.notice().map_or(0, |notice| {
        u16::try_from(notice.text().lines().count())
            .unwrap_or(MAX_NOTICE_LINES)
            .clamp(1, MAX_NOTICE_LINES)
    });

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(notice_height),
            Constraint::Length(input_lines + 2),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, theme, rows[0]);
    render_transcript(f, session, theme, state, rows[1]);
    if let Some(notice) = session.notice() {
        let style = if notice.is_error() {
            theme.error_text_style
        } else {
            theme.info_text_style
        };
        let lines: Vec<Line> = notice
            .text()
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), style)))
            .collect();
        f.render_widget(Paragraph::new(lines), rows[2]);
    }
    render_input(f, session, theme, state, rows[3]);
    render_status_bar(f, session, theme, &state.clock, rows[4]);
}

fn render_header(f: &mut Frame, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(format!("🤖 {APP_TITLE}"), theme.title_style)),
        Line::from(Span::styled(APP_SUBTITLE, theme.subtitle_style)),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_transcript(
    f: &mut Frame,
    session: &Session,
    theme: &Theme,
    state: &mut FrameState<'_, '_>,
    area: Rect,
) {
    let width = usize::from(area.width);
    let revealing = session.revealing_text();
    let mut lines = layout_transcript(session.transcript(), revealing.as_deref(), theme, width);

    if session.is_awaiting_response() {
        lines.push(Line::from(Span::styled(
            format!("{} {}", pulse_symbol(state.pulse_elapsed), THINKING_LABEL),
            theme.pending_indicator_style,
        )));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(
                "Start a conversation with {}.",
                session.selected_model().display_name
            ),
            theme.description_style,
        )));
    }

    let max_from_bottom = scroll_offset(lines.len(), area.height, 0);
    state.scroll_from_bottom = state.scroll_from_bottom.min(max_from_bottom);
    let offset = scroll_offset(lines.len(), area.height, state.scroll_from_bottom);

    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

fn render_input(
    f: &mut Frame,
    session: &Session,
    theme: &Theme,
    state: &mut FrameState<'_, '_>,
    area: Rect,
) {
    let title = if session.is_busy() {
        " Waiting for response... "
    } else {
        " Message (Enter to send, Alt+Enter for new line) "
    };

    state.input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.input_border_style)
            .title(Span::styled(title, theme.input_title_style)),
    );
    state.input.set_style(theme.input_text_style);
    state.input.set_cursor_style(theme.input_cursor_style);
    state.input.set_cursor_line_style(Style::default());
    state.input.set_placeholder_text(INPUT_PLACEHOLDER);
    state.input.set_placeholder_style(theme.description_style);

    f.render_widget(&*state.input, area);
}

fn render_status_bar(f: &mut Frame, session: &Session, theme: &Theme, clock: &str, area: Rect) {
    let summary = format!(
        " {} • temp {} • {} theme",
        session.selected_model().display_name,
        session.temperature(),
        session.theme()
    );
    let clock_width = u16::try_from(clock.len() + 1).unwrap_or(area.width);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(clock_width)])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled(summary, theme.status_bar_style)),
        columns[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(clock.to_string(), theme.status_bar_style))
            .alignment(Alignment::Right),
        columns[1],
    );
}
