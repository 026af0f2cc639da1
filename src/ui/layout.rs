//! Width-aware layout of the transcript into terminal lines.
//!
//! Wrapping happens here rather than in the paragraph widget so the renderer
//! knows the exact line count when pinning the view to the newest turn.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;
use crate::core::message::{TranscriptRole, Turn};

const CONTENT_INDENT: &str = "  ";

/// Greedy word wrap measured in terminal cells. Explicit newlines are kept;
/// words wider than `width` are split across lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for raw_line in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0usize;

        for word in raw_line.split_whitespace() {
            let word_width = word.width();
            let gap = usize::from(!current.is_empty());

            if current_width + gap + word_width <= width {
                if gap == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += gap + word_width;
                continue;
            }

            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }

        out.push(current);
    }

    out
}

fn role_label(role: TranscriptRole) -> &'static str {
    match role {
        TranscriptRole::User => "You",
        TranscriptRole::Assistant => "Assistant",
    }
}

fn push_message(
    lines: &mut Vec<Line<'static>>,
    role: TranscriptRole,
    content: &str,
    theme: &Theme,
    width: usize,
) {
    let (prefix_style, text_style): (Style, Style) = match role {
        TranscriptRole::User => (theme.user_prefix_style, theme.user_text_style),
        TranscriptRole::Assistant => (theme.assistant_prefix_style, theme.assistant_text_style),
    };

    lines.push(Line::from(Span::styled(role_label(role), prefix_style)));
    let content_width = width.saturating_sub(CONTENT_INDENT.len());
    for wrapped in wrap_text(content, content_width) {
        lines.push(Line::from(vec![
            Span::raw(CONTENT_INDENT),
            Span::styled(wrapped, text_style),
        ]));
    }
    lines.push(Line::default());
}

/// Lay out every turn plus, when present, the partially revealed reply.
pub fn layout_transcript(
    turns: &[Turn],
    revealing: Option<&str>,
    theme: &Theme,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for turn in turns {
        push_message(&mut lines, turn.role, &turn.content, theme, width);
    }
    if let Some(partial) = revealing {
        push_message(&mut lines, TranscriptRole::Assistant, partial, theme, width);
    }
    lines
}

/// Top scroll offset that keeps the view `from_bottom` lines above the end.
pub fn scroll_offset(total_lines: usize, viewport_height: u16, from_bottom: u16) -> u16 {
    let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
    total
        .saturating_sub(viewport_height)
        .saturating_sub(from_bottom)
}
