//! Maps key presses to chat actions. Anything unbound is forwarded to the
//! input box.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    InsertNewline,
    NextModel,
    PreviousModel,
    RaiseTemperature,
    LowerTemperature,
    ToggleTheme,
    ClearHistory,
    ScrollUp,
    ScrollDown,
    DismissNotice,
    Quit,
    Edit,
}

pub fn resolve_key(key: &KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if ctrl => KeyAction::Quit,
        KeyCode::Char('n') if ctrl => KeyAction::NextModel,
        KeyCode::Char('p') if ctrl => KeyAction::PreviousModel,
        KeyCode::Char('t') if ctrl => KeyAction::ToggleTheme,
        KeyCode::Char('l') if ctrl => KeyAction::ClearHistory,
        KeyCode::Up if ctrl => KeyAction::RaiseTemperature,
        KeyCode::Down if ctrl => KeyAction::LowerTemperature,
        KeyCode::Enter if alt || shift => KeyAction::InsertNewline,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::PageUp => KeyAction::ScrollUp,
        KeyCode::PageDown => KeyAction::ScrollDown,
        KeyCode::Esc => KeyAction::DismissNotice,
        _ => KeyAction::Edit,
    }
}
