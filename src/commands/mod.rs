//! Slash commands typed into the chat input.
//!
//! Input that does not start with `/`, or names no known command, is handed
//! back to the caller to be sent as a message.

mod registry;

pub use registry::{all_commands, find_command, CommandInvocation};

use crate::core::models::model_index;
use crate::core::session::{Notice, Session, Temperature};
use crate::ui::theme::ThemeMode;

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    Quit,
}

pub fn process_input(session: &mut Session, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match find_command(command_name) {
        Some(command) => {
            let invocation = CommandInvocation {
                input: trimmed,
                args,
            };
            (command.handler)(session, invocation)
        }
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

/// Multi-line summary of every command, shown by `/help`.
pub fn help_text() -> String {
    let mut text = String::from("Commands (Esc to dismiss):");
    for command in all_commands() {
        text.push_str(&format!("\n  {:<20} {}", command.usage, command.help));
    }
    text
}

fn info(session: &mut Session, message: impl Into<String>) -> CommandResult {
    session.set_notice(Notice::Info(message.into()));
    CommandResult::Continue
}

fn error(session: &mut Session, message: impl Into<String>) -> CommandResult {
    session.set_notice(Notice::Error(message.into()));
    CommandResult::Continue
}

pub(super) fn handle_help(session: &mut Session, _invocation: CommandInvocation<'_>) -> CommandResult {
    info(session, help_text())
}

/// Clear the selected model's transcript and say so. Shared with the
/// Ctrl+L binding.
pub fn clear_selected_history(session: &mut Session) -> bool {
    if !session.clear_history() {
        return false;
    }
    let name = session.selected_model().display_name.clone();
    session.set_notice(Notice::Info(format!("Cleared history for {name}.")));
    true
}

pub(super) fn handle_clear(session: &mut Session, _invocation: CommandInvocation<'_>) -> CommandResult {
    clear_selected_history(session);
    CommandResult::Continue
}

fn resolve_model_arg(session: &Session, arg: &str) -> Option<usize> {
    if let Ok(number) = arg.parse::<usize>() {
        return (1..=session.models().len())
            .contains(&number)
            .then(|| number - 1);
    }
    model_index(session.models(), arg).or_else(|| {
        session
            .models()
            .iter()
            .position(|m| m.display_name.eq_ignore_ascii_case(arg))
    })
}

pub(super) fn handle_model(session: &mut Session, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        let model = session.selected_model();
        let message = format!("Current model: {} ({})", model.display_name, model.id);
        return info(session, message);
    }

    let Some(index) = resolve_model_arg(session, invocation.args) else {
        return error(
            session,
            format!("Unknown model: {}. Run `parley models` to list them.", invocation.args),
        );
    };

    if session.select_model(index) {
        let name = session.selected_model().display_name.clone();
        return info(session, format!("Switched to {name}."));
    }
    CommandResult::Continue
}

pub(super) fn handle_temp(session: &mut Session, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        let message = format!("Temperature: {}", session.temperature());
        return info(session, message);
    }

    match invocation.args.parse::<Temperature>() {
        Ok(temperature) => {
            session.set_temperature(temperature);
            info(session, format!("Temperature set to {temperature}."))
        }
        Err(message) => error(session, message),
    }
}

pub(super) fn handle_theme(session: &mut Session, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        session.toggle_theme();
    } else {
        match invocation.args.parse::<ThemeMode>() {
            Ok(mode) => session.set_theme(mode),
            Err(message) => return error(session, message),
        }
    }
    let theme = session.theme();
    info(session, format!("Theme: {theme}"))
}

pub(super) fn handle_quit(_session: &mut Session, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}

#[cfg(test)]
mod tests;
