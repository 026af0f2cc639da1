use super::CommandResult;
use crate::core::session::Session;

pub type CommandHandler = fn(&mut Session, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Clear the selected model's history.",
        handler: super::handle_clear,
    },
    Command {
        name: "model",
        usage: "/model [id|number]",
        help: "Show or switch the selected model.",
        handler: super::handle_model,
    },
    Command {
        name: "temp",
        usage: "/temp <0.0-1.0>",
        help: "Set the sampling temperature.",
        handler: super::handle_temp,
    },
    Command {
        name: "theme",
        usage: "/theme [dark|light]",
        help: "Toggle or set the colour theme.",
        handler: super::handle_theme,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the chat.",
        handler: super::handle_quit,
    },
];
