//! Parley is a terminal chat client for models hosted behind OpenRouter.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session: per-model transcripts, the selected model,
//!   temperature and theme, the turn state machine, response sanitizing and
//!   the completion client.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`commands`] implements slash-command parsing used by the chat loop.
//! - [`api`] defines the chat-completion payloads sent to and received from
//!   the remote endpoint.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
