//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the event loop that dispatches input to
//!   [`crate::commands`] and settles completions from
//!   [`crate::core::completion::CompletionService`].
//! - [`renderer`] and [`layout`]: frame composition and transcript wrapping.
//! - [`theme`] and [`builtin_themes`]: colour policy.
//!
//! This layer presents and captures interaction state; [`crate::core`] owns
//! the session and turn logic.

pub mod builtin_themes;
pub mod chat_loop;
pub mod layout;
pub mod renderer;
pub mod theme;
