//! TUI-less "say" command

use std::error::Error;
use std::io::Write;

use crate::core::completion::Completer;
use crate::core::session::{Session, SessionSettings};

/// Send one prompt through a fresh session and write the cleaned reply.
pub async fn run_say<C, W>(
    prompt: &[String],
    settings: SessionSettings,
    completer: &C,
    out: &mut W,
) -> Result<(), Box<dyn Error>>
where
    C: Completer + ?Sized,
    W: Write,
{
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err("Usage: parley say <prompt>".into());
    }

    let mut session = Session::new(settings);
    if let Some(reply) = session.submit(&prompt, completer).await? {
        writeln!(out, "{reply}")?;
    }
    Ok(())
}
