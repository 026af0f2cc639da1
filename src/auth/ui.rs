use std::fmt;
use std::io::{self, Write};

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::crossterm::terminal::{disable_raw_mode, enable_raw_mode};

const MASKED_INPUT_PROMPT: &str = "Enter your OpenRouter API key: ";

#[derive(Debug, Clone)]
pub struct UiError {
    message: String,
}

impl UiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UiError {}

pub fn prompt_line(prompt: &str) -> Result<String, UiError> {
    print!("{prompt}");
    io::stdout().flush().map_err(|err| UiError::new(err.to_string()))?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|err| UiError::new(err.to_string()))?;
    Ok(input.trim().to_string())
}

/// Read a secret without echoing it; each character shows as `*`.
pub fn prompt_masked_input() -> Result<String, UiError> {
    print!("{MASKED_INPUT_PROMPT}");
    io::stdout().flush().map_err(|err| UiError::new(err.to_string()))?;

    enable_raw_mode().map_err(|err| UiError::new(err.to_string()))?;
    let result = read_masked();
    let _ = disable_raw_mode();
    println!();
    result
}

fn read_masked() -> Result<String, UiError> {
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read().map_err(|err| UiError::new(err.to_string()))? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Esc => return Err(UiError::new("Cancelled")),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(UiError::new("Cancelled"));
            }
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    print!("\x08 \x08");
                }
            }
            KeyCode::Char(ch) => {
                secret.push(ch);
                print!("*");
            }
            _ => continue,
        }
        io::stdout().flush().map_err(|err| UiError::new(err.to_string()))?;
    }
}

/// Interpret a yes/no answer. Empty input means no.
pub fn parse_confirmation(input: &str) -> Result<bool, UiError> {
    match input.trim().to_lowercase().as_str() {
        "" | "n" | "no" => Ok(false),
        "y" | "yes" => Ok(true),
        _ => Err(UiError::new("Invalid confirmation response")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_defaults_to_no() {
        assert!(!parse_confirmation("").unwrap());
        assert!(!parse_confirmation(" N ").unwrap());
        assert!(parse_confirmation("Yes").unwrap());
        assert!(parse_confirmation("maybe").is_err());
    }
}
