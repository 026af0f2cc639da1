//! API key storage and lookup.
//!
//! The OpenRouter key is taken from `OPENROUTER_API_KEY` when set, otherwise
//! from the system keyring. The key is never logged or displayed.

use std::error::Error;
use std::fmt;

use keyring::Entry;
use tracing::{debug, warn};

use crate::core::keyring::KeyringAccessError;

mod ui;

use self::ui::{parse_confirmation, prompt_line, prompt_masked_input};

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
const KEYRING_SERVICE: &str = "parley";
const KEYRING_USER: &str = "openrouter";

#[derive(Debug)]
pub enum AuthError {
    /// Neither the environment nor the keyring holds a key.
    MissingKey,
    /// The keyring backend is temporarily out of reach (locked or no
    /// session bus), so a stored key cannot be read.
    KeyringUnavailable(KeyringAccessError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingKey => write!(
                f,
                "No OpenRouter API key found.\n\n\
                 Please either:\n\
                 1. Run 'parley auth' to store a key in your system keyring, or\n\
                 2. Set the environment variable:\n   export {API_KEY_ENV}=\"your-api-key-here\""
            ),
            AuthError::KeyringUnavailable(err) => write!(
                f,
                "The system keyring is unavailable ({err}).\n\n                 Unlock it and try again, or set the environment variable:\n                    export {API_KEY_ENV}=\"your-api-key-here\""
            ),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AuthError::MissingKey => None,
            AuthError::KeyringUnavailable(err) => Some(err),
        }
    }
}

/// Where the active key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    Keyring,
}

pub struct AuthManager;

impl AuthManager {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<Entry, KeyringAccessError> {
        Entry::new(KEYRING_SERVICE, KEYRING_USER).map_err(KeyringAccessError::from)
    }

    /// Resolve the API key, preferring the environment over the keyring.
    pub fn resolve_api_key(&self) -> Result<(String, KeySource), Box<dyn Error>> {
        if let Some(key) = env_key() {
            debug!("using API key from environment");
            return Ok((key, KeySource::Environment));
        }
        match self.get_stored_key() {
            Ok(Some(key)) => {
                debug!("using API key from keyring");
                Ok((key, KeySource::Keyring))
            }
            Ok(None) => Err(Box::new(AuthError::MissingKey)),
            Err(err) => Err(keyring_failure(err)),
        }
    }

    pub fn get_stored_key(&self) -> Result<Option<String>, KeyringAccessError> {
        match Self::entry()?.get_password() {
            Ok(key) if !key.trim().is_empty() => Ok(Some(key)),
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(KeyringAccessError::from(err)),
        }
    }

    pub fn store_key(&self, key: &str) -> Result<(), KeyringAccessError> {
        Self::entry()?.set_password(key.trim())?;
        Ok(())
    }

    pub fn remove_key(&self) -> Result<bool, KeyringAccessError> {
        match Self::entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(KeyringAccessError::from(err)),
        }
    }

    pub fn interactive_auth(&self) -> Result<(), Box<dyn Error>> {
        println!("🔐 OpenRouter authentication");
        println!("Create a key at https://openrouter.ai/keys\n");

        if self.get_stored_key().unwrap_or(None).is_some() {
            let answer = prompt_line("A key is already stored. Replace it? [y/N]: ")?;
            if !parse_confirmation(&answer)? {
                println!("Cancelled.");
                return Ok(());
            }
        }

        let key = prompt_masked_input()?;
        if key.trim().is_empty() {
            println!("No key entered. Cancelled.");
            return Ok(());
        }
        self.store_key(&key)?;
        println!("✅ API key stored in the system keyring");
        Ok(())
    }

    pub fn interactive_deauth(&self) -> Result<(), Box<dyn Error>> {
        let answer = prompt_line("Remove the stored OpenRouter API key? [y/N]: ")?;
        if !parse_confirmation(&answer)? {
            println!("Cancelled.");
            return Ok(());
        }
        if self.remove_key()? {
            println!("✅ API key removed");
        } else {
            println!("No stored API key found");
        }
        if env_key().is_some() {
            println!("⚠️  {API_KEY_ENV} is still set in your environment");
        }
        Ok(())
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A recoverable outage points the user at the environment variable; any
/// other keyring failure is reported as is.
fn keyring_failure(err: KeyringAccessError) -> Box<dyn Error> {
    if err.is_recoverable() {
        warn!(error = %err, "keyring unavailable");
        Box::new(AuthError::KeyringUnavailable(err))
    } else {
        Box::new(err)
    }
}

fn env_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
