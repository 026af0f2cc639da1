use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::core::completion::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::core::models::find_model;
use crate::core::reveal::DEFAULT_REVEAL_DELAY;
use crate::core::session::Temperature;
use crate::ui::theme::ThemeMode;
use crate::utils::url::{is_http_url, normalize_base_url};

/// Slowest accepted pause between revealed words.
pub const MAX_REVEAL_DELAY_MS: u64 = 1000;

/// Persistent preferences. Every field is optional; unset fields fall back to
/// built-in defaults and are overridden by command-line flags.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Model selected at startup (id or display name)
    pub default_model: Option<String>,
    /// Sampling temperature at startup, 0.0-1.0
    pub temperature: Option<f64>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
    /// Override for the chat-completions base URL
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    /// Delay between revealed words, in milliseconds
    pub reveal_delay_ms: Option<u64>,
}

/// Keys accepted by `parley set` / `parley unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DefaultModel,
    Temperature,
    Theme,
    BaseUrl,
    RequestTimeout,
    RevealDelay,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::DefaultModel,
        ConfigKey::Temperature,
        ConfigKey::Theme,
        ConfigKey::BaseUrl,
        ConfigKey::RequestTimeout,
        ConfigKey::RevealDelay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::DefaultModel => "default-model",
            ConfigKey::Temperature => "temperature",
            ConfigKey::Theme => "theme",
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::RequestTimeout => "request-timeout",
            ConfigKey::RevealDelay => "reveal-delay",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("Unknown config key: {s} (expected one of: {})", known.join(", "))
            })
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    /// Validate and store a value. Returns the normalized value on success.
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<String, String> {
        let value = value.trim();
        match key {
            ConfigKey::DefaultModel => {
                let model = find_model(value).ok_or_else(|| {
                    format!("Unknown model: {value}. Run 'parley models' to list them.")
                })?;
                self.default_model = Some(model.id.clone());
                Ok(model.id)
            }
            ConfigKey::Temperature => {
                let temperature: Temperature = value.parse()?;
                self.temperature = Some(temperature.as_f64());
                Ok(temperature.to_string())
            }
            ConfigKey::Theme => {
                let theme: ThemeMode = value.parse()?;
                self.theme = Some(theme.as_str().to_string());
                Ok(theme.as_str().to_string())
            }
            ConfigKey::BaseUrl => {
                if !is_http_url(value) {
                    return Err(format!("Base URL must start with http:// or https://: {value}"));
                }
                let normalized = normalize_base_url(value);
                self.base_url = Some(normalized.clone());
                Ok(normalized)
            }
            ConfigKey::RequestTimeout => {
                let secs = parse_positive(value, "request-timeout")?;
                self.request_timeout_secs = Some(secs);
                Ok(format!("{secs}s"))
            }
            ConfigKey::RevealDelay => {
                let millis = value
                    .parse::<u64>()
                    .ok()
                    .filter(|ms| *ms <= MAX_REVEAL_DELAY_MS)
                    .ok_or_else(|| {
                        format!(
                            "reveal-delay must be 0-{MAX_REVEAL_DELAY_MS} milliseconds: {value}"
                        )
                    })?;
                self.reveal_delay_ms = Some(millis);
                Ok(format!("{millis}ms"))
            }
        }
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::DefaultModel => self.default_model = None,
            ConfigKey::Temperature => self.temperature = None,
            ConfigKey::Theme => self.theme = None,
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::RequestTimeout => self.request_timeout_secs = None,
            ConfigKey::RevealDelay => self.reveal_delay_ms = None,
        }
    }

    /// Configured temperature, ignoring values outside 0.0-1.0.
    pub fn temperature(&self) -> Option<Temperature> {
        self.temperature.and_then(Temperature::from_f64)
    }

    /// Configured theme, ignoring unknown names.
    pub fn theme(&self) -> Option<ThemeMode> {
        self.theme.as_deref().and_then(|name| name.parse().ok())
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .map(normalize_base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Configured reveal pacing, ignoring values above the maximum.
    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay_ms
            .filter(|ms| *ms <= MAX_REVEAL_DELAY_MS)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REVEAL_DELAY)
    }
}

fn parse_positive(value: &str, name: &str) -> Result<u64, String> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{name} must be a positive whole number: {value}")),
    }
}
