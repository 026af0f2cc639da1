//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod model_list;
pub mod say;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use crate::auth::AuthManager;
use crate::cli::model_list::list_models;
use crate::cli::say::run_say;
use crate::core::completion::CompletionClient;
use crate::core::config::{path_display, Config, ConfigKey};
use crate::core::models::find_model;
use crate::core::session::{Session, SessionSettings, Temperature};
use crate::ui::chat_loop::run_chat;
use crate::ui::theme::ThemeMode;
use crate::utils::logging::{init_file_logging, resolve_debug_log_path};

#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(version)]
#[command(about = "A full-screen terminal chat interface for OpenRouter models")]
#[command(
    long_about = "Parley is a full-screen terminal chat interface for a fixed set of \
OpenRouter-hosted models. Each model keeps its own conversation for the session.\n\n\
Authentication:\n\
  Use 'parley auth' to store your OpenRouter API key in the system keyring,\n\
  or set OPENROUTER_API_KEY.\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a new line\n\
  Ctrl+N / Ctrl+P   Next / previous model\n\
  Ctrl+Up / Down    Raise / lower temperature\n\
  Ctrl+T            Toggle dark/light theme\n\
  Ctrl+L            Clear the selected model's history\n\
  PageUp / PageDown Scroll the transcript\n\
  Ctrl+C            Quit\n\n\
Commands:\n\
  /help  /clear  /model [id|number]  /temp <value>  /theme [dark|light]  /quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to start with (id or display name)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature, 0.0-1.0
    #[arg(short = 't', long, global = true, value_name = "TEMP")]
    pub temperature: Option<Temperature>,

    /// Colour theme (dark or light)
    #[arg(long, global = true, value_name = "THEME")]
    pub theme: Option<ThemeMode>,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single prompt and print the reply
    Say {
        /// Prompt text
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the available models
    Models,
    /// Store the OpenRouter API key in the system keyring
    Auth,
    /// Remove the stored API key
    Deauth,
    /// Set a configuration value, or show the configuration when no value is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set (may be multiple words for default-model)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let mut args = Args::parse();

    if let Some(path) = resolve_debug_log_path(args.debug_log.clone()) {
        init_file_logging(&path)?;
    }

    let command = args.command.take().unwrap_or(Commands::Chat);
    match command {
        Commands::Auth => AuthManager::new().interactive_auth(),
        Commands::Deauth => AuthManager::new().interactive_deauth(),
        Commands::Models => {
            let config = Config::load()?;
            list_models(config.default_model.as_deref())?;
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let Some(key) = key else {
                config.print_all();
                return Ok(());
            };
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            let message = apply_set(&mut config, &key, &value.join(" "))?;
            config.save()?;
            println!("✅ {message}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            let key: ConfigKey = key.parse()?;
            config.unset_value(key);
            config.save()?;
            println!("✅ Unset {}", key.as_str());
            Ok(())
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let settings = resolve_settings(&args, &config)?;
            let client = build_client(&config)?;
            let stdout = std::io::stdout();
            run_say(&prompt, settings, &client, &mut stdout.lock()).await
        }
        Commands::Chat => {
            let config = Config::load()?;
            let settings = resolve_settings(&args, &config)?;
            let client = build_client(&config)?;
            run_chat(Session::new(settings), Arc::new(client)).await
        }
    }
}

/// Validate and store `value` under `key`. Returns the confirmation line.
pub fn apply_set(config: &mut Config, key: &str, value: &str) -> Result<String, Box<dyn Error>> {
    let key: ConfigKey = key.parse()?;
    let stored = config.set_value(key, value)?;
    Ok(format!("Set {} to: {stored}", key.as_str()))
}

/// Combine flags, the config file, and built-in defaults, in that order.
pub fn resolve_settings(args: &Args, config: &Config) -> Result<SessionSettings, Box<dyn Error>> {
    let model_id = match args.model.as_deref() {
        Some(query) => Some(
            find_model(query)
                .ok_or_else(|| format!("Unknown model: {query}. Run 'parley models' to list them."))?
                .id,
        ),
        None => config.default_model.as_deref().and_then(|query| {
            let found = find_model(query).map(|model| model.id);
            if found.is_none() {
                warn!(model = query, "configured default model not in catalog");
            }
            found
        }),
    };

    Ok(SessionSettings {
        model_id,
        temperature: args
            .temperature
            .or_else(|| config.temperature())
            .unwrap_or_default(),
        theme: args.theme.or_else(|| config.theme()).unwrap_or_default(),
        reveal_delay: config.reveal_delay(),
    })
}

fn build_client(config: &Config) -> Result<CompletionClient, Box<dyn Error>> {
    let (api_key, source) = AuthManager::new().resolve_api_key()?;
    debug!(?source, "api key resolved");
    if let Ok(path) = Config::get_config_path() {
        debug!(config = %path_display(path), "configuration loaded");
    }
    Ok(CompletionClient::new(
        config.base_url(),
        api_key,
        config.request_timeout(),
    )?)
}
