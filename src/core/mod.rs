pub mod completion;
pub mod config;
pub mod keyring;
pub mod message;
pub mod models;
pub mod reveal;
pub mod sanitize;
pub mod session;
pub mod transcript;
