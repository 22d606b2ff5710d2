//! A terminal chat client that streams replies from an OpenAI-compatible
//! model.
//!
//! The crate includes a CLI tool for chatting in the terminal. It can also
//! be used as a library to reuse the configuration loader and the terminal
//! renderer with your own [`ChatSession`](little_chat_core::ChatSession).

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
mod terminal;

pub use config::{API_KEY_VAR, BASE_URL_VAR, Config, ConfigError, MODEL_VAR};
pub use terminal::TerminalSink;

/// Re-exports of [`little_chat_core`] crate.
pub mod core {
    pub use little_chat_core::*;
}
