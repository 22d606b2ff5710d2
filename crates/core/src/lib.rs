//! Core logic of the chat client: the transcript, the turn loop and the
//! display contract.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod display;
mod error;
mod model_client;
mod session;
pub mod transcript;

pub use display::DisplaySink;
pub use error::{ProviderError, TurnError};
pub use little_chat_model::{ErrorKind, Role};
pub use session::{ChatSession, ChatSessionBuilder, DEFAULT_CURSOR_MARKER};
pub use transcript::{Message, Transcript};
