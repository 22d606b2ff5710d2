//! An abstraction layer for chat-completion models.
//!
//! This crate establishes a small protocol for a chat session to talk to
//! a streaming completion endpoint: the session hands over the whole
//! conversation, and the provider hands back a lazy sequence of text
//! fragments. The session never needs to know which vendor is behind it.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
