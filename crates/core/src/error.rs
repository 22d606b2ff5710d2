use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};

use little_chat_model::{ErrorKind, ModelProviderError};

/// A type-erased error from a model provider.
pub struct ProviderError(Box<dyn ModelProviderError>);

impl ProviderError {
    #[inline]
    pub(crate) fn new<E: ModelProviderError>(err: E) -> Self {
        Self(Box::new(err))
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.0.kind()
    }
}

impl Debug for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for ProviderError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// The reason a turn did not complete.
///
/// A failed turn keeps the user message in the transcript and adds no
/// assistant message. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The provider refused the request or broke the stream.
    #[error("model provider failed: {0}")]
    Provider(#[from] ProviderError),
}

impl TurnError {
    /// Returns the kind of the underlying provider error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TurnError::Provider(err) => err.kind(),
        }
    }
}
