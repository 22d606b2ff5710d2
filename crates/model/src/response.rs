use std::pin::Pin;
use std::task::{self, Poll};

use crate::provider::ModelProviderError;

/// A streaming response from the model provider.
pub trait ModelResponse: Sized + Send + 'static {
    /// The error type that may be returned by the provider.
    type Error: ModelProviderError;

    /// Attempts to pull out the next text fragment from the response.
    ///
    /// # Return value
    ///
    /// There are several possible return values, each indicating a
    /// distinct response state:
    ///
    /// - `Poll::Pending` means that this response is still waiting for
    ///   the next fragment. Implementations will ensure that the current
    ///   task will be notified when the next fragment may be ready.
    /// - `Poll::Ready(Ok(Some(fragment)))` means the response has a
    ///   fragment to deliver, and may produce further fragments on
    ///   subsequent `poll_next_fragment` calls. A fragment can be an
    ///   empty string.
    /// - `Poll::Ready(Ok(None))` means the response has completed.
    /// - `Poll::Ready(Err(error))` means an error occurred while
    ///   processing the response.
    ///
    /// Calling this method after completion should always return `None`.
    /// A response cannot be restarted.
    fn poll_next_fragment(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<String>, Self::Error>>;
}
