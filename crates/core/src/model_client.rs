use std::future::poll_fn;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use little_chat_model::{ModelProvider, ModelRequest, ModelResponse};
use tracing::Instrument;

use crate::error::ProviderError;

type SendRequestResult = Result<FragmentStream, ProviderError>;
type HandlerFn =
    Arc<dyn Fn(ModelRequest) -> BoxFuture<'static, SendRequestResult> + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased interface
/// for the other modules.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(&req);
            async move {
                trace!("got a request: {:?}", req);
                match fut.await {
                    Ok(resp) => Ok(FragmentStream::new(resp)),
                    Err(err) => {
                        error!("got an error: {err:?}");
                        Err(ProviderError::new(err))
                    }
                }
            }
            .instrument(trace_span!("model client req"))
            .boxed()
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the stream of fragments.
    ///
    /// Exactly one request is sent to the provider per call.
    #[inline]
    pub async fn send_request(
        &self,
        req: ModelRequest,
    ) -> Result<FragmentStream, ProviderError> {
        (self.handler_fn)(req).await
    }
}

trait ErasedResponse: Send {
    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<String>, ProviderError>>;
}

impl<R: ModelResponse> ErasedResponse for R {
    #[inline]
    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<String>, ProviderError>> {
        self.poll_next_fragment(cx).map_err(ProviderError::new)
    }
}

/// The fragments of one response, pulled one at a time.
///
/// The stream is finite and cannot be restarted. Once it has reported its
/// end or an error, it only yields `Ok(None)`.
pub struct FragmentStream {
    inner: Pin<Box<dyn ErasedResponse>>,
    finished: bool,
}

impl FragmentStream {
    fn new<R: ModelResponse>(resp: R) -> Self {
        Self {
            inner: Box::pin(resp),
            finished: false,
        }
    }

    /// Waits for the next fragment.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. A fragment is never lost by dropping
    /// the returned future before it completes.
    pub async fn next_fragment(
        &mut self,
    ) -> Result<Option<String>, ProviderError> {
        if self.finished {
            return Ok(None);
        }
        let result = poll_fn(|cx| self.inner.as_mut().poll_next(cx)).await;
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }
}
