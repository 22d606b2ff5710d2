//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use little_chat_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestModelResponse {
    events: VecDeque<PresetEvent>,
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
    finished: bool,
}

impl ModelResponse for TestModelResponse {
    type Error = crate::Error;

    fn poll_next_fragment(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<String>, Self::Error>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(Ok(None));
        }

        let delay = this.delay;
        let sleep = this.sleep.get_or_insert_with(|| Box::pin(sleep(delay)));
        ready!(sleep.as_mut().poll(cx));
        this.sleep = None;

        match this.events.pop_front() {
            Some(PresetEvent::Fragment(fragment)) => {
                Poll::Ready(Ok(Some(fragment)))
            }
            Some(PresetEvent::Fail(message)) => {
                this.finished = true;
                Poll::Ready(Err(Error {
                    message,
                    kind: ErrorKind::Network,
                }))
            }
            None => {
                this.finished = true;
                Poll::Ready(Ok(None))
            }
        }
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<PresetResponse>,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to queue the responses the model
/// should give. Each request takes the next queued response, in order. If
/// the queue runs dry, the request is refused with an error.
///
/// Clones share the same script, so a test can keep one handle around to
/// inspect the requests after handing another to the code under test.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_response(&self, preset: PresetResponse) {
        self.script().responses.push_back(preset);
    }

    /// Sets how long each fragment takes to arrive. Defaults to 1ms.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.script().requests.clone()
    }

    /// Returns how many queued responses have not been used yet.
    pub fn remaining_responses(&self) -> usize {
        self.script().responses.len()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for TestModelProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestModelProvider")
            .field("remaining_responses", &self.remaining_responses())
            .field("delay", &self.delay)
            .finish()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;
    type Response = TestModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let mut script = self.script();
        script.requests.push(req.clone());

        let result = match script.responses.pop_front() {
            None => Err(Error {
                message: "no preset response left".to_owned(),
                kind: ErrorKind::Other,
            }),
            Some(PresetResponse {
                rejection: Some(message),
                ..
            }) => Err(Error {
                message,
                kind: ErrorKind::Unauthorized,
            }),
            Some(preset) => Ok(TestModelResponse {
                events: preset.events.into(),
                delay: self.delay.unwrap_or(Duration::from_millis(1)),
                sleep: None,
                finished: false,
            }),
        };
        ready(result)
    }
}
