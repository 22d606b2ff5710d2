use std::pin::Pin;
use std::task::{Context, Poll, ready};

use little_chat_model::{ErrorKind, ModelResponse};
use pin_project_lite::pin_project;

use crate::Error;
use crate::io::{Sse, SseError};
use crate::proto::{ChatCompletionChunk, ErrorEnvelope};

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextFragment = Result<(Option<String>, Sse), Error>;

pin_project! {
    /// A streamed chat completion, yielding one fragment per chunk.
    pub struct OpenAIResponse {
        next_fragment_fut: Option<PinnedFuture<NextFragment>>,
    }
}

impl OpenAIResponse {
    #[inline]
    pub(crate) fn from_sse(sse: Sse) -> Self {
        Self {
            next_fragment_fut: Some(Box::pin(next_fragment(sse))),
        }
    }
}

impl ModelResponse for OpenAIResponse {
    type Error = crate::Error;

    fn poll_next_fragment(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<String>, Self::Error>> {
        let this = self.project();
        let Some(next_fragment_fut) = this.next_fragment_fut else {
            return Poll::Ready(Ok(None));
        };
        let (fragment, sse) =
            match ready!(next_fragment_fut.as_mut().poll(cx)) {
                Ok((Some(fragment), sse)) => (fragment, sse),
                Ok((None, _)) => {
                    *this.next_fragment_fut = None;
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    *this.next_fragment_fut = None;
                    return Poll::Ready(Err(err));
                }
            };

        // The stream may still have more data to pull, create a new future
        // for the next fragment.
        *this.next_fragment_fut = Some(Box::pin(next_fragment(sse)));

        Poll::Ready(Ok(Some(fragment)))
    }
}

async fn next_fragment(mut sse: Sse) -> NextFragment {
    loop {
        let sse_event = match sse.next_event().await {
            Ok(Some(event)) => event,
            Ok(None) => return Ok((None, sse)),
            Err(SseError::ChunksError(err)) => {
                return Err(Error::new(err.0, ErrorKind::Network));
            }
            Err(SseError::InvalidPayload) => {
                return Err(Error::new(
                    "stream is not valid UTF-8",
                    ErrorKind::MalformedResponse,
                ));
            }
        };
        trace!("got sse event: {sse_event}");
        if sse_event == "[DONE]" {
            return Ok((None, sse));
        }

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&sse_event)
        {
            return Err(Error::new(envelope.error.message, ErrorKind::Other));
        }

        let chunk = serde_json::from_str::<ChatCompletionChunk>(&sse_event)
            .map_err(|err| {
                Error::new(format!("{err}"), ErrorKind::MalformedResponse)
            })?;

        // Usage-only chunks carry no choices and no text.
        let Some(choice) = chunk.choices.into_iter().next() else {
            continue;
        };
        if let Some(finish_reason) = &choice.finish_reason {
            debug!("completion finished: {finish_reason}");
        }

        // Every chunk with a choice is one fragment, possibly empty.
        let fragment = choice.delta.content.unwrap_or_default();
        return Ok((Some(fragment), sse));
    }
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use bytes::Bytes;
    use little_chat_model::ModelProviderError;

    use super::*;
    use crate::io::Chunks;

    async fn collect(
        chunks: Vec<Bytes>,
    ) -> (Vec<String>, Result<(), crate::Error>) {
        let sse = Sse::new(Chunks::from_vec_deque(chunks.into()));
        let mut resp = pin!(OpenAIResponse::from_sse(sse));
        let mut fragments = vec![];
        loop {
            match poll_fn(|cx| resp.as_mut().poll_next_fragment(cx)).await {
                Ok(Some(fragment)) => fragments.push(fragment),
                Ok(None) => break,
                Err(err) => return (fragments, Err(err)),
            }
        }
        // Completed responses stay completed.
        let again = poll_fn(|cx| resp.as_mut().poll_next_fragment(cx)).await;
        assert!(matches!(again, Ok(None)));
        (fragments, Ok(()))
    }

    #[tokio::test]
    async fn test_fixture_stream() {
        let (fragments, result) = collect(vec![Bytes::from_static(
            include_bytes!("../fixtures/chat_stream.txt"),
        )])
        .await;
        result.unwrap();
        // The role-only opening chunk and the finishing chunk carry no
        // content and surface as empty fragments.
        assert_eq!(fragments, ["", "Hi", " there", "!", ""]);
        assert_eq!(fragments.concat(), "Hi there!");
    }

    #[tokio::test]
    async fn test_stream_without_done() {
        let (fragments, result) = collect(vec![
            Bytes::from_static(
                b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            ),
            Bytes::from_static(
                b"data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            ),
        ])
        .await;
        result.unwrap();
        assert_eq!(fragments, ["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_malformed_chunk() {
        let (fragments, result) = collect(vec![
            Bytes::from_static(
                b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            ),
            Bytes::from_static(b"data: {not json\n\n"),
        ])
        .await;
        assert_eq!(fragments, ["Hel"]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_error_event() {
        let (fragments, result) = collect(vec![Bytes::from_static(
            b"data: {\"error\":{\"message\":\"overloaded\",\"type\":\"server_error\"}}\n\n",
        )])
        .await;
        assert!(fragments.is_empty());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.message(), "overloaded");
    }
}
