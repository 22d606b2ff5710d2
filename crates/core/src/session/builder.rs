use little_chat_model::ModelProvider;

use super::ChatSession;
use crate::model_client::ModelClient;

/// [`ChatSession`] builder.
pub struct ChatSessionBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) cursor_marker: Option<String>,
}

impl ChatSessionBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            cursor_marker: None,
        }
    }

    /// Replaces the marker shown while a reply is streaming.
    #[inline]
    pub fn with_cursor_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.cursor_marker = Some(marker.into());
        self
    }

    /// Builds an initialized session with an empty transcript.
    #[inline]
    pub fn build(self) -> ChatSession {
        ChatSession::from_builder(self)
    }
}
