mod builder;
#[cfg(test)]
mod tests;

use little_chat_model::Role;

pub use builder::ChatSessionBuilder;

use crate::display::DisplaySink;
use crate::error::TurnError;
use crate::model_client::ModelClient;
use crate::transcript::{Message, Transcript};

/// The marker shown after the streamed text while a reply is incomplete.
pub const DEFAULT_CURSOR_MARKER: &str = "▌";

/// A chat session, which owns the transcript and turns each user input
/// into one streamed assistant reply.
///
/// Turns run strictly one after another: [`submit_user_turn`] borrows the
/// session mutably, so a second turn cannot start while the first one is
/// still streaming.
///
/// [`submit_user_turn`]: ChatSession::submit_user_turn
pub struct ChatSession {
    model_client: ModelClient,
    transcript: Transcript,
    cursor_marker: String,
}

impl ChatSession {
    fn from_builder(builder: ChatSessionBuilder) -> Self {
        let ChatSessionBuilder {
            model_client,
            cursor_marker,
        } = builder;

        let mut session = Self {
            model_client,
            transcript: Default::default(),
            cursor_marker: cursor_marker
                .unwrap_or_else(|| DEFAULT_CURSOR_MARKER.to_owned()),
        };
        session.initialize();
        session
    }

    /// Resets the transcript to empty.
    pub fn initialize(&mut self) {
        self.transcript.clear();
        debug!("session initialized");
    }

    /// Returns the transcript.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the marker appended to the live region while streaming.
    #[inline]
    pub fn cursor_marker(&self) -> &str {
        &self.cursor_marker
    }

    /// Renders every stored message, oldest first, as a fixed block.
    pub fn replay<D: DisplaySink + ?Sized>(&self, sink: &mut D) {
        for msg in &self.transcript {
            sink.render_fixed(msg.role(), msg.content());
        }
    }

    /// Runs one turn: records and shows `text`, sends the whole transcript
    /// to the model, streams the reply into the live region of `sink`, and
    /// finally records the reply.
    ///
    /// The caller is expected to withhold empty input.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError`] if the provider fails before or during
    /// streaming. The user message stays in the transcript, no assistant
    /// message is recorded, and the live region is left as it was last
    /// rendered.
    pub async fn submit_user_turn<D: DisplaySink + ?Sized>(
        &mut self,
        text: &str,
        sink: &mut D,
    ) -> Result<&Message, TurnError> {
        self.transcript.push(Message::new(Role::User, text));
        sink.render_fixed(Role::User, text);

        let request = self.transcript.to_request();
        debug!("starting a turn with {} messages", request.messages.len());
        let mut stream = self.model_client.send_request(request).await?;

        let mut accumulator = String::new();
        let mut live = String::new();
        loop {
            let fragment = match stream.next_fragment().await {
                Ok(Some(fragment)) => fragment,
                Ok(None) => break,
                Err(err) => {
                    error!(
                        "stream broke after {} bytes: {err}",
                        accumulator.len()
                    );
                    return Err(err.into());
                }
            };
            trace!("got a fragment: {fragment:?}");
            accumulator.push_str(&fragment);

            live.clear();
            live.push_str(&accumulator);
            live.push_str(&self.cursor_marker);
            sink.render_live(&live);
        }
        sink.render_live(&accumulator);

        debug!("finished a turn with {} bytes", accumulator.len());
        Ok(self
            .transcript
            .push(Message::new(Role::Assistant, accumulator)))
    }
}
