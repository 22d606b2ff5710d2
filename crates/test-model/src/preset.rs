use serde::{Deserialize, Serialize};

/// The events in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEvent {
    /// Deliver a text fragment.
    #[serde(rename = "fragment")]
    Fragment(String),
    /// Break the stream with an error carrying this message.
    #[serde(rename = "fail")]
    Fail(String),
}

/// The preset response for one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Events in this response.
    pub events: Vec<PresetEvent>,
    /// If set, the request itself is refused with this message and no
    /// events are streamed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified events.
    #[inline]
    pub fn with_events(events: impl Into<Vec<PresetEvent>>) -> Self {
        Self {
            events: events.into(),
            rejection: None,
        }
    }

    /// Creates a `PresetResponse` streaming the given fragments in order.
    pub fn with_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_events(
            fragments
                .into_iter()
                .map(|f| PresetEvent::Fragment(f.into()))
                .collect::<Vec<_>>(),
        )
    }

    /// Creates a `PresetResponse` whose request fails before streaming.
    #[inline]
    pub fn rejected<S: Into<String>>(message: S) -> Self {
        Self {
            events: vec![],
            rejection: Some(message.into()),
        }
    }

    /// Appends a failure after the events added so far.
    #[inline]
    pub fn then_fail<S: Into<String>>(mut self, message: S) -> Self {
        self.events.push(PresetEvent::Fail(message.into()));
        self
    }
}
