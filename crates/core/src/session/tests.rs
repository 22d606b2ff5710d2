use little_chat_model::{ErrorKind, ModelMessage, Role};
use little_chat_test_model::{PresetResponse, TestModelProvider};

use crate::{ChatSession, ChatSessionBuilder, DisplaySink, Message};

#[derive(Clone, Debug, PartialEq, Eq)]
enum SinkEvent {
    Fixed(Role, String),
    Live(String),
}

/// Keeps what a screen would show, plus every call made to it.
#[derive(Default)]
struct RecordingSink {
    events: Vec<SinkEvent>,
    blocks: Vec<(Role, String)>,
    live: Option<String>,
    // Number of requests the provider had seen when each fixed block was
    // rendered.
    requests_at_fixed: Vec<usize>,
    provider: Option<TestModelProvider>,
}

impl RecordingSink {
    fn watching(provider: &TestModelProvider) -> Self {
        Self {
            provider: Some(provider.clone()),
            ..Default::default()
        }
    }

    fn live_renders(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Live(content) => Some(content.as_str()),
                SinkEvent::Fixed(..) => None,
            })
            .collect()
    }
}

impl DisplaySink for RecordingSink {
    fn render_fixed(&mut self, role: Role, content: &str) {
        if let Some(provider) = &self.provider {
            self.requests_at_fixed.push(provider.requests().len());
        }
        // A new block closes the previous live region.
        if let Some(live) = self.live.take() {
            self.blocks.push((Role::Assistant, live));
        }
        self.blocks.push((role, content.to_owned()));
        self.events.push(SinkEvent::Fixed(role, content.to_owned()));
    }

    fn render_live(&mut self, content: &str) {
        self.live = Some(content.to_owned());
        self.events.push(SinkEvent::Live(content.to_owned()));
    }
}

fn session_with(provider: &TestModelProvider) -> ChatSession {
    ChatSessionBuilder::with_model_provider(provider.clone()).build()
}

#[tokio::test(start_paused = true)]
async fn test_simple_turn() {
    let provider = TestModelProvider::default();
    provider.add_response(PresetResponse::with_fragments(["Hi", " there", "!"]));

    let mut session = session_with(&provider);
    let mut sink = RecordingSink::watching(&provider);
    let reply = session.submit_user_turn("Hi", &mut sink).await.unwrap();
    assert_eq!(reply, &Message::new(Role::Assistant, "Hi there!"));

    assert_eq!(
        session.transcript().messages(),
        [
            Message::new(Role::User, "Hi"),
            Message::new(Role::Assistant, "Hi there!"),
        ]
    );
    assert_eq!(
        sink.events,
        [
            SinkEvent::Fixed(Role::User, "Hi".to_owned()),
            SinkEvent::Live("Hi▌".to_owned()),
            SinkEvent::Live("Hi there▌".to_owned()),
            SinkEvent::Live("Hi there!▌".to_owned()),
            SinkEvent::Live("Hi there!".to_owned()),
        ]
    );
    // The user message was on screen before the request went out.
    assert_eq!(sink.requests_at_fixed, [0]);
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_turns_alternate() {
    let provider = TestModelProvider::default();
    let turns = 4;
    for i in 0..turns {
        provider.add_response(PresetResponse::with_fragments([
            "reply ".to_owned(),
            i.to_string(),
        ]));
    }

    let mut session = session_with(&provider);
    let mut sink = RecordingSink::default();
    for i in 0..turns {
        session
            .submit_user_turn(&format!("question {i}"), &mut sink)
            .await
            .unwrap();
    }

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2 * turns);
    for (idx, msg) in transcript.iter().enumerate() {
        let expected = if idx % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        };
        assert_eq!(msg.role(), expected);
    }
    assert_eq!(transcript.last().unwrap().content(), "reply 3");
}

#[tokio::test(start_paused = true)]
async fn test_request_replays_history() {
    let provider = TestModelProvider::default();
    provider.add_response(PresetResponse::with_fragments(["Hello!"]));
    provider.add_response(PresetResponse::with_fragments(["Fine, thanks."]));
    provider.add_response(PresetResponse::with_fragments(["Bye."]));

    let mut session = session_with(&provider);
    let mut sink = RecordingSink::default();
    for text in ["Hi", "How are you?", "Bye"] {
        let before = session.transcript().clone();
        session.submit_user_turn(text, &mut sink).await.unwrap();

        let sent = provider.requests().pop().unwrap().messages;
        let mut expected: Vec<ModelMessage> =
            before.iter().map(ModelMessage::from).collect();
        expected.push(ModelMessage::user(text));
        assert_eq!(sent, expected);
    }
    assert_eq!(provider.requests()[2].messages.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_empty_fragments() {
    let provider = TestModelProvider::default();
    provider.add_response(PresetResponse::with_fragments([
        "", "Hi", "", "", " there", "!", "",
    ]));
    provider.add_response(PresetResponse::with_fragments(["Hi", " there", "!"]));

    let mut session = session_with(&provider);
    let mut sink = RecordingSink::default();
    let with_empty = session
        .submit_user_turn("Hi", &mut sink)
        .await
        .unwrap()
        .clone();
    let without_empty = session
        .submit_user_turn("Hi", &mut sink)
        .await
        .unwrap()
        .clone();
    assert_eq!(with_empty, without_empty);
    assert_eq!(with_empty.content(), "Hi there!");
}

#[tokio::test(start_paused = true)]
async fn test_only_empty_fragments() {
    let provider = TestModelProvider::default();
    provider.add_response(PresetResponse::with_fragments(["", ""]));

    let mut session = session_with(&provider);
    let mut sink = RecordingSink::default();
    let reply = session.submit_user_turn("Hi", &mut sink).await.unwrap();
    assert_eq!(reply.content(), "");
    assert_eq!(session.transcript().len(), 2);
    assert_eq!(sink.live_renders(), ["▌", "▌", ""]);
}

#[tokio::test(start_paused = true)]
async fn test_stream_failure() {
    let provider = TestModelProvider::default();
    provider.add_response(
        PresetResponse::with_fragments(["Hel", "lo"]).then_fail("connection reset"),
    );

    let mut session = session_with(&provider);
    let mut sink = RecordingSink::default();
    let err = session.submit_user_turn("Hi", &mut sink).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().contains("connection reset"));

    assert_eq!(
        session.transcript().messages(),
        [Message::new(Role::User, "Hi")]
    );
    // The live region keeps what was streamed and is not touched again.
    assert_eq!(sink.live_renders(), ["Hel▌", "Hello▌"]);
    assert_eq!(sink.live.as_deref(), Some("Hello▌"));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_request_then_retry() {
    let provider = TestModelProvider::default();
    provider.add_response(PresetResponse::rejected("invalid api key"));
    provider.add_response(PresetResponse::with_fragments(["Hi there!"]));

    let mut session = session_with(&provider);
    let mut sink = RecordingSink::default();
    let err = session.submit_user_turn("Hi", &mut sink).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(session.transcript().len(), 1);
    assert!(sink.live_renders().is_empty());

    // Typing again is the retry; the failed turn's user message is kept.
    session.submit_user_turn("Hi", &mut sink).await.unwrap();
    assert_eq!(
        provider.requests()[1].messages,
        [ModelMessage::user("Hi"), ModelMessage::user("Hi")]
    );
    assert_eq!(session.transcript().len(), 3);
}

#[test]
fn test_render_live_is_idempotent() {
    let mut once = RecordingSink::default();
    once.render_live("Hello");
    let mut twice = RecordingSink::default();
    twice.render_live("Hello");
    twice.render_live("Hello");
    assert_eq!(once.live, twice.live);
    assert_eq!(once.blocks, twice.blocks);
}

#[tokio::test(start_paused = true)]
async fn test_replay_and_initialize() {
    let provider = TestModelProvider::default();
    provider.add_response(PresetResponse::with_fragments(["Hi there!"]));

    let mut session = ChatSessionBuilder::with_model_provider(provider.clone())
        .with_cursor_marker("_")
        .build();
    assert!(session.transcript().is_empty());
    assert_eq!(session.cursor_marker(), "_");

    let mut sink = RecordingSink::default();
    session.submit_user_turn("Hi", &mut sink).await.unwrap();
    assert_eq!(sink.live_renders(), ["Hi there!_", "Hi there!"]);

    let mut replayed = RecordingSink::default();
    session.replay(&mut replayed);
    assert_eq!(
        replayed.events,
        [
            SinkEvent::Fixed(Role::User, "Hi".to_owned()),
            SinkEvent::Fixed(Role::Assistant, "Hi there!".to_owned()),
        ]
    );

    session.initialize();
    assert!(session.transcript().is_empty());
    let mut replayed = RecordingSink::default();
    session.replay(&mut replayed);
    assert!(replayed.events.is_empty());
}
