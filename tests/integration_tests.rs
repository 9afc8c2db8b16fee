//! Integration tests for JokeBot.
//!
//! These tests drive the request handler end to end through the public API,
//! with a scripted generator standing in for the network.

use std::sync::Arc;
use std::time::Duration;

use jokebot::domain::{FAREWELL_REPLY, NO_TOPIC_REPLY, OUT_OF_JOKES_REPLY};
use jokebot::{
    ChatSessionUseCase, ConversationState, GenerateJokeUseCase, HandleRequestUseCase,
    HistoryPolicy, InMemorySessionRepository, Intent, IntentClassifier, MockJokeGenerator,
    ReplyKind, ScriptedJokeGenerator,
};

fn handler(generator: &Arc<ScriptedJokeGenerator>) -> HandleRequestUseCase {
    let generate = GenerateJokeUseCase::new(generator.clone());
    HandleRequestUseCase::new(Arc::new(generate))
}

#[tokio::test]
async fn test_new_topic_scenario() {
    let generator = Arc::new(ScriptedJokeGenerator::new().then_joke("Cats have nine lives."));
    let handler = handler(&generator);
    let mut state = ConversationState::new();

    let reply = handler
        .execute(&mut state, "tell me about cats")
        .await
        .expect("handler failed")
        .expect("no reply");

    assert_eq!(reply.intent(), Intent::NewTopic);
    assert_eq!(reply.text(), "Cats have nine lives.");
    assert_eq!(state.last_topic(), Some("tell me about cats"));
    assert_eq!(generator.call_count(), 1);
    assert_eq!(state.history().len(), 1);
}

#[tokio::test]
async fn test_one_more_without_topic_makes_no_call() {
    let generator = Arc::new(ScriptedJokeGenerator::new());
    let handler = handler(&generator);
    let mut state = ConversationState::new();

    let reply = handler.execute(&mut state, "one more").await.unwrap().unwrap();

    assert_eq!(
        reply.text(),
        "I don't remember the last topic! Please ask for a joke first. 😊"
    );
    assert_eq!(reply.text(), NO_TOPIC_REPLY);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_stop_makes_no_call() {
    let generator = Arc::new(ScriptedJokeGenerator::new());
    let handler = handler(&generator);
    let mut state = ConversationState::new();

    let reply = handler.execute(&mut state, "stop").await.unwrap().unwrap();

    assert_eq!(
        reply.text(),
        "Thanks for your patience! Let me know if you need more jokes later 😊."
    );
    assert_eq!(reply.text(), FAREWELL_REPLY);
    assert_eq!(generator.call_count(), 0);
    assert!(state.last_topic().is_none());
}

#[tokio::test]
async fn test_stop_variants_keep_last_topic() {
    let generator = Arc::new(ScriptedJokeGenerator::new().then_joke("pun"));
    let handler = handler(&generator);
    let mut state = ConversationState::new();
    handler.execute(&mut state, "puns").await.unwrap();

    for text in ["STOP", "no more jokes", "that's enough", "please stop it"] {
        let reply = handler.execute(&mut state, text).await.unwrap().unwrap();
        assert_eq!(reply.text(), FAREWELL_REPLY, "{text}");
        assert_eq!(state.last_topic(), Some("puns"), "{text}");
    }
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_retry_then_success() {
    let generator = Arc::new(
        ScriptedJokeGenerator::new()
            .then_rate_limited()
            .then_rate_limited()
            .then_joke("Third time's the charm."),
    );
    let handler = handler(&generator);
    let mut state = ConversationState::new();
    let start = tokio::time::Instant::now();

    let reply = handler.execute(&mut state, "luck").await.unwrap().unwrap();

    assert_eq!(reply.text(), "Third time's the charm.");
    assert_eq!(reply.kind(), ReplyKind::Joke);
    assert_eq!(generator.call_count(), 3);
    assert!(start.elapsed() >= Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_exhaustion_falls_back() {
    let generator = Arc::new(
        ScriptedJokeGenerator::new()
            .then_rate_limited()
            .then_rate_limited()
            .then_rate_limited(),
    );
    let handler = handler(&generator);
    let mut state = ConversationState::new();

    let reply = handler.execute(&mut state, "luck").await.unwrap().unwrap();

    assert_eq!(reply.text(), OUT_OF_JOKES_REPLY);
    assert_eq!(generator.call_count(), 3);
}

#[tokio::test]
async fn test_dedupe_never_returns_seen_joke_unless_exhausted() {
    let generator = Arc::new(
        ScriptedJokeGenerator::new()
            .then_joke("A")
            .then_joke("A")
            .then_joke("A")
            .then_joke("B")
            .then_joke("A")
            .then_joke("A")
            .then_joke("B")
            .then_joke("B")
            .then_joke("A"),
    );
    let handler = handler(&generator).with_dedupe(true);
    let mut state = handler.new_state();

    let first = handler.execute(&mut state, "cats").await.unwrap().unwrap();
    assert_eq!(first.text(), "A");

    let second = handler.execute(&mut state, "one more").await.unwrap().unwrap();
    assert_eq!(second.text(), "B");
    assert_eq!(second.kind(), ReplyKind::Joke);
    assert_eq!(generator.call_count(), 4);

    // Both known jokes come back five times in a row.
    let third = handler.execute(&mut state, "one more").await.unwrap().unwrap();
    assert_eq!(third.text(), "A");
    assert_eq!(third.kind(), ReplyKind::RepeatedJoke);
    assert_eq!(generator.call_count(), 9);
    assert_eq!(state.seen_reply_count(), 2);
}

#[tokio::test]
async fn test_laughter_flow_with_generation_only_history() {
    let generator = Arc::new(ScriptedJokeGenerator::new().then_joke("joke"));
    let handler = handler(&generator)
        .with_classifier(IntentClassifier::new().with_laughter(true))
        .with_history_policy(HistoryPolicy::GenerationOnly);
    let mut state = handler.new_state();

    handler.execute(&mut state, "clowns").await.unwrap();
    let reply = handler.execute(&mut state, "😂").await.unwrap().unwrap();

    assert_eq!(reply.kind(), ReplyKind::LaughterAck);
    assert_eq!(state.last_topic(), Some("clowns"));
    assert_eq!(state.history().len(), 1);
}

#[tokio::test]
async fn test_chat_session_with_mock_generator() {
    let generate = GenerateJokeUseCase::new(Arc::new(MockJokeGenerator::new()));
    let handler = HandleRequestUseCase::new(Arc::new(generate)).with_dedupe(true);
    let chat = ChatSessionUseCase::new(
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(handler),
    );

    let id = chat.start().await.expect("Failed to start session");
    let reply = chat.send(id, "robots").await.unwrap().unwrap();
    assert!(reply.text().contains("robots"));

    for _ in 0..3 {
        chat.send(id, "another one").await.unwrap().unwrap();
    }

    let state = chat.state(id).await.unwrap();
    assert_eq!(state.history().len(), 4);
    assert_eq!(state.last_topic(), Some("robots"));
    assert!(state.seen_reply_count() >= 1);

    chat.end(id).await.unwrap();
    assert_eq!(chat.active_sessions().await.unwrap(), 0);
}
