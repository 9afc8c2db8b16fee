//! Backend clients against a local stub server.
//!
//! The stub answers POSTs from a queue of canned responses and records what
//! it received. Probe requests (anything but POST) always get a 200.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use jokebot::application::is_rate_limited;
use jokebot::connector::{Container, ContainerConfig};
use jokebot::{
    AnthropicClient, Backoff, ChatClient, FlowiseClient, GeminiClient, GenerateJokeUseCase,
    Generated, JokeGenerator, PromptedJokeGenerator, Provider, RetryPolicy,
};

struct Recorded {
    path: String,
    headers: HeaderMap,
    body: Value,
}

#[derive(Clone, Default)]
struct Stub {
    responses: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Stub {
    fn respond(self, status: StatusCode, body: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
        self
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn with_request<R>(&self, index: usize, f: impl FnOnce(&Recorded) -> R) -> R {
        f(&self.requests.lock().unwrap()[index])
    }
}

async fn handle(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return StatusCode::OK.into_response();
    }

    stub.requests.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let next = stub.responses.lock().unwrap().pop_front();
    let (status, body) =
        next.unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "{}".to_string()));
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

async fn spawn(stub: Stub) -> String {
    let app = Router::new().fallback(handle).with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Serves one connection that promises a longer body than it sends, then
/// closes the stream.
async fn spawn_truncated(head_and_partial_body: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.ends_with(b"}") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(head_and_partial_body.as_bytes())
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });
    format!("http://{addr}")
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(
        3,
        Backoff::exponential(Duration::from_millis(10), 2, Duration::from_millis(40)),
        is_rate_limited,
    )
}

fn gemini_body(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
}

#[tokio::test]
async fn test_flowise_posts_question() {
    let stub = Stub::default().respond(StatusCode::OK, json!({ "text": "Flowise joke" }));
    let base = spawn(stub.clone()).await;
    let container = Container::new(ContainerConfig {
        provider: Provider::Flowise,
        flowise_url: format!("{base}/api/v1/prediction/bot"),
        ..ContainerConfig::default()
    })
    .expect("Failed to build container");

    let generated = container.generate_use_case().execute("cats").await.unwrap();

    assert_eq!(generated, Generated::Joke("Flowise joke".to_string()));
    stub.with_request(0, |req| {
        assert_eq!(req.path, "/api/v1/prediction/bot");
        assert_eq!(req.body, json!({ "question": "cats" }));
    });
}

#[tokio::test]
async fn test_flowise_error_status_is_not_retried() {
    let stub = Stub::default()
        .respond(StatusCode::TOO_MANY_REQUESTS, json!({ "error": "busy" }))
        .respond(StatusCode::OK, json!({ "text": "unused" }));
    let base = spawn(stub.clone()).await;
    let container = Container::new(ContainerConfig {
        provider: Provider::Flowise,
        flowise_url: base,
        ..ContainerConfig::default()
    })
    .unwrap();

    let err = container
        .generate_use_case()
        .execute("cats")
        .await
        .unwrap_err();

    assert!(err.is_provider_error());
    assert_eq!(stub.request_count(), 1);
}

#[tokio::test]
async fn test_flowise_truncated_body_is_read_error() {
    let url = spawn_truncated(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\n\r\n{\"text\":\"cut",
    )
    .await;
    let client = FlowiseClient::new(url);

    let err = client.generate("cats").await.unwrap_err();

    assert!(err.is_provider_error());
    assert!(
        err.to_string().contains("failed to read response"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_gemini_sends_key_and_prompt() {
    let stub = Stub::default().respond(StatusCode::OK, gemini_body("  Gemini joke \n"));
    let base = spawn(stub.clone()).await;
    let client = GeminiClient::new("test-key", "test-model", &base);
    let generator = PromptedJokeGenerator::new(Arc::new(client));

    let joke = generator.generate("penguins").await.unwrap();

    assert_eq!(joke, "Gemini joke");
    stub.with_request(0, |req| {
        assert_eq!(req.path, "/v1beta/models/test-model:generateContent");
        assert_eq!(req.headers["x-goog-api-key"], "test-key");
        let prompt = req.body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap();
        assert!(prompt.contains("penguins"));
        assert_eq!(req.body["contents"][0]["role"], "user");
    });
}

#[tokio::test]
async fn test_gemini_quota_is_retried() {
    let quota = json!({ "error": { "code": 429, "status": "RESOURCE_EXHAUSTED" } });
    let stub = Stub::default()
        .respond(StatusCode::TOO_MANY_REQUESTS, quota.clone())
        .respond(StatusCode::TOO_MANY_REQUESTS, quota)
        .respond(StatusCode::OK, gemini_body("Finally"));
    let base = spawn(stub.clone()).await;
    let generator = PromptedJokeGenerator::new(Arc::new(GeminiClient::new("k", "m", &base)));
    let use_case = GenerateJokeUseCase::new(Arc::new(generator)).with_retry_policy(fast_retry());

    let generated = use_case.execute("owls").await.unwrap();

    assert_eq!(generated, Generated::Joke("Finally".to_string()));
    assert_eq!(stub.request_count(), 3);
}

#[tokio::test]
async fn test_gemini_quota_exhaustion_falls_back() {
    let quota = json!({ "error": { "code": 429, "status": "RESOURCE_EXHAUSTED" } });
    let stub = Stub::default()
        .respond(StatusCode::TOO_MANY_REQUESTS, quota.clone())
        .respond(StatusCode::TOO_MANY_REQUESTS, quota.clone())
        .respond(StatusCode::TOO_MANY_REQUESTS, quota);
    let base = spawn(stub.clone()).await;
    let generator = PromptedJokeGenerator::new(Arc::new(GeminiClient::new("k", "m", &base)));
    let use_case = GenerateJokeUseCase::new(Arc::new(generator)).with_retry_policy(fast_retry());

    let generated = use_case.execute("owls").await.unwrap();

    assert_eq!(generated, Generated::Exhausted);
    assert_eq!(stub.request_count(), 3);
}

#[tokio::test]
async fn test_gemini_server_error_is_not_retried() {
    let stub = Stub::default().respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": { "status": "INTERNAL" } }),
    );
    let base = spawn(stub.clone()).await;
    let generator = PromptedJokeGenerator::new(Arc::new(GeminiClient::new("k", "m", &base)));
    let use_case = GenerateJokeUseCase::new(Arc::new(generator)).with_retry_policy(fast_retry());

    let err = use_case.execute("owls").await.unwrap_err();

    assert!(err.is_provider_error());
    assert_eq!(stub.request_count(), 1);
}

#[tokio::test]
async fn test_anthropic_messages_request() {
    let stub = Stub::default().respond(
        StatusCode::OK,
        json!({ "content": [{ "type": "text", "text": "Part one," }, { "type": "text", "text": " part two." }] }),
    );
    let base = spawn(stub.clone()).await;
    let client = AnthropicClient::new("secret", "local-model", base);

    let text = client.complete("be funny", "tell me a joke").await.unwrap();

    assert_eq!(text, "Part one, part two.");
    stub.with_request(0, |req| {
        assert_eq!(req.path, "/v1/messages");
        assert_eq!(req.headers["x-api-key"], "secret");
        assert_eq!(req.headers["anthropic-version"], "2023-06-01");
        assert_eq!(req.body["model"], "local-model");
        assert_eq!(req.body["system"], "be funny");
        assert_eq!(req.body["messages"][0]["content"], "tell me a joke");
    });
}

#[tokio::test]
async fn test_anthropic_rate_limit_is_reported() {
    let stub = Stub::default().respond(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "type": "error", "error": { "type": "rate_limit_error" } }),
    );
    let base = spawn(stub.clone()).await;
    let client = AnthropicClient::new("", "m", base);

    let err = client.complete("", "joke").await.unwrap_err();

    assert!(err.is_rate_limited());
}
