//! A stand-in model provider served on an ephemeral local port.

use crate::extract::ExtractionStrategy;
use crate::invoker::Provider;
use crate::{AppState, Config};
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub enum Upstream {
    /// Answers with a provider envelope wrapping this completion text.
    Completion(String),
    Status(StatusCode),
    Body(Value),
    /// Records the request, then waits for the gate before completing.
    Held(Arc<Notify>, String),
}

impl Upstream {
    pub fn completion(text: impl Into<String>) -> Self {
        Upstream::Completion(text.into())
    }
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub bearer: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct Shared {
    reply: Upstream,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

pub struct RunningUpstream {
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl RunningUpstream {
    pub fn last_request(&self) -> Option<SeenRequest> {
        self.seen.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Waits until the upstream has received `count` requests.
    pub async fn wait_for_requests(&self, count: usize) {
        while self.request_count() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

async fn handle(
    State(shared): State<Shared>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
    };
    let path = uri.path().to_string();
    shared.seen.lock().unwrap().push(SeenRequest {
        path: path.clone(),
        api_key: header_value("x-goog-api-key"),
        bearer: header_value(header::AUTHORIZATION.as_str())
            .and_then(|h| h.strip_prefix("Bearer ").map(str::to_string)),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match shared.reply {
        Upstream::Completion(text) => completion(&path, text),
        Upstream::Held(gate, text) => {
            gate.notified().await;
            completion(&path, text)
        }
        Upstream::Status(status) => (status, "upstream failure").into_response(),
        Upstream::Body(value) => Json(value).into_response(),
    }
}

fn completion(path: &str, text: String) -> Response {
    if path.ends_with(":generateContent") {
        Json(json!({
            "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
        }))
        .into_response()
    } else {
        Json(json!({
            "choices": [{"message": {"role": "assistant", "content": text}}]
        }))
        .into_response()
    }
}

pub async fn spawn_upstream(reply: Upstream) -> RunningUpstream {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new().fallback(handle).with_state(Shared {
        reply,
        seen: seen.clone(),
    });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    RunningUpstream {
        base_url: format!("http://{addr}"),
        seen,
    }
}

/// A base url nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn test_state(base_url: &str) -> AppState {
    test_state_with_limit(base_url, 2)
}

pub fn test_state_with_limit(base_url: &str, upstream_max_concurrent: usize) -> AppState {
    AppState::new(Config {
        port: 0,
        llm_provider: Provider::Gemini,
        llm_base_url: Some(base_url.to_string()),
        llm_api_key: "test-key".into(),
        llm_model: None,
        llm_request_timeout: 5,
        upstream_max_concurrent,
        extraction_strategy: ExtractionStrategy::Greedy,
    })
    .unwrap()
}
