//! Fake Ollama server for integration tests.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Request bodies received by the fake server, in arrival order
#[derive(Clone, Default)]
pub struct Recorded(pub Arc<Mutex<Vec<Value>>>);

impl Recorded {
    pub fn bodies(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }
}

async fn tags() -> Json<Value> {
    Json(json!({"models": [{"name": "qwen2:0.5b"}]}))
}

async fn chat(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.0.lock().unwrap().push(body.clone());
    let last = body["messages"]
        .as_array()
        .and_then(|messages| messages.last())
        .and_then(|message| message["content"].as_str())
        .unwrap_or_default()
        .to_string();

    Json(json!({
        "model": body["model"],
        "created_at": "2024-06-01T10:00:00Z",
        "message": {"role": "assistant", "content": format!("chat: {}", last)},
        "done": true,
        "done_reason": "stop",
        "prompt_eval_count": 12,
        "eval_count": 5
    }))
}

async fn generate(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.0.lock().unwrap().push(body.clone());
    let prompt = body["prompt"].as_str().unwrap_or_default().to_string();

    Json(json!({
        "model": body["model"],
        "created_at": "2024-06-01T10:00:00Z",
        "response": format!("generate: {}", prompt),
        "done": true
    }))
}

/// Well-behaved Ollama answering on /api/tags, /api/chat and /api/generate
pub fn healthy(recorded: Recorded) -> Router {
    Router::new()
        .route("/api/tags", get(tags))
        .route("/api/chat", post(chat))
        .route("/api/generate", post(generate))
        .with_state(recorded)
}

/// Ollama that does not know the requested model
pub fn missing_model() -> Router {
    Router::new().route(
        "/api/chat",
        post(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "model \"qwen2:0.5b\" not found, try pulling it first"})),
            )
        }),
    )
}

/// Server answering 200 with a body that is not an Ollama response
pub fn malformed() -> Router {
    Router::new().route("/api/chat", post(|| async { "<html>proxy login</html>" }))
}

/// Server that takes `delay` before answering
pub fn slow(delay: Duration) -> Router {
    Router::new().route(
        "/api/chat",
        post(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({"model": "qwen2:0.5b", "message": {"role": "assistant", "content": "late"}}))
        }),
    )
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A local address nothing listens on
pub fn closed_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
