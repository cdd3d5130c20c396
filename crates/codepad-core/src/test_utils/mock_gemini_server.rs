// src/test_utils/mock_gemini_server.rs
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedGeminiRequest {
    /// Path after `/models/`, e.g. `gemini-1.5-flash:generateContent`
    pub model_action: String,
    pub key: Option<String>,
    pub body: Value,
}

/// A completion text, or an HTTP status with an error message.
pub type MockGeminiResponse = Result<String, (u16, String)>;

#[derive(Clone)]
struct MockGeminiState {
    responses: Arc<Mutex<VecDeque<MockGeminiResponse>>>,
    requests: Arc<Mutex<Vec<RecordedGeminiRequest>>>,
}

async fn generate_content_handler(
    State(state): State<MockGeminiState>,
    Path(model_action): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    log::debug!("Mock Gemini server received request for {}", model_action);
    state.requests.lock().unwrap().push(RecordedGeminiRequest {
        model_action,
        key: query.get("key").cloned(),
        body,
    });

    match state.responses.lock().unwrap().pop_front() {
        Some(Ok(text)) => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": text}]},
                    "finishReason": "STOP"
                }]
            })),
        ),
        Some(Err((code, message))) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(json!({"error": {"code": code, "message": message, "status": "FAILED"}})),
            )
        }
        None => {
            log::error!("Mock Gemini server ran out of responses!");
            (StatusCode::SERVICE_UNAVAILABLE, Json(Value::Null))
        }
    }
}

pub struct MockGeminiServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    requests: Arc<Mutex<Vec<RecordedGeminiRequest>>>,
}

impl MockGeminiServer {
    pub async fn start(responses: Vec<MockGeminiResponse>) -> Self {
        let state = MockGeminiState {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = state.requests.clone();

        let app = Router::new()
            .route("/models/{*model_action}", post(generate_content_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock Gemini server to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock Gemini server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| log::error!("Mock Gemini server error: {}", e));
        });

        MockGeminiServer {
            addr,
            shutdown_tx,
            requests,
        }
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock Gemini server shutdown signal already sent or receiver dropped.");
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    pub fn get_requests(&self) -> Vec<RecordedGeminiRequest> {
        self.requests.lock().unwrap().clone()
    }
}
