// src/test_utils/mock_judge_server.rs
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedJudgeRequest {
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
    pub api_key: Option<String>,
    pub api_host: Option<String>,
}

#[derive(Clone)]
struct MockJudgeState {
    submit_response: Value,
    polls: Arc<Mutex<VecDeque<Value>>>,
    last_poll: Arc<Mutex<Option<Value>>>,
    catalog: Arc<Mutex<Value>>,
    rejection: Arc<Mutex<Option<(StatusCode, Value)>>>,
    stall_polls: Arc<Mutex<bool>>,
    requests: Arc<Mutex<Vec<RecordedJudgeRequest>>>,
}

impl MockJudgeState {
    fn record(&self, path: String, query: Option<String>, headers: &HeaderMap, body: Value) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(RecordedJudgeRequest {
            path,
            query,
            body,
            api_key: header("x-rapidapi-key"),
            api_host: header("x-rapidapi-host"),
        });
    }

    fn reply(&self, body: Value) -> (StatusCode, Json<Value>) {
        match self.rejection.lock().unwrap().clone() {
            Some((status, rejection)) => (status, Json(rejection)),
            None => (StatusCode::OK, Json(body)),
        }
    }
}

async fn submit_handler(
    State(state): State<MockJudgeState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    log::debug!("Mock judge received submission: {}", payload);
    state.record("/submissions".to_string(), query, &headers, payload);
    state.reply(state.submit_response.clone())
}

async fn fetch_handler(
    State(state): State<MockJudgeState>,
    Path(token): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.record(format!("/submissions/{}", token), query, &headers, Value::Null);

    let stall = *state.stall_polls.lock().unwrap();
    if stall {
        log::debug!("Mock judge holding poll for {}", token);
        tokio::time::sleep(Duration::from_secs(3600)).await;
    }

    let mut last = state.last_poll.lock().unwrap();
    if let Some(next) = state.polls.lock().unwrap().pop_front() {
        *last = Some(next);
    }
    match last.clone() {
        Some(poll) => state.reply(poll),
        None => {
            log::error!("Mock judge has no poll response for {}", token);
            (StatusCode::NOT_FOUND, Json(Value::Null))
        }
    }
}

async fn languages_handler(
    State(state): State<MockJudgeState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.record("/languages".to_string(), query, &headers, Value::Null);
    let catalog = state.catalog.lock().unwrap().clone();
    state.reply(catalog)
}

pub struct MockJudgeServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    state: MockJudgeState,
}

impl MockJudgeServer {
    /// `polls` are served in order to `GET /submissions/{token}`; the last one repeats.
    pub async fn start(submit_response: Value, polls: Vec<Value>) -> Self {
        let state = MockJudgeState {
            submit_response,
            polls: Arc::new(Mutex::new(VecDeque::from(polls))),
            last_poll: Arc::new(Mutex::new(None)),
            catalog: Arc::new(Mutex::new(Value::Array(Vec::new()))),
            rejection: Arc::new(Mutex::new(None)),
            stall_polls: Arc::new(Mutex::new(false)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/submissions", post(submit_handler))
            .route("/submissions/{token}", get(fetch_handler))
            .route("/languages", get(languages_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock judge to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock judge listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| log::error!("Mock judge error: {}", e));
        });

        MockJudgeServer {
            addr,
            shutdown_tx,
            state,
        }
    }

    pub fn with_catalog(self, catalog: Value) -> Self {
        *self.state.catalog.lock().unwrap() = catalog;
        self
    }

    /// Answer every request with `status` and `body`.
    pub fn rejecting_with(self, status: u16, body: Value) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        *self.state.rejection.lock().unwrap() = Some((status, body));
        self
    }

    /// Hold every `GET /submissions/{token}` for an hour before answering.
    pub fn stalling_polls(self) -> Self {
        *self.state.stall_polls.lock().unwrap() = true;
        self
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock judge shutdown signal already sent or receiver dropped.");
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    pub fn get_requests(&self) -> Vec<RecordedJudgeRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}
