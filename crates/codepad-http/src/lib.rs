//! HTTP surface of the Codepad code assistant
//!
//! The editor talks to three JSON endpoints: `/explain` and `/improve` forward
//! code to a generative-language model, `/execute` runs it on a remote judge
//! and waits for the result. This crate owns routing, request validation,
//! error rendering, CORS, request logging and the inbound rate limiter; what
//! actually happens behind each endpoint is supplied by an
//! [`AssistantHandler`] implementation.

pub mod error;
pub mod handler;
pub mod rate_limit;

pub use error::{Result, ServerError};
pub use handler::{
    AssistantHandler, CodeInput, CodeRequest, ExecuteResponse, ExplainResponse, ImproveResponse,
    LanguageEntry,
};
pub use rate_limit::{RateLimitConfig, RateLimiter};

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Json as AxumJson, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::{middleware, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Configuration for the Codepad server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Enable CORS
    pub enable_cors: bool,
    /// CORS allowed origins (if None, allows any origin)
    pub cors_origins: Option<Vec<String>>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Enable request logging
    pub enable_logging: bool,
    /// Inbound rate limit; None disables it
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            enable_cors: true,
            cors_origins: None,
            max_body_size: 1024 * 1024, // 1MB
            enable_logging: true,
            rate_limit: Some(RateLimitConfig::default()),
        }
    }
}

impl ServerConfig {
    /// Set the bind address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Parse and set the bind address from a string.
    pub fn with_bind_addr_str(mut self, addr: &str) -> Result<Self> {
        self.bind_addr = addr
            .parse()
            .map_err(|e| ServerError::config_error(format!("Invalid bind address: {}", e)))?;
        Ok(self)
    }

    /// Set allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set maximum request body size.
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Enable or disable request logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Set or clear the inbound rate limit.
    pub fn with_rate_limit(mut self, rate_limit: Option<RateLimitConfig>) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

/// Shared application state containing the handler and configuration.
#[derive(Clone)]
pub struct AppState<T: AssistantHandler> {
    pub assistant: T,
    pub config: ServerConfig,
}

/// Turn a raw body into a validated input, without touching any upstream.
async fn validated_input<T: AssistantHandler>(
    app_state: &AppState<T>,
    body: std::result::Result<AxumJson<CodeRequest>, JsonRejection>,
) -> Result<CodeInput> {
    let AxumJson(request) = body.map_err(|rejection| {
        log::warn!("Rejected request body: {}", rejection.body_text());
        ServerError::invalid_request(rejection.body_text())
    })?;

    app_state.assistant.validate_input(request).await.map_err(|e| {
        log::warn!("Input validation failed: {}", e);
        e
    })
}

/// Handler for the /explain POST endpoint.
async fn explain_handler<T: AssistantHandler>(
    State(app_state): State<AppState<T>>,
    body: std::result::Result<AxumJson<CodeRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>> {
    let input = validated_input(&app_state, body).await?;
    log::info!("Received explain request for language: {}", input.language);

    match app_state.assistant.explain(input).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            log::error!("Explain failed: {}", e);
            Err(e)
        }
    }
}

/// Handler for the /improve POST endpoint.
async fn improve_handler<T: AssistantHandler>(
    State(app_state): State<AppState<T>>,
    body: std::result::Result<AxumJson<CodeRequest>, JsonRejection>,
) -> Result<Json<ImproveResponse>> {
    let input = validated_input(&app_state, body).await?;
    log::info!("Received improve request for language: {}", input.language);

    match app_state.assistant.improve(input).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            log::error!("Improve failed: {}", e);
            Err(e)
        }
    }
}

/// Handler for the /execute POST endpoint.
async fn execute_handler<T: AssistantHandler>(
    State(app_state): State<AppState<T>>,
    body: std::result::Result<AxumJson<CodeRequest>, JsonRejection>,
) -> Result<Json<ExecuteResponse>> {
    let input = validated_input(&app_state, body).await?;
    log::info!("Received execute request for language: {}", input.language);

    match app_state.assistant.execute(input).await {
        Ok(response) => {
            log::info!(
                "Execution {} finished with status '{}'",
                response.token,
                response.status
            );
            Ok(Json(response))
        }
        Err(e) => {
            log::error!("Execute failed: {}", e);
            Err(e)
        }
    }
}

/// Handler for the /languages GET endpoint.
async fn languages_handler<T: AssistantHandler>(
    State(app_state): State<AppState<T>>,
) -> Result<Json<Vec<LanguageEntry>>> {
    log::debug!("Received languages request");
    app_state.assistant.languages().await.map(Json)
}

/// The Codepad HTTP server.
pub struct CodepadServer<T: AssistantHandler> {
    assistant: T,
    config: ServerConfig,
}

impl<T: AssistantHandler> CodepadServer<T> {
    /// Create a new server with the given handler and default configuration.
    pub fn new(assistant: T) -> Self {
        Self {
            assistant,
            config: ServerConfig::default(),
        }
    }

    /// Create a new server with custom configuration.
    pub fn with_config(assistant: T, config: ServerConfig) -> Self {
        Self { assistant, config }
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the Axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let state = AppState {
            assistant: self.assistant.clone(),
            config: self.config.clone(),
        };

        let mut router = Router::new()
            .route("/health", get(|| async {
                Json(HealthResponse {
                    status: "healthy".to_string(),
                    timestamp: chrono::Utc::now(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                })
            }))
            .route("/languages", get(languages_handler::<T>))
            // OPTIONS answers preflight when CORS is disabled
            .route(
                "/explain",
                post(explain_handler::<T>).options(|| async { StatusCode::OK }),
            )
            .route(
                "/improve",
                post(improve_handler::<T>).options(|| async { StatusCode::OK }),
            )
            .route(
                "/execute",
                post(execute_handler::<T>).options(|| async { StatusCode::OK }),
            )
            .layer(DefaultBodyLimit::max(self.config.max_body_size))
            .with_state(state);

        if let Some(rate_limit) = self.config.rate_limit {
            router = router.layer(middleware::from_fn_with_state(
                RateLimiter::new(rate_limit),
                rate_limit::rate_limit_middleware,
            ));
        }

        if self.config.enable_logging {
            router = router.layer(middleware::from_fn(
                |request: axum::http::Request<axum::body::Body>, next: axum::middleware::Next| async {
                    let request_id = uuid::Uuid::new_v4().to_string();
                    let method = request.method().clone();
                    let uri = request.uri().clone();

                    // Health probes arrive constantly; keep them out of info logs
                    if uri.path() == "/health" {
                        log::debug!("Request {} {} {}", request_id, method, uri);
                    } else {
                        log::info!("Request {} {} {}", request_id, method, uri);
                    }

                    let start = std::time::Instant::now();
                    let response = next.run(request).await;
                    let duration = start.elapsed();

                    if uri.path() == "/health" {
                        log::debug!("Response {} completed in {:?}", request_id, duration);
                    } else {
                        log::info!(
                            "Response {} {} completed in {:?}",
                            request_id,
                            response.status(),
                            duration
                        );
                    }

                    response
                },
            ));
        }

        router = router.layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors_layer = if let Some(ref origins) = self.config.cors_origins {
                let origins: std::result::Result<Vec<_>, _> =
                    origins.iter().map(|s| s.parse()).collect();
                match origins {
                    Ok(origins) => CorsLayer::new()
                        .allow_origin(origins)
                        .allow_methods(Any)
                        .allow_headers(Any),
                    Err(_) => {
                        log::warn!("Invalid CORS origin in configuration, falling back to permissive CORS");
                        CorsLayer::permissive()
                    }
                }
            } else {
                CorsLayer::permissive()
            };
            router = router.layer(cors_layer);
        }

        router
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided shutdown signal is received.
    pub async fn serve_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|e| {
                ServerError::config_error(format!(
                    "Failed to bind to {}: {}",
                    self.config.bind_addr, e
                ))
            })?;

        log::info!("Codepad server starting on {}", self.config.bind_addr);
        log::info!("Health check: http://{}/health", self.config.bind_addr);
        log::info!("Explain endpoint: http://{}/explain", self.config.bind_addr);
        log::info!("Improve endpoint: http://{}/improve", self.config.bind_addr);
        log::info!("Execute endpoint: http://{}/execute", self.config.bind_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::internal(format!("Server error: {}", e)))?;

        log::info!("Codepad server shut down gracefully");
        Ok(())
    }
}

/// Utility function to create a shutdown signal from Ctrl+C.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            log::info!("Received SIGTERM, shutting down...");
        },
    }
}
