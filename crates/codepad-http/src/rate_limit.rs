//! Fixed-window inbound rate limiter shared by every caller.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::time::Instant;

use crate::error::ServerError;

/// Paths that are never counted against the limit.
const EXEMPT_PATHS: &[&str] = &["/health"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests admitted per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Cloneable handle; all clones count against the same window.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            window: Arc::new(Mutex::new(Window {
                started: Instant::now(),
                count: 0,
            })),
        }
    }

    /// Count one request; returns false once the window is exhausted.
    pub fn try_acquire(&self) -> bool {
        let mut window = match self.window.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let now = Instant::now();
        if now.duration_since(window.started) >= self.config.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.config.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

/// Axum middleware rejecting requests with 429 once the window is full.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    if EXEMPT_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    if !limiter.try_acquire() {
        log::warn!(
            "Rate limit exceeded for {} {} ({} requests per {:?})",
            request.method(),
            request.uri(),
            limiter.config.max_requests,
            limiter.config.window
        );
        return ServerError::RateLimited.into_response();
    }

    next.run(request).await
}
