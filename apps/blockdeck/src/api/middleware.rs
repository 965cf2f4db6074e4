//! # Middleware
//!
//! Global request rate limiting for the board API.
//!
//! `BLOCKDECK_RATE_LIMIT` sets requests per second (default 100, `0`
//! disables the limiter).

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Environment variable holding the request rate.
pub const RATE_LIMIT_ENV: &str = "BLOCKDECK_RATE_LIMIT";

/// Requests per second when nothing is configured.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Shared limiter over all clients.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Build a limiter, or `None` when `requests_per_second` is zero.
pub fn create_rate_limiter(requests_per_second: u32) -> Option<GlobalRateLimiter> {
    let rps = NonZeroU32::new(requests_per_second)?;
    Some(Arc::new(RateLimiter::direct(Quota::per_second(rps))))
}

/// Parse a configured rate. Unparseable values fall back to the default.
#[must_use]
pub fn parse_rate_limit(raw: Option<&str>) -> u32 {
    match raw.map(str::trim) {
        None => DEFAULT_RATE_LIMIT,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(value, "invalid {RATE_LIMIT_ENV}, using {DEFAULT_RATE_LIMIT}");
            DEFAULT_RATE_LIMIT
        }),
    }
}

/// The rate from `BLOCKDECK_RATE_LIMIT`.
pub fn get_rate_limit_from_env() -> u32 {
    parse_rate_limit(std::env::var(RATE_LIMIT_ENV).ok().as_deref())
}

/// Answer 429 once the global quota for this second is spent.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if limiter.check().is_ok() {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(path = %request.uri().path(), "rate limit exceeded");
        Err((StatusCode::TOO_MANY_REQUESTS, "Too Many Requests"))
    }
}
