//! # Authentication
//!
//! Optional bearer-key check for the board API.
//!
//! `BLOCKDECK_API_KEY` is read once when the router is built. When it is set,
//! every route except `/health` requires:
//! ```text
//! Authorization: Bearer <key>
//! ```

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "BLOCKDECK_API_KEY";

/// The configured key, shared by every request.
pub type ApiKey = Arc<str>;

/// Read the key from the environment. Empty counts as unset.
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
}

/// Constant-time key comparison.
///
/// Both sides are padded to the same length so the comparison time does not
/// depend on where the keys diverge or on the provided length.
#[must_use]
pub fn keys_match(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    let len = provided.len().max(expected.len());
    let mut lhs = vec![0u8; len];
    let mut rhs = vec![0u8; len];
    lhs[..provided.len()].copy_from_slice(provided);
    rhs[..expected.len()].copy_from_slice(expected);

    let same_bytes: bool = lhs.ct_eq(&rhs).into();
    same_bytes && provided.len() == expected.len()
}

/// Reject requests without the configured key. `/health` is always open.
pub async fn api_key_auth_middleware(
    State(expected): State<ApiKey>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v));

    match provided {
        Some(key) if keys_match(key, &expected) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!(
                event = "auth_failure",
                reason = "invalid_api_key",
                path = %request.uri().path(),
                "rejected request with wrong API key"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
        None => {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_authorization_header",
                path = %request.uri().path(),
                "rejected request without Authorization header"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_keys_match() {
        assert!(keys_match("s3cret", "s3cret"));
    }

    #[test]
    fn prefix_does_not_match() {
        assert!(!keys_match("s3c", "s3cret"));
        assert!(!keys_match("s3cret-and-more", "s3cret"));
    }

    #[test]
    fn trailing_zero_bytes_do_not_match() {
        assert!(!keys_match("key\0", "key"));
    }

    #[test]
    fn empty_provided_key_fails() {
        assert!(!keys_match("", "s3cret"));
    }
}
