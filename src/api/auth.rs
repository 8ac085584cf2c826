//! Access-key enforcement for every API route
//!
//! The key travels either as the `api-key` query parameter or the
//! `x-api-key` header. Validation lives entirely in this layer; the engine
//! below never sees credentials.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};

use super::handlers::ApiError;
use super::models::ErrorResponse;
use super::AppState;

pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_key.as_deref() else {
        return Err(unauthorized("access key is not configured on this server"));
    };

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());
    let query_key = request.uri().query().and_then(key_from_query);

    if key_matches(header_key, query_key.as_deref(), expected) {
        Ok(next.run(request).await)
    } else {
        Err(unauthorized("invalid or missing access key"))
    }
}

fn unauthorized(message: &str) -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
            kind: "unauthorized",
        }),
    )
}

fn key_from_query(query: &str) -> Option<String> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("api-key="))
        .map(str::to_string)
}

fn key_matches(header_key: Option<&str>, query_key: Option<&str>, expected: &str) -> bool {
    header_key == Some(expected) || query_key == Some(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_query() {
        assert_eq!(
            key_from_query("foo=1&api-key=secret&bar=2"),
            Some("secret".to_string())
        );
        assert_eq!(key_from_query("foo=1&bar=2"), None);
    }

    #[test]
    fn test_key_matches_either_channel() {
        assert!(key_matches(Some("secret"), None, "secret"));
        assert!(key_matches(None, Some("secret"), "secret"));
        assert!(key_matches(Some("wrong"), Some("secret"), "secret"));
    }

    #[test]
    fn test_key_mismatch() {
        assert!(!key_matches(Some("wrong"), None, "secret"));
        assert!(!key_matches(None, None, "secret"));
    }
}
