//! Request identity resolution.
//!
//! # Purpose
//! Turns an incoming `Authorization: Bearer` header into an authenticated
//! `User`, or nothing. Handlers call this directly instead of going through
//! middleware so each endpoint chooses its own failure status.
use crate::app::AppState;
use crate::model::User;
use axum::http::HeaderMap;

/// Pull the bearer token out of the Authorization header, if present.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Resolve the caller, or `None` for any failure: missing header, bad or
/// expired token, unknown or deactivated account, and (when session
/// enforcement is on) a revoked session. Callers never learn which.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let token = extract_bearer(headers)?;
    let claims = match state.tokens.validate(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "rejected bearer token");
            return None;
        }
    };
    if state.enforce_sessions {
        // A logged-out token stays cryptographically valid until `exp`;
        // this extra check makes revocation immediate.
        match state.store.session_usable(token).await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "session lookup failed, rejecting request");
                return None;
            }
        }
    }
    let user = match state.store.find_user(claims.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(error = %err, "user lookup failed, rejecting request");
            return None;
        }
    };
    if !user.is_active {
        return None;
    }
    Some(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_requires_the_scheme_prefix() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer abc.def.ghi".parse().expect("header"),
        );
        assert_eq!(extract_bearer(&headers), Some("abc.def.ghi"));

        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Basic dXNlcjpwYXNz".parse().expect("header"),
        );
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer ".parse().expect("header"),
        );
        assert_eq!(extract_bearer(&headers), None);
    }
}
