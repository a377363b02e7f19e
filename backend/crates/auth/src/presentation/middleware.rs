//! Auth Middleware
//!
//! Gate for protected routes. Access tokens are verified statelessly: no
//! store lookup happens here, so a revoked session stays usable until its
//! current access token expires.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub config: Arc<AuthConfig>,
}

/// Identity extracted from a verified access token
///
/// Inserted into request extensions for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_name: String,
}

/// Middleware that requires a valid access token
///
/// - No access token cookie at all: 401, the client never authenticated
/// - Cookie present but expired or forged: 403, the claim was rejected
pub async fn require_auth(
    State(state): State<AuthMiddlewareState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.access_cookie_name);

    let token = match token {
        Some(token) if !token.is_empty() => token,
        _ => return Err(AuthError::Unauthenticated.into_response()),
    };

    let use_case = CheckSessionUseCase::new(state.config.clone());

    let info = match use_case.execute(&token) {
        Ok(info) => info,
        Err(err) => return Err(err.into_response()),
    };

    req.extensions_mut().insert(AuthenticatedUser {
        user_name: info.user_name,
    });

    Ok(next.run(req).await)
}
