//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, RefreshUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::domain::repository::{RefreshTokenStore, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    SessionStatusResponse, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: RefreshTokenStore + Send + Sync + 'static,
{
    pub users: Arc<U>,
    pub sessions: Arc<S>,
    pub config: Arc<AuthConfig>,
}

// U and S are behind Arcs, so Clone must not require them to be Clone
impl<U, S> Clone for AuthAppState<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: RefreshTokenStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            sessions: Arc::clone(&self.sessions),
            config: Arc::clone(&self.config),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<U, S>(
    State(state): State<AuthAppState<U, S>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Json<SignUpResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: RefreshTokenStore + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.users.clone(), state.config.clone());

    let input = SignUpInput {
        user_name: req.user_name,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(SignUpResponse {
        user_name: output.user_name,
    }))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<U, S>(
    State(state): State<AuthAppState<U, S>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    S: RefreshTokenStore + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.users.clone(),
        state.sessions.clone(),
        state.config.clone(),
    );

    let input = SignInInput {
        user_name: req.user_name,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    let access_cookie = state
        .config
        .access_cookie()
        .build_set_cookie(&output.access_token);
    let refresh_cookie = state
        .config
        .refresh_cookie()
        .build_set_cookie(&output.refresh_token);

    // AppendHeaders: both Set-Cookie headers must survive, a plain header
    // tuple array would collapse them into one
    Ok((
        StatusCode::OK,
        AppendHeaders([
            (header::SET_COOKIE, access_cookie),
            (header::SET_COOKIE, refresh_cookie),
        ]),
        Json(SignInResponse {
            user_name: output.user_name,
        }),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    S: RefreshTokenStore + Send + Sync + 'static,
{
    let token = extract_auth_cookie(&headers, &state.config.refresh_cookie_name);

    let use_case = RefreshUseCase::new(state.sessions.clone(), state.config.clone());

    // An absent cookie and an empty cookie value are the same condition
    let output = use_case.execute(token.as_deref().unwrap_or_default()).await?;

    let access_cookie = state
        .config
        .access_cookie()
        .build_set_cookie(&output.access_token);

    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([(header::SET_COOKIE, access_cookie)]),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    S: RefreshTokenStore + Send + Sync + 'static,
{
    let token = extract_auth_cookie(&headers, &state.config.refresh_cookie_name);

    let use_case = SignOutUseCase::new(state.sessions.clone());

    // Revocation errors must reach the client: keeping the cookies while
    // claiming sign-out succeeded would leave a live refresh token behind.
    use_case
        .execute(token.as_deref().unwrap_or_default())
        .await?;

    let clear_access = state.config.access_cookie().build_delete_cookie();
    let clear_refresh = state.config.refresh_cookie().build_delete_cookie();

    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([
            (header::SET_COOKIE, clear_access),
            (header::SET_COOKIE, clear_refresh),
        ]),
    ))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: RefreshTokenStore + Send + Sync + 'static,
{
    let token = extract_auth_cookie(&headers, &state.config.access_cookie_name);

    let use_case = CheckSessionUseCase::new(state.config.clone());

    let session_info = token.and_then(|t| use_case.execute(&t).ok());

    match session_info {
        Some(info) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            user_name: Some(info.user_name),
        })),
        None => Ok(Json(SessionStatusResponse {
            authenticated: false,
            user_name: None,
        })),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn extract_auth_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    platform::cookie::extract_cookie(headers, name)
}
