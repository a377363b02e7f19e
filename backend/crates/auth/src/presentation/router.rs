//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{RefreshTokenStore, UserRepository};
use crate::infra::postgres::PgUserRepository;
use crate::infra::redis::RedisRefreshTokenStore;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with the production backends
pub fn auth_router(
    users: PgUserRepository,
    sessions: RedisRefreshTokenStore,
    config: AuthConfig,
) -> Router {
    auth_router_generic(users, sessions, config)
}

/// Create a generic Auth router for any repository implementations
pub fn auth_router_generic<U, S>(users: U, sessions: S, config: AuthConfig) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    S: RefreshTokenStore + Send + Sync + 'static,
{
    let state = AuthAppState {
        users: Arc::new(users),
        sessions: Arc::new(sessions),
        config: Arc::new(config),
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<U, S>))
        .route("/signin", post(handlers::sign_in::<U, S>))
        .route("/refresh", post(handlers::refresh::<U, S>))
        .route("/signout", post(handlers::sign_out::<U, S>))
        .route("/status", get(handlers::session_status::<U, S>))
        .with_state(state)
}
