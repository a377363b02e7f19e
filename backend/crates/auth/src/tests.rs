//! Integration tests for the session lifecycle
//!
//! Exercises sign-up through sign-out against the in-memory backends,
//! plus the HTTP surface via the router.

use std::sync::Arc;
use std::time::Duration;

use crate::application::config::AuthConfig;
use crate::application::{
    RefreshUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::repository::RefreshTokenStore;
use crate::error::{AuthError, AuthResult};
use crate::infra::memory::{InMemoryRefreshTokenStore, InMemoryUserRepository};

// ============================================================================
// Fixtures
// ============================================================================

struct Harness {
    users: Arc<InMemoryUserRepository>,
    sessions: Arc<InMemoryRefreshTokenStore>,
    config: Arc<AuthConfig>,
}

impl Harness {
    fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            sessions: Arc::new(InMemoryRefreshTokenStore::new()),
            config: Arc::new(AuthConfig::development()),
        }
    }

    async fn sign_up(&self, user_name: &str, password: &str) {
        SignUpUseCase::new(self.users.clone(), self.config.clone())
            .execute(SignUpInput {
                user_name: user_name.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap();
    }

    async fn sign_in(&self, user_name: &str, password: &str) -> crate::application::SignInOutput {
        SignInUseCase::new(self.users.clone(), self.sessions.clone(), self.config.clone())
            .execute(SignInInput {
                user_name: user_name.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
    }

    fn refresh_use_case(&self) -> RefreshUseCase<InMemoryRefreshTokenStore> {
        RefreshUseCase::new(self.sessions.clone(), self.config.clone())
    }

    fn sign_out_use_case(&self) -> SignOutUseCase<InMemoryRefreshTokenStore> {
        SignOutUseCase::new(self.sessions.clone())
    }
}

/// Store whose every operation fails, for distinguishing outages from
/// revocation.
#[derive(Clone, Default)]
struct FailingStore;

impl RefreshTokenStore for FailingStore {
    async fn add(&self, _token: &str, _ttl: Duration) -> AuthResult<()> {
        Err(AuthError::StoreUnavailable)
    }

    async fn contains(&self, _token: &str) -> AuthResult<bool> {
        Err(AuthError::StoreUnavailable)
    }

    async fn remove(&self, _token: &str) -> AuthResult<()> {
        Err(AuthError::StoreUnavailable)
    }
}

// ============================================================================
// Session Lifecycle
// ============================================================================

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_activates_refresh_token() {
        let h = Harness::new();
        h.sign_up("alice", "correct horse battery").await;

        let output = h.sign_in("alice", "correct horse battery").await;

        assert!(!output.access_token.is_empty());
        assert!(h.sessions.contains(&output.refresh_token).await.unwrap());
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_is_invalid_credentials() {
        let h = Harness::new();
        h.sign_up("alice", "correct horse battery").await;

        let result = SignInUseCase::new(h.users.clone(), h.sessions.clone(), h.config.clone())
            .execute(SignInInput {
                user_name: "alice".to_string(),
                password: "wrong password here".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        // No token may leak from a failed sign-in
        assert!(h.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_unknown_user_is_invalid_credentials() {
        let h = Harness::new();

        let result = SignInUseCase::new(h.users.clone(), h.sessions.clone(), h.config.clone())
            .execute(SignInInput {
                user_name: "nobody".to_string(),
                password: "whatever password".to_string(),
            })
            .await;

        // Same error as a wrong password: no user enumeration
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_returns_new_access_token() {
        let h = Harness::new();
        h.sign_up("alice", "correct horse battery").await;
        let signed_in = h.sign_in("alice", "correct horse battery").await;

        let refreshed = h
            .refresh_use_case()
            .execute(&signed_in.refresh_token)
            .await
            .unwrap();

        assert_eq!(refreshed.user_name, "alice");
        assert!(!refreshed.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_does_not_rotate_refresh_token() {
        let h = Harness::new();
        h.sign_up("alice", "correct horse battery").await;
        let signed_in = h.sign_in("alice", "correct horse battery").await;

        h.refresh_use_case()
            .execute(&signed_in.refresh_token)
            .await
            .unwrap();

        // Same token stays active and refreshes again
        assert!(h.sessions.contains(&signed_in.refresh_token).await.unwrap());
        assert_eq!(h.sessions.len(), 1);

        h.refresh_use_case()
            .execute(&signed_in.refresh_token)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_sign_out_revokes_refresh_token() {
        let h = Harness::new();
        h.sign_up("alice", "correct horse battery").await;
        let signed_in = h.sign_in("alice", "correct horse battery").await;

        h.sign_out_use_case()
            .execute(&signed_in.refresh_token)
            .await
            .unwrap();

        assert!(!h.sessions.contains(&signed_in.refresh_token).await.unwrap());

        let result = h.refresh_use_case().execute(&signed_in.refresh_token).await;
        assert!(matches!(result, Err(AuthError::TokenRevoked)));
    }

    #[tokio::test]
    async fn test_sign_out_is_idempotent() {
        let h = Harness::new();
        h.sign_up("alice", "correct horse battery").await;
        let signed_in = h.sign_in("alice", "correct horse battery").await;

        let use_case = h.sign_out_use_case();
        use_case.execute(&signed_in.refresh_token).await.unwrap();
        use_case.execute(&signed_in.refresh_token).await.unwrap();
        use_case.execute("never-issued").await.unwrap();
        use_case.execute("").await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_sessions_revoke_independently() {
        let h = Harness::new();
        h.sign_up("alice", "correct horse battery").await;

        let first = h.sign_in("alice", "correct horse battery").await;
        let second = h.sign_in("alice", "correct horse battery").await;
        assert_ne!(first.refresh_token, second.refresh_token);

        h.sign_out_use_case()
            .execute(&first.refresh_token)
            .await
            .unwrap();

        assert!(matches!(
            h.refresh_use_case().execute(&first.refresh_token).await,
            Err(AuthError::TokenRevoked)
        ));
        h.refresh_use_case()
            .execute(&second.refresh_token)
            .await
            .unwrap();
    }
}

// ============================================================================
// Refresh Failure Modes
// ============================================================================

#[cfg(test)]
mod refresh_failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token() {
        let h = Harness::new();
        let result = h.refresh_use_case().execute("").await;
        assert!(matches!(result, Err(AuthError::TokenMissing)));
    }

    #[tokio::test]
    async fn test_never_issued_token_is_revoked() {
        let h = Harness::new();
        let result = h.refresh_use_case().execute("never-issued").await;
        assert!(matches!(result, Err(AuthError::TokenRevoked)));
    }

    #[tokio::test]
    async fn test_forged_token_in_active_set_is_invalid() {
        let h = Harness::new();

        // Signed with an attacker's secret, then smuggled into the set;
        // membership passes but the signature check catches it.
        let forged = platform::jwt::sign("alice", b"attacker secret", Duration::from_secs(60))
            .unwrap();
        h.sessions
            .add(&forged, Duration::from_secs(60))
            .await
            .unwrap();

        let result = h.refresh_use_case().execute(&forged).await;
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_expired_token_in_active_set_is_invalid() {
        let h = Harness::new();

        let expired = platform::jwt::sign(
            "alice",
            &h.config.refresh_token_secret,
            Duration::ZERO,
        )
        .unwrap();
        h.sessions
            .add(&expired, Duration::from_secs(60))
            .await
            .unwrap();

        let result = h.refresh_use_case().execute(&expired).await;
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_revocation_reported_before_signature() {
        let h = Harness::new();

        // A token that is both revoked AND forged reports revocation:
        // membership is checked first.
        let forged = platform::jwt::sign("alice", b"attacker secret", Duration::from_secs(60))
            .unwrap();

        let result = h.refresh_use_case().execute(&forged).await;
        assert!(matches!(result, Err(AuthError::TokenRevoked)));
    }

    #[tokio::test]
    async fn test_store_outage_is_not_revocation() {
        let config = Arc::new(AuthConfig::development());
        let use_case = RefreshUseCase::new(Arc::new(FailingStore), config.clone());

        let token = platform::jwt::sign(
            "alice",
            &config.refresh_token_secret,
            Duration::from_secs(60),
        )
        .unwrap();

        let result = use_case.execute(&token).await;
        assert!(matches!(result, Err(AuthError::StoreUnavailable)));
    }

    #[tokio::test]
    async fn test_store_outage_fails_sign_in() {
        let users = Arc::new(InMemoryUserRepository::new());
        let config = Arc::new(AuthConfig::development());

        SignUpUseCase::new(users.clone(), config.clone())
            .execute(SignUpInput {
                user_name: "alice".to_string(),
                password: "correct horse battery".to_string(),
            })
            .await
            .unwrap();

        // Token activation is part of issuing; if the store is down the
        // sign-in must not hand out a refresh token.
        let result = SignInUseCase::new(users, Arc::new(FailingStore), config)
            .execute(SignInInput {
                user_name: "alice".to_string(),
                password: "correct horse battery".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::StoreUnavailable)));
    }
}

// ============================================================================
// HTTP Surface
// ============================================================================

#[cfg(test)]
mod http_tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::{Router, middleware};
    use tower::ServiceExt;

    use crate::presentation::middleware::{AuthMiddlewareState, require_auth};
    use crate::presentation::router::auth_router_generic;

    fn app() -> (Router, Arc<InMemoryRefreshTokenStore>) {
        let sessions = Arc::new(InMemoryRefreshTokenStore::new());
        let config = AuthConfig::development();
        let router = auth_router_generic(
            InMemoryUserRepository::new(),
            (*sessions).clone(),
            config,
        );
        (router, sessions)
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn cookie_request(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    /// Pull the `name=value` pair out of a Set-Cookie header
    fn cookie_pair<'a>(set_cookie: &'a str) -> &'a str {
        set_cookie.split(';').next().unwrap_or_default().trim()
    }

    async fn sign_up_and_in(router: &Router) -> (String, String) {
        let response = router
            .clone()
            .oneshot(json_request(
                "/signup",
                serde_json::json!({"userName": "alice", "password": "correct horse battery"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(json_request(
                "/signin",
                serde_json::json!({"userName": "alice", "password": "correct horse battery"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2, "expected access and refresh cookies");

        let access = cookies
            .iter()
            .find(|c| c.starts_with("access_token="))
            .unwrap();
        let refresh = cookies
            .iter()
            .find(|c| c.starts_with("refresh_token="))
            .unwrap();

        assert!(access.contains("HttpOnly"));
        assert!(refresh.contains("HttpOnly"));
        assert!(refresh.contains("SameSite=Strict"));

        (
            cookie_pair(access).to_string(),
            cookie_pair(refresh).to_string(),
        )
    }

    #[tokio::test]
    async fn test_cookie_session_flow() {
        let (router, _) = app();
        let (_, refresh_cookie) = sign_up_and_in(&router).await;

        // Refresh: 204 with a fresh access cookie
        let response = router
            .clone()
            .oneshot(cookie_request("/refresh", &refresh_cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let new_access = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(new_access.starts_with("access_token="));

        // Sign out: 204, both cookies cleared
        let response = router
            .clone()
            .oneshot(cookie_request("/signout", &refresh_cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cleared: Vec<&str> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cleared.len(), 2);
        assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));

        // Refresh after sign-out: revoked
        let response = router
            .oneshot(cookie_request("/refresh", &refresh_cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_refresh_without_cookie_is_unauthorized() {
        let (router, _) = app();

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signup_duplicate_name_conflicts() {
        let (router, _) = app();

        let body = serde_json::json!({"userName": "alice", "password": "correct horse battery"});
        let response = router
            .clone()
            .oneshot(json_request("/signup", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(json_request("/signup", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_status_reflects_access_cookie() {
        let (router, _) = app();
        let (access_cookie, _) = sign_up_and_in(&router).await;

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .header(header::COOKIE, &access_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let status: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(status["authenticated"], true);
        assert_eq!(status["userName"], "alice");

        let response = router
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let status: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(status["authenticated"], false);
    }

    #[tokio::test]
    async fn test_protected_route_requires_access_token() {
        let config = Arc::new(AuthConfig::development());
        let mw_state = AuthMiddlewareState {
            config: config.clone(),
        };

        async fn orders() -> &'static str {
            "orders"
        }

        let protected = Router::new()
            .route("/orders", axum::routing::get(orders))
            .layer(middleware::from_fn_with_state(mw_state, require_auth));

        // No cookie: never authenticated
        let response = protected
            .clone()
            .oneshot(Request::builder().uri("/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Garbage token: claim rejected
        let response = protected
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/orders")
                    .header(header::COOKIE, "access_token=not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Valid access token
        let token = platform::jwt::sign("alice", &config.access_token_secret, config.access_token_ttl)
            .unwrap();
        let response = protected
            .oneshot(
                Request::builder()
                    .uri("/orders")
                    .header(header::COOKIE, format!("access_token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
