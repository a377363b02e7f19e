//! Check Session Use Case
//!
//! Verifies an access token without touching any backend. Stateless:
//! signature and expiry are the only checks, so revocation is not
//! visible here until the access token expires.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::tokens::TokenIssuer;
use crate::error::{AuthError, AuthResult};

/// Session info derived from a valid access token
#[derive(Debug, Clone)]
pub struct SessionInfoOutput {
    pub user_name: String,
}

/// Check session use case
pub struct CheckSessionUseCase {
    token_issuer: TokenIssuer,
}

impl CheckSessionUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            token_issuer: TokenIssuer::new(config),
        }
    }

    /// Returns session info when the access token is present and valid.
    ///
    /// - Missing token: `Unauthenticated` (the caller never presented one)
    /// - Invalid or expired token: `Forbidden` (presented but rejected)
    pub fn execute(&self, access_token: &str) -> AuthResult<SessionInfoOutput> {
        if access_token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        let user_name = self
            .token_issuer
            .verify_access_token(access_token)
            .map_err(|_| AuthError::Forbidden)?;

        Ok(SessionInfoOutput { user_name })
    }

    /// Convenience predicate for status endpoints.
    pub fn is_valid(&self, access_token: &str) -> bool {
        self.execute(access_token).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn use_case() -> (CheckSessionUseCase, TokenIssuer) {
        let config = Arc::new(AuthConfig::development());
        let issuer = TokenIssuer::new(Arc::clone(&config));
        (CheckSessionUseCase::new(config), issuer)
    }

    #[test]
    fn test_valid_access_token() {
        let (use_case, issuer) = use_case();
        let token = issuer.issue_access_token("alice").unwrap();

        let info = use_case.execute(&token).unwrap();
        assert_eq!(info.user_name, "alice");
        assert!(use_case.is_valid(&token));
    }

    #[test]
    fn test_missing_token_is_unauthenticated() {
        let (use_case, _) = use_case();
        assert!(matches!(
            use_case.execute(""),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn test_garbage_token_is_forbidden() {
        let (use_case, _) = use_case();
        assert!(matches!(
            use_case.execute("not-a-jwt"),
            Err(AuthError::Forbidden)
        ));
        assert!(!use_case.is_valid("not-a-jwt"));
    }

    #[test]
    fn test_refresh_token_rejected_as_access_token() {
        let config = Arc::new(AuthConfig::development());
        let use_case = CheckSessionUseCase::new(Arc::clone(&config));
        // Refresh tokens are signed with a different secret.
        let refresh = platform::jwt::sign(
            "alice",
            &config.refresh_token_secret,
            config.refresh_token_ttl,
        )
        .unwrap();
        assert!(matches!(
            use_case.execute(&refresh),
            Err(AuthError::Forbidden)
        ));
    }
}
