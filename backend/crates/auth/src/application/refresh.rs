//! Refresh Use Case
//!
//! Exchanges a live refresh token for a new access token. Three checks
//! must all pass: the token is present, it is a member of the active
//! set, and it verifies against the refresh secret. The refresh token
//! itself is not rotated; it stays valid until sign-out or expiry.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::tokens::TokenIssuer;
use crate::domain::repository::RefreshTokenStore;
use crate::error::{AuthError, AuthResult};

/// Refresh output
pub struct RefreshOutput {
    pub user_name: String,
    pub access_token: String,
}

/// Refresh use case
pub struct RefreshUseCase<S>
where
    S: RefreshTokenStore,
{
    token_store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> RefreshUseCase<S>
where
    S: RefreshTokenStore + Sync,
{
    pub fn new(token_store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            token_store,
            config,
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<RefreshOutput> {
        if refresh_token.is_empty() {
            return Err(AuthError::TokenMissing);
        }

        // Membership before signature: a revoked token reports TokenRevoked
        // even when it would also fail verification. A store failure here
        // propagates as StoreUnavailable and is never read as revocation.
        if !self.token_store.contains(refresh_token).await? {
            return Err(AuthError::TokenRevoked);
        }

        let issuer = TokenIssuer::new(self.config.clone());
        let identity = issuer.verify_refresh_token(refresh_token)?;

        let access_token = issuer.issue_access_token(&identity)?;

        tracing::debug!(user_name = %identity, "Access token refreshed");

        Ok(RefreshOutput {
            user_name: identity,
            access_token,
        })
    }
}
