//! Token Issuer
//!
//! Mints and verifies the two session credentials. Access tokens are a
//! pure function of config + identity; refresh tokens are minted AND
//! activated in one step (see [`TokenIssuer::issue_refresh_token`]).

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::RefreshTokenStore;
use crate::error::AuthResult;

/// Issues and verifies access/refresh tokens
pub struct TokenIssuer {
    config: Arc<AuthConfig>,
}

impl TokenIssuer {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Mint a short-lived access token for an identity
    ///
    /// No side effects; validity is decided by signature and expiry alone,
    /// so these can never be revoked before natural expiry.
    pub fn issue_access_token(&self, identity: &str) -> AuthResult<String> {
        let token = platform::jwt::sign(
            identity,
            &self.config.access_token_secret,
            self.config.access_token_ttl,
        )?;
        Ok(token)
    }

    /// Mint a long-lived refresh token and register it in the active set
    ///
    /// Minting and activation are deliberately one operation: a refresh
    /// token that exists but was never added to the store would be dead on
    /// arrival. The store write is part of this method's contract; if it
    /// fails the token is not returned.
    pub async fn issue_refresh_token<S>(&self, identity: &str, store: &S) -> AuthResult<String>
    where
        S: RefreshTokenStore + Sync,
    {
        let token = platform::jwt::sign(
            identity,
            &self.config.refresh_token_secret,
            self.config.refresh_token_ttl,
        )?;

        store.add(&token, self.config.refresh_token_ttl).await?;

        Ok(token)
    }

    /// Verify an access token and return its identity
    pub fn verify_access_token(&self, token: &str) -> AuthResult<String> {
        let identity = platform::jwt::verify(token, &self.config.access_token_secret)?;
        Ok(identity)
    }

    /// Verify a refresh token's signature and expiry
    ///
    /// Membership in the active set is a separate check owned by the
    /// refresh use case; this only answers the cryptographic question.
    pub fn verify_refresh_token(&self, token: &str) -> AuthResult<String> {
        let identity = platform::jwt::verify(token, &self.config.refresh_token_secret)?;
        Ok(identity)
    }
}
