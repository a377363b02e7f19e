//! Sign Out Use Case
//!
//! Revokes a refresh token by removing it from the active set.
//! Idempotent: signing out an absent or already-revoked token succeeds.

use std::sync::Arc;

use crate::domain::repository::RefreshTokenStore;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: RefreshTokenStore,
{
    token_store: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: RefreshTokenStore + Sync,
{
    pub fn new(token_store: Arc<S>) -> Self {
        Self { token_store }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<()> {
        if refresh_token.is_empty() {
            // Nothing to revoke; still a successful sign-out
            return Ok(());
        }

        // Store failures do propagate: the caller must not be told the
        // session is revoked when we could not reach the set.
        self.token_store.remove(refresh_token).await?;

        tracing::info!("User signed out");
        Ok(())
    }
}
