//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use std::time::Duration;

use crate::domain::entity::user::User;
use crate::domain::value_object::user_name::UserName;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by canonical user name
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Check if user name exists
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Active refresh token set
///
/// The one piece of mutable server-side session state. A refresh token
/// authorizes a refresh only while its exact string is a member of this
/// set; removing it revokes the session even though the token itself
/// stays cryptographically valid until expiry.
///
/// Contract:
/// - `add` and `remove` are atomic with respect to concurrent `contains`
/// - `remove` of an absent token succeeds (idempotent)
/// - every call completes in bounded time; a timeout or connectivity
///   failure surfaces as `AuthError::StoreUnavailable`, never as a
///   fabricated membership verdict
/// - the store must be shared across server instances
#[trait_variant::make(RefreshTokenStore: Send)]
pub trait LocalRefreshTokenStore {
    /// Register a token in the active set
    ///
    /// `ttl` bounds how long the entry is retained; it matches the token's
    /// own lifetime so revocation state expires together with the token.
    async fn add(&self, token: &str, ttl: Duration) -> AuthResult<()>;

    /// Check whether a token is currently honored
    async fn contains(&self, token: &str) -> AuthResult<bool>;

    /// Remove a token from the active set (revocation)
    async fn remove(&self, token: &str) -> AuthResult<()>;
}
