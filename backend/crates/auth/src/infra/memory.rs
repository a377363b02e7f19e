//! In-memory implementations of the auth repositories
//!
//! Single-process stand-ins for tests and local development. The refresh
//! token set ignores TTLs; a test that needs expiry signs a token with a
//! zero lifetime instead.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::entity::user::User;
use crate::domain::repository::{RefreshTokenStore, UserRepository};
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthError, AuthResult};

/// In-memory active refresh token set
#[derive(Debug, Clone, Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active tokens (test helper)
    pub fn len(&self) -> usize {
        self.tokens.read().map(|set| set.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn add(&self, token: &str, _ttl: Duration) -> AuthResult<()> {
        let mut set = self
            .tokens
            .write()
            .map_err(|_| AuthError::Internal("refresh token set lock poisoned".into()))?;
        set.insert(token.to_string());
        Ok(())
    }

    async fn contains(&self, token: &str) -> AuthResult<bool> {
        let set = self
            .tokens
            .read()
            .map_err(|_| AuthError::Internal("refresh token set lock poisoned".into()))?;
        Ok(set.contains(token))
    }

    async fn remove(&self, token: &str) -> AuthResult<()> {
        let mut set = self
            .tokens
            .write()
            .map_err(|_| AuthError::Internal("refresh token set lock poisoned".into()))?;
        set.remove(token);
        Ok(())
    }
}

/// In-memory user repository keyed by canonical user name
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut map = self
            .users
            .write()
            .map_err(|_| AuthError::Internal("user map lock poisoned".into()))?;
        let key = user.user_name.canonical().to_string();
        if map.contains_key(&key) {
            return Err(AuthError::UserNameTaken);
        }
        map.insert(key, user.clone());
        Ok(())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let map = self
            .users
            .read()
            .map_err(|_| AuthError::Internal("user map lock poisoned".into()))?;
        Ok(map.get(user_name.canonical()).cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let map = self
            .users
            .read()
            .map_err(|_| AuthError::Internal("user map lock poisoned".into()))?;
        Ok(map.contains_key(user_name.canonical()))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut map = self
            .users
            .write()
            .map_err(|_| AuthError::Internal("user map lock poisoned".into()))?;
        map.insert(user.user_name.canonical().to_string(), user.clone());
        Ok(())
    }
}
