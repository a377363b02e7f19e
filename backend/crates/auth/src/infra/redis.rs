//! Redis-backed active refresh token set
//!
//! One key per active token, with the key TTL matching the token's own
//! lifetime so expired tokens leave the set without a sweeper. The set is
//! shared by every API instance pointed at the same Redis.

use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::repository::RefreshTokenStore;
use crate::error::{AuthError, AuthResult};

/// Key prefix for active refresh tokens
const KEY_PREFIX: &str = "auth:refresh:";

/// Upper bound for a single store operation
const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis implementation of the refresh token store
#[derive(Clone)]
pub struct RedisRefreshTokenStore {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisRefreshTokenStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    pub fn with_op_timeout(conn: ConnectionManager, op_timeout: Duration) -> Self {
        Self { conn, op_timeout }
    }

    fn key(token: &str) -> String {
        format!("{KEY_PREFIX}{token}")
    }

    /// Run a store operation under the configured deadline.
    ///
    /// A slow or unreachable Redis surfaces as `StoreUnavailable`, never as
    /// a hung request or a silent "token not found".
    async fn bounded<T, F>(&self, op_name: &'static str, fut: F) -> AuthResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                tracing::warn!(operation = op_name, error = %err, "Refresh token store error");
                Err(AuthError::StoreUnavailable)
            }
            Err(_) => {
                tracing::warn!(
                    operation = op_name,
                    timeout_ms = self.op_timeout.as_millis() as u64,
                    "Refresh token store operation timed out"
                );
                Err(AuthError::StoreUnavailable)
            }
        }
    }
}

impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn add(&self, token: &str, ttl: Duration) -> AuthResult<()> {
        let key = Self::key(token);
        // SET EX rejects a zero expiry; clamp so a degenerate TTL still
        // stores a token that immediately expires rather than erroring.
        let ttl_secs = ttl.as_secs().max(1);
        let mut conn = self.conn.clone();

        self.bounded("add", async move {
            conn.set_ex::<_, _, ()>(key, 1u8, ttl_secs).await
        })
        .await
    }

    async fn contains(&self, token: &str) -> AuthResult<bool> {
        let key = Self::key(token);
        let mut conn = self.conn.clone();

        self.bounded("contains", async move { conn.exists::<_, bool>(key).await })
            .await
    }

    async fn remove(&self, token: &str) -> AuthResult<()> {
        let key = Self::key(token);
        let mut conn = self.conn.clone();

        // DEL of a missing key is a no-op, which gives us idempotent revocation.
        self.bounded("remove", async move { conn.del::<_, ()>(key).await })
            .await
    }
}
