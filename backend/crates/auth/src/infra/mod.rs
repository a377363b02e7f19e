//! Infrastructure layer: repository implementations

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::{InMemoryRefreshTokenStore, InMemoryUserRepository};
pub use postgres::PgUserRepository;
pub use redis::RedisRefreshTokenStore;
