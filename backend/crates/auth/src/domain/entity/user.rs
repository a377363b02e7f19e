//! User Entity
//!
//! One entity carries both profile and credential hash; the lifecycle in
//! this system never mutates the two separately.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{user_id::UserId, user_name::UserName, user_role::UserRole};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// User name (unique; its canonical form is the token subject)
    pub user_name: UserName,
    /// Role (Customer, Admin)
    pub user_role: UserRole,
    /// Argon2id password hash (PHC format)
    pub password_hash: HashedPassword,
    /// Last successful sign-in time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the default role
    pub fn new(user_name: UserName, password_hash: HashedPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            user_name,
            user_role: UserRole::default(),
            password_hash,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful sign-in
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Update user role
    pub fn set_role(&mut self, role: UserRole) {
        self.user_role = role;
        self.updated_at = Utc::now();
    }
}
