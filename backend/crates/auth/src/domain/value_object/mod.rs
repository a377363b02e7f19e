//! Value Objects

pub mod user_id;
pub mod user_name;
pub mod user_role;

pub use user_id::UserId;
pub use user_name::{UserName, UserNameError};
pub use user_role::UserRole;
