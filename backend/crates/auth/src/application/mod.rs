//! Application layer: session lifecycle use cases

pub mod check_session;
pub mod config;
pub mod refresh;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod tokens;

pub use check_session::{CheckSessionUseCase, SessionInfoOutput};
pub use config::AuthConfig;
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use tokens::TokenIssuer;
