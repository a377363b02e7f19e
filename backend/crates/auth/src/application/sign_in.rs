//! Sign In Use Case
//!
//! Authenticates a user and establishes a session: one access token and
//! one refresh token, the latter registered in the active refresh set.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::tokens::TokenIssuer;
use crate::domain::repository::{RefreshTokenStore, UserRepository};
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

/// Sign in output
///
/// Both tokens are handed back to the transport for cookie-setting.
pub struct SignInOutput {
    pub user_name: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Sign in use case
pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: RefreshTokenStore,
{
    user_repo: Arc<U>,
    token_store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> SignInUseCase<U, S>
where
    U: UserRepository,
    S: RefreshTokenStore + Sync,
{
    pub fn new(user_repo: Arc<U>, token_store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            token_store,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // Every pre-verification failure collapses into InvalidCredentials:
        // the caller must not learn whether the account exists.
        let user_name =
            UserName::new(&input.user_name).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let password_valid = user.password_hash.verify(&password, self.config.pepper())?;
        if !password_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let issuer = TokenIssuer::new(self.config.clone());
        let identity = user.user_name.canonical();

        let access_token = issuer.issue_access_token(identity)?;
        let refresh_token = issuer
            .issue_refresh_token(identity, self.token_store.as_ref())
            .await?;

        let mut user = user;
        user.record_login();
        self.user_repo.update(&user).await?;

        tracing::info!(user_name = %user.user_name, "User signed in");

        Ok(SignInOutput {
            user_name: user.user_name.original().to_string(),
            access_token,
            refresh_token,
        })
    }
}
