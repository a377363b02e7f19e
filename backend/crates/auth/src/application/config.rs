//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
///
/// Two independent secrets keep access and refresh tokens from ever
/// verifying interchangeably.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access token signing secret (32 bytes)
    pub access_token_secret: [u8; 32],
    /// Refresh token signing secret (32 bytes)
    pub refresh_token_secret: [u8; 32],
    /// Access token TTL (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token TTL (30 days)
    pub refresh_token_ttl: Duration,
    /// Access token cookie name
    pub access_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: [0u8; 32],
            refresh_token_secret: [0u8; 32],
            access_token_ttl: Duration::from_secs(15 * 60), // 15 minutes
            refresh_token_ttl: Duration::from_secs(30 * 24 * 3600), // 30 days
            access_cookie_name: "access_token".to_string(),
            refresh_cookie_name: "refresh_token".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with random secrets (for development)
    pub fn with_random_secrets() -> Self {
        use rand::RngCore;
        let mut access = [0u8; 32];
        let mut refresh = [0u8; 32];
        rand::rng().fill_bytes(&mut access);
        rand::rng().fill_bytes(&mut refresh);
        Self {
            access_token_secret: access,
            refresh_token_secret: refresh,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Cookie configuration for the access token
    pub fn access_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.access_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.access_token_ttl.as_secs() as i64),
        }
    }

    /// Cookie configuration for the refresh token
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.refresh_token_ttl.as_secs() as i64),
        }
    }
}
