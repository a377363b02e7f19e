//! User Name Value Object
//!
//! The user name doubles as the login identifier and the subject identity
//! carried inside session tokens, so its canonical form must be stable:
//! NFKC normalization, then validation, then lowercasing.
//!
//! ## Invariants
//! - Length: 3..=30 characters (after normalization)
//! - Charset: ASCII alphanumerics plus `_ . -`
//! - First and last character: alphanumeric or `_`
//! - No consecutive dots, at least one alphanumeric, no whitespace

use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

/// Allowed special characters in user name
const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Names that would collide with routes or operational accounts
const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "support",
    "api",
    "auth",
    "signin",
    "signout",
    "signup",
    "refresh",
    "status",
    "user",
    "users",
    "account",
    "me",
    "self",
    "anonymous",
    "guest",
];

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name cannot be empty")]
    Empty,

    #[error("User name must be at least {min} characters (got {length})")]
    TooShort { length: usize, min: usize },

    #[error("User name must be at most {max} characters (got {length})")]
    TooLong { length: usize, max: usize },

    #[error("User name contains invalid character '{char}' at position {position}")]
    InvalidCharacter { char: char, position: usize },

    #[error("User name must start with a letter, digit or '_' (got '{char}')")]
    InvalidStart { char: char },

    #[error("User name must end with a letter, digit or '_' (got '{char}')")]
    InvalidEnd { char: char },

    #[error("User name must contain at least one letter or digit")]
    NoAlphanumeric,

    #[error("User name cannot contain consecutive dots")]
    ConsecutiveDots,

    #[error("User name is reserved")]
    Reserved,
}

/// Validated user name
///
/// Keeps the original casing for display and the lowercase canonical
/// form for lookups and token subjects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    /// Validate and construct a user name
    ///
    /// Processing order: NFKC normalize, validate, lowercase.
    pub fn new(raw: &str) -> Result<Self, UserNameError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = normalized.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        let mut has_alphanumeric = false;
        for (position, ch) in normalized.chars().enumerate() {
            if ch.is_ascii_alphanumeric() {
                has_alphanumeric = true;
            } else if !ALLOWED_SPECIAL_CHARS.contains(&ch) {
                return Err(UserNameError::InvalidCharacter { char: ch, position });
            }
        }
        if !has_alphanumeric {
            return Err(UserNameError::NoAlphanumeric);
        }

        // length >= 3 is already established
        let first = normalized.chars().next().ok_or(UserNameError::Empty)?;
        if !(first.is_ascii_alphanumeric() || first == '_') {
            return Err(UserNameError::InvalidStart { char: first });
        }
        let last = normalized.chars().last().ok_or(UserNameError::Empty)?;
        if !(last.is_ascii_alphanumeric() || last == '_') {
            return Err(UserNameError::InvalidEnd { char: last });
        }

        if normalized.contains("..") {
            return Err(UserNameError::ConsecutiveDots);
        }

        let canonical = normalized.to_ascii_lowercase();

        if RESERVED_WORDS.contains(&canonical.as_str()) {
            return Err(UserNameError::Reserved);
        }

        Ok(Self {
            original: normalized,
            canonical,
        })
    }

    /// Original (display) form
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Canonical lowercase form; the token subject and lookup key
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
