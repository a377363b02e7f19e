//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Signed token primitives (HS256 JWT)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie management

pub mod cookie;
pub mod jwt;
pub mod password;
