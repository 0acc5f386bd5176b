//! Authentication utilities library
//!
//! Reusable authentication infrastructure for the learning platform services:
//! - Password hashing (Argon2id, adjustable cost)
//! - Signed token encoding and validation (HS256 JWT with issuer, audience,
//!   expiry and purpose checks)
//! - Authentication coordination
//!
//! Roles, policies and identity storage belong to the services; this crate
//! only knows about strings and timestamps.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_params(1024, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Issuing and validating tokens
//! ```
//! use auth::{Authenticator, AuthenticatorSettings, TokenPurpose, TokenRequest};
//! use chrono::{Duration, Utc};
//!
//! let auth = Authenticator::new(AuthenticatorSettings {
//!     secret: "secret_key_at_least_32_bytes_long!".to_string(),
//!     issuer: "learning-platform".to_string(),
//!     audience: "learning-platform-clients".to_string(),
//!     password_cost: None,
//! })
//! .unwrap();
//!
//! let now = Utc::now();
//! let issued = auth
//!     .issue(&TokenRequest {
//!         subject: "user123",
//!         email: "a@x.com",
//!         role: Some("Student"),
//!         purpose: TokenPurpose::Access,
//!         issued_at: now,
//!         lifetime: Duration::minutes(30),
//!     })
//!     .unwrap();
//!
//! let claims = auth
//!     .validate_token(&issued.token, TokenPurpose::Access, now, 0)
//!     .unwrap();
//! assert_eq!(claims.role.as_deref(), Some("Student"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::AuthenticatorSettings;
pub use authenticator::IssuedToken;
pub use authenticator::PasswordCost;
pub use authenticator::TokenRequest;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenPurpose;
pub use password::PasswordError;
pub use password::PasswordHasher;
