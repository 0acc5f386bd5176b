use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// What a token is allowed to be used for.
///
/// Access and reset tokens share one signing key, so the purpose is carried
/// as a signed claim and checked on every decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// Session bearer credential for policy-gated requests.
    Access,
    /// One-hour capability to set a new password.
    PasswordReset,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "access",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed claim set.
///
/// `sub`, `iss`, `aud`, `iat` and `exp` are the RFC 7519 registered claims;
/// `email`, `role` and `purpose` are private claims. Reset tokens carry no
/// `role`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity identifier)
    pub sub: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    pub purpose: TokenPurpose,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Check whether the token is past its expiry.
    ///
    /// A token is live while `now < exp + leeway_seconds`.
    pub fn is_expired(&self, current_timestamp: i64, leeway_seconds: u64) -> bool {
        let deadline = self.exp.saturating_add(leeway_seconds as i64);
        current_timestamp >= deadline
    }
}
