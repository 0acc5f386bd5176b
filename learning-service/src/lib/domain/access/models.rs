use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::Role;

/// Caller identity recovered from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: IdentityId,
    pub email: String,
    pub role: Role,
}

/// What a validated reset token grants: a password change for this identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetGrant {
    pub subject: IdentityId,
    pub email: String,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: IdentityId,
    pub role: Role,
    pub name: String,
}

impl AuthSession {
    pub fn new(identity: &Identity, issued: auth::IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at,
            user_id: identity.id,
            role: identity.role,
            name: identity.name.as_str().to_string(),
        }
    }
}

/// Credentials as typed by the user. The email is not validated so that a
/// malformed address fails exactly like an unknown one.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Self-registration request. The role is kept as sent and checked only after
/// the email is known to be free.
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub role: String,
    pub password: String,
}

#[derive(Debug)]
pub struct ResetPasswordCommand {
    pub token: String,
    pub new_password: String,
}
