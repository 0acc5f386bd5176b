use url::Url;

use crate::domain::identity::models::Identity;

/// An email the platform wants delivered.
///
/// Bodies are HTML. Delivery is always best effort: callers log failures and
/// carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Greeting sent after self-registration.
    pub fn welcome(identity: &Identity) -> Self {
        Self {
            to: identity.email.as_str().to_string(),
            subject: "Welcome to the Platform".to_string(),
            body: format!(
                "Hello {},<br/>Your account has been created successfully.",
                identity.name
            ),
        }
    }

    /// Greeting for an account an administrator created, carrying the
    /// generated first password.
    pub fn welcome_with_temporary_password(identity: &Identity, temporary_password: &str) -> Self {
        Self {
            to: identity.email.as_str().to_string(),
            subject: "Welcome to the Platform".to_string(),
            body: format!(
                "Hello {},<br/>Your account has been created successfully. \
                 Your temporary password is {}. Please change it after signing in.",
                identity.name, temporary_password
            ),
        }
    }

    /// Password reset link. `reset_link` already carries the token.
    pub fn password_reset(identity: &Identity, reset_link: &Url) -> Self {
        Self {
            to: identity.email.as_str().to_string(),
            subject: "Password Reset".to_string(),
            body: format!(
                "Click <a href=\"{}\">here</a> to reset your password. \
                 This link will expire in 1 hour.",
                reset_link
            ),
        }
    }
}

/// Append `token` to the frontend reset page as a query parameter.
///
/// The token is percent-encoded by `url`.
pub fn reset_link(base: &Url, token: &str) -> Url {
    let mut link = base.clone();
    link.query_pairs_mut().append_pair("token", token);
    link
}
