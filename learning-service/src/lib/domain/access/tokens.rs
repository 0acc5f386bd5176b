use std::sync::Arc;

use auth::Authenticator;
use auth::IssuedToken;
use auth::JwtError;
use auth::TokenPurpose;
use auth::TokenRequest;
use chrono::Duration;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::Principal;
use crate::domain::access::models::ResetGrant;
use crate::domain::clock::Clock;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;

/// Reset links are valid for one hour regardless of configuration.
pub const RESET_TOKEN_LIFETIME_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy)]
pub struct TokenSettings {
    pub access_token_lifetime: Duration,
    /// Clock skew tolerated on access tokens. Reset tokens get none.
    pub access_leeway_seconds: u64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            access_token_lifetime: Duration::minutes(30),
            access_leeway_seconds: 0,
        }
    }
}

/// Mints and checks the two kinds of token the platform uses.
///
/// Access tokens carry the role; reset tokens never do, and each kind is
/// refused where the other is expected.
pub struct TokenIssuer {
    authenticator: Arc<Authenticator>,
    clock: Arc<dyn Clock>,
    settings: TokenSettings,
}

impl TokenIssuer {
    pub fn new(
        authenticator: Arc<Authenticator>,
        clock: Arc<dyn Clock>,
        settings: TokenSettings,
    ) -> Self {
        Self {
            authenticator,
            clock,
            settings,
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn issue_access_token(&self, identity: &Identity) -> Result<IssuedToken, JwtError> {
        let subject = identity.id.to_string();

        self.authenticator.issue(&TokenRequest {
            subject: &subject,
            email: identity.email.as_str(),
            role: Some(identity.role.as_str()),
            purpose: TokenPurpose::Access,
            issued_at: self.clock.now(),
            lifetime: self.settings.access_token_lifetime,
        })
    }

    pub fn issue_reset_token(&self, identity: &Identity) -> Result<IssuedToken, JwtError> {
        let subject = identity.id.to_string();

        self.authenticator.issue(&TokenRequest {
            subject: &subject,
            email: identity.email.as_str(),
            role: None,
            purpose: TokenPurpose::PasswordReset,
            issued_at: self.clock.now(),
            lifetime: Duration::minutes(RESET_TOKEN_LIFETIME_MINUTES),
        })
    }

    /// # Errors
    /// * `Unauthenticated` - Any signature, issuer, audience, expiry, purpose
    ///   or claim-shape failure. The precise reason is only logged.
    pub fn validate_access_token(&self, token: &str) -> Result<Principal, AccessError> {
        let claims = self
            .authenticator
            .validate_token(
                token,
                TokenPurpose::Access,
                self.clock.now(),
                self.settings.access_leeway_seconds,
            )
            .map_err(|e| {
                tracing::warn!("Rejected access token: {}", e);
                AccessError::Unauthenticated
            })?;

        let subject = IdentityId::from_string(&claims.sub).map_err(|e| {
            tracing::warn!("Access token subject is not an identity id: {}", e);
            AccessError::Unauthenticated
        })?;

        let role = claims
            .role
            .as_deref()
            .ok_or_else(|| {
                tracing::warn!("Access token for {} has no role claim", subject);
                AccessError::Unauthenticated
            })?
            .parse::<Role>()
            .map_err(|e| {
                tracing::warn!("Access token for {} has {}", subject, e);
                AccessError::Unauthenticated
            })?;

        Ok(Principal {
            subject,
            email: claims.email,
            role,
        })
    }

    /// # Errors
    /// * `InvalidResetToken` - Any validation failure, including an access
    ///   token presented in place of a reset token
    pub fn validate_reset_token(&self, token: &str) -> Result<ResetGrant, AccessError> {
        let claims = self
            .authenticator
            .validate_token(token, TokenPurpose::PasswordReset, self.clock.now(), 0)
            .map_err(|e| {
                tracing::warn!("Rejected reset token: {}", e);
                AccessError::InvalidResetToken
            })?;

        let subject = IdentityId::from_string(&claims.sub).map_err(|e| {
            tracing::warn!("Reset token subject is not an identity id: {}", e);
            AccessError::InvalidResetToken
        })?;

        Ok(ResetGrant {
            subject,
            email: claims.email,
        })
    }
}
