use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenPurpose;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password hashing and token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Everything needed to build an [`Authenticator`] at startup.
#[derive(Debug, Clone)]
pub struct AuthenticatorSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// `None` keeps argon2's recommended parameters.
    pub password_cost: Option<PasswordCost>,
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Input for minting a token.
#[derive(Debug, Clone)]
pub struct TokenRequest<'a> {
    pub subject: &'a str,
    pub email: &'a str,
    pub role: Option<&'a str>,
    pub purpose: TokenPurpose,
    pub issued_at: DateTime<Utc>,
    pub lifetime: Duration,
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// Intended to run once at process start so a missing secret aborts
    /// initialization instead of surfacing on the first login.
    ///
    /// # Errors
    /// * `JwtError(MissingSecret)` - Secret is empty or whitespace
    /// * `PasswordError(InvalidParameters)` - Cost parameters rejected by argon2
    pub fn new(settings: AuthenticatorSettings) -> Result<Self, AuthenticationError> {
        if settings.secret.trim().is_empty() {
            return Err(JwtError::MissingSecret.into());
        }

        let password_hasher = match settings.password_cost {
            Some(cost) => {
                PasswordHasher::with_params(cost.memory_kib, cost.iterations, cost.parallelism)?
            }
            None => PasswordHasher::new(),
        };

        let jwt_handler = JwtHandler::new(
            settings.secret.as_bytes(),
            settings.issuer,
            settings.audience,
        )?;

        Ok(Self {
            password_hasher,
            jwt_handler,
        })
    }

    /// Hasher handle, cloneable into blocking tasks.
    pub fn password_hasher(&self) -> &PasswordHasher {
        &self.password_hasher
    }

    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Mint a token for an already verified identity.
    ///
    /// Issuer and audience come from this authenticator's configuration.
    pub fn issue(&self, request: &TokenRequest<'_>) -> Result<IssuedToken, JwtError> {
        let expires_at = request.issued_at + request.lifetime;

        let claims = Claims {
            sub: request.subject.to_string(),
            email: request.email.to_string(),
            role: request.role.map(str::to_string),
            purpose: request.purpose,
            iss: self.jwt_handler.issuer().to_string(),
            aud: self.jwt_handler.audience().to_string(),
            iat: request.issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = self.jwt_handler.encode(&claims)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a token and require it was minted for `expected`.
    ///
    /// # Errors
    /// * Any decode error from [`JwtHandler::decode`]
    /// * `PurposeMismatch` - Token is genuine but meant for something else
    pub fn validate_token(
        &self,
        token: &str,
        expected: TokenPurpose,
        now: DateTime<Utc>,
        leeway_seconds: u64,
    ) -> Result<Claims, JwtError> {
        let claims = self
            .jwt_handler
            .decode(token, now.timestamp(), leeway_seconds)?;

        if claims.purpose != expected {
            return Err(JwtError::PurposeMismatch {
                expected,
                actual: claims.purpose,
            });
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(AuthenticatorSettings {
            secret: "test_secret_key_at_least_32_bytes!".to_string(),
            issuer: "learning-platform".to_string(),
            audience: "learning-platform-clients".to_string(),
            password_cost: Some(PasswordCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            }),
        })
        .expect("valid settings")
    }

    fn request(purpose: TokenPurpose, issued_at: DateTime<Utc>) -> TokenRequest<'static> {
        TokenRequest {
            subject: "user123",
            email: "a@x.com",
            role: match purpose {
                TokenPurpose::Access => Some("Student"),
                TokenPurpose::PasswordReset => None,
            },
            purpose,
            issued_at,
            lifetime: Duration::minutes(30),
        }
    }

    #[test]
    fn test_new_rejects_blank_secret() {
        let result = Authenticator::new(AuthenticatorSettings {
            secret: "   ".to_string(),
            issuer: "iss".to_string(),
            audience: "aud".to_string(),
            password_cost: None,
        });

        assert!(matches!(
            result,
            Err(AuthenticationError::JwtError(JwtError::MissingSecret))
        ));
    }

    #[test]
    fn test_issue_then_validate() {
        let authenticator = authenticator();
        let now = Utc::now();

        let issued = authenticator
            .issue(&request(TokenPurpose::Access, now))
            .expect("Token issue failed");

        assert_eq!(issued.expires_at.timestamp(), now.timestamp() + 30 * 60);

        let claims = authenticator
            .validate_token(&issued.token, TokenPurpose::Access, now, 0)
            .expect("Token validation failed");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.role.as_deref(), Some("Student"));
        assert_eq!(claims.iss, "learning-platform");
        assert_eq!(claims.aud, "learning-platform-clients");
    }

    #[test]
    fn test_hash_password_uses_configured_hasher() {
        let authenticator = authenticator();

        let hash = authenticator.hash_password("p").expect("hash");

        assert!(authenticator.password_hasher().verify("p", &hash).unwrap());
        assert!(!authenticator.password_hasher().verify("q", &hash).unwrap());
    }

    #[test]
    fn test_validate_rejects_other_purpose() {
        let authenticator = authenticator();
        let now = Utc::now();
        let issued = authenticator
            .issue(&request(TokenPurpose::PasswordReset, now))
            .unwrap();

        let result = authenticator.validate_token(&issued.token, TokenPurpose::Access, now, 0);

        assert_eq!(
            result,
            Err(JwtError::PurposeMismatch {
                expected: TokenPurpose::Access,
                actual: TokenPurpose::PasswordReset,
            })
        );
    }

    #[test]
    fn test_validate_after_lifetime_is_expired() {
        let authenticator = authenticator();
        let issued_at = Utc::now();
        let issued = authenticator
            .issue(&request(TokenPurpose::Access, issued_at))
            .unwrap();

        let later = issued_at + Duration::minutes(31);
        let result = authenticator.validate_token(&issued.token, TokenPurpose::Access, later, 0);

        assert_eq!(result, Err(JwtError::Expired));
    }
}
