use async_trait::async_trait;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::AuthSession;
use crate::domain::access::models::LoginCommand;
use crate::domain::access::models::Principal;
use crate::domain::access::models::RegisterCommand;
use crate::domain::access::models::ResetPasswordCommand;

/// Port for the authentication flows.
#[async_trait]
pub trait AccessServicePort: Send + Sync + 'static {
    /// Exchange credentials for an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AccessError>;

    /// Create an Instructor or Student account and sign it in.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `InvalidArgument` - Role is Admin
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AccessError>;

    /// Send a reset link if, and only if, the email is registered. Callers
    /// answer identically either way.
    ///
    /// # Errors
    /// * `Internal` - Credential store unavailable
    async fn forgot_password(&self, email: &str) -> Result<(), AccessError>;

    /// # Errors
    /// * `InvalidResetToken` - Token invalid, expired, of the wrong kind, or
    ///   for an identity that no longer exists
    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AccessError>;

    /// Validate a bearer access token.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token is not a currently valid access token
    fn authenticate(&self, token: &str) -> Result<Principal, AccessError>;
}
