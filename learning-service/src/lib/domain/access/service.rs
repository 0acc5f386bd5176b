use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::AuthSession;
use crate::domain::access::models::LoginCommand;
use crate::domain::access::models::Principal;
use crate::domain::access::models::RegisterCommand;
use crate::domain::access::models::ResetPasswordCommand;
use crate::domain::access::ports::AccessServicePort;
use crate::domain::access::tokens::TokenIssuer;
use crate::domain::identity::credentials;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;
use crate::domain::identity::notifications;
use crate::domain::identity::notifications::Notification;
use crate::identity::errors::IdentityError;
use crate::identity::ports::IdentityRepository;
use crate::identity::ports::Notifier;

/// Domain service for login, registration and password reset.
pub struct AccessService<IR, N>
where
    IR: IdentityRepository,
    N: Notifier,
{
    repository: Arc<IR>,
    notifier: Arc<N>,
    tokens: Arc<TokenIssuer>,
    reset_password_url: Url,
}

impl<IR, N> AccessService<IR, N>
where
    IR: IdentityRepository,
    N: Notifier,
{
    /// # Arguments
    /// * `repository` - Credential store
    /// * `notifier` - Outbound email delivery
    /// * `tokens` - Token issuer shared with the HTTP layer
    /// * `reset_password_url` - Frontend page the reset link points at
    pub fn new(
        repository: Arc<IR>,
        notifier: Arc<N>,
        tokens: Arc<TokenIssuer>,
        reset_password_url: Url,
    ) -> Self {
        Self {
            repository,
            notifier,
            tokens,
            reset_password_url,
        }
    }

    fn session(&self, identity: &Identity) -> Result<AuthSession, AccessError> {
        let issued = self.tokens.issue_access_token(identity)?;
        Ok(AuthSession::new(identity, issued))
    }

    async fn send_best_effort(&self, notification: Notification, identity_id: &IdentityId) {
        if let Err(e) = self.notifier.send(&notification).await {
            tracing::error!(
                "Failed to send \"{}\" notification for identity {}: {}",
                notification.subject,
                identity_id,
                e
            );
        }
    }
}

#[async_trait]
impl<IR, N> AccessServicePort for AccessService<IR, N>
where
    IR: IdentityRepository,
    N: Notifier,
{
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AccessError> {
        let hasher = self.tokens.authenticator().password_hasher();

        let Some(identity) = self.repository.find_by_email(&command.email).await? else {
            // Spend the same hashing time as a real verification.
            let _ = credentials::hash_password(hasher, command.password).await;
            tracing::info!("Login failed: unknown email");
            return Err(AccessError::InvalidCredentials);
        };

        let is_valid = credentials::verify_password(
            hasher,
            command.password,
            identity.password_hash.clone(),
        )
        .await
        .map_err(|e| {
            tracing::error!("Stored password hash for {} is unreadable: {}", identity.id, e);
            AccessError::Internal(e.to_string())
        })?;

        if !is_valid {
            tracing::info!("Login failed: wrong password for {}", identity.id);
            return Err(AccessError::InvalidCredentials);
        }

        self.session(&identity)
    }

    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AccessError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AccessError::EmailAlreadyExists);
        }

        let role = command
            .role
            .parse::<Role>()
            .ok()
            .filter(Role::is_self_assignable)
            .ok_or_else(|| {
                AccessError::InvalidArgument(
                    "Invalid role. Allowed roles are: Instructor, Student.".to_string(),
                )
            })?;

        let password_hash = credentials::hash_password(
            self.tokens.authenticator().password_hasher(),
            command.password,
        )
        .await?;

        let identity = Identity {
            id: IdentityId::new(),
            name: command.name,
            email: command.email,
            role,
            password_hash,
            created_at: self.tokens.clock().now(),
        };

        let created = self.repository.create(identity).await?;
        tracing::info!("Registered {} as {}", created.id, created.role);

        self.send_best_effort(Notification::welcome(&created), &created.id)
            .await;

        self.session(&created)
    }

    async fn forgot_password(&self, email: &str) -> Result<(), AccessError> {
        let Some(identity) = self.repository.find_by_email(email).await? else {
            tracing::info!("Password reset requested for an unknown email");
            return Ok(());
        };

        let issued = match self.tokens.issue_reset_token(&identity) {
            Ok(issued) => issued,
            Err(e) => {
                tracing::error!("Failed to issue reset token for {}: {}", identity.id, e);
                return Ok(());
            }
        };

        let link = notifications::reset_link(&self.reset_password_url, &issued.token);
        self.send_best_effort(Notification::password_reset(&identity, &link), &identity.id)
            .await;

        Ok(())
    }

    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AccessError> {
        let grant = self.tokens.validate_reset_token(&command.token)?;

        let identity = self
            .repository
            .find_by_email(&grant.email)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Reset token for {} names a missing identity", grant.subject);
                AccessError::InvalidResetToken
            })?;

        let password_hash = credentials::hash_password(
            self.tokens.authenticator().password_hasher(),
            command.new_password,
        )
        .await?;

        self.repository
            .update_password_hash(&identity.id, &password_hash)
            .await
            .map_err(|e| match e {
                IdentityError::NotFound(_) => {
                    tracing::warn!("Identity {} vanished during password reset", identity.id);
                    AccessError::InvalidResetToken
                }
                other => other.into(),
            })?;

        tracing::info!("Password reset for {}", identity.id);
        Ok(())
    }

    fn authenticate(&self, token: &str) -> Result<Principal, AccessError> {
        self.tokens.validate_access_token(token)
    }
}
