use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::access::models::Principal;
use crate::domain::access::policy;
use crate::domain::access::policy::AccessRule;
use crate::domain::clock::Clock;
use crate::domain::identity::credentials;
use crate::domain::identity::models::CreateIdentityCommand;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::UpdateIdentityCommand;
use crate::domain::identity::notifications::Notification;
use crate::identity::errors::IdentityError;
use crate::identity::ports::IdentityRepository;
use crate::identity::ports::IdentityServicePort;
use crate::identity::ports::Notifier;

/// Domain service implementation for identity management.
///
/// Concrete implementation of IdentityServicePort with dependency injection.
pub struct IdentityService<IR, N>
where
    IR: IdentityRepository,
    N: Notifier,
{
    repository: Arc<IR>,
    notifier: Arc<N>,
    password_hasher: auth::PasswordHasher,
    clock: Arc<dyn Clock>,
}

impl<IR, N> IdentityService<IR, N>
where
    IR: IdentityRepository,
    N: Notifier,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `notifier` - Outbound email delivery
    /// * `password_hasher` - Hasher configured with the deployment's cost
    /// * `clock` - Time source for `created_at`, shared with the token issuer
    pub fn new(
        repository: Arc<IR>,
        notifier: Arc<N>,
        password_hasher: auth::PasswordHasher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            notifier,
            password_hasher,
            clock,
        }
    }

    async fn find(&self, id: &IdentityId) -> Result<Identity, IdentityError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<IR, N> IdentityServicePort for IdentityService<IR, N>
where
    IR: IdentityRepository,
    N: Notifier,
{
    async fn list_identities(&self) -> Result<Vec<Identity>, IdentityError> {
        self.repository.list_all().await
    }

    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, IdentityError> {
        self.find(id).await
    }

    async fn current_identity_id(
        &self,
        principal: &Principal,
    ) -> Result<IdentityId, IdentityError> {
        self.repository
            .find_by_email(&principal.email)
            .await?
            .map(|identity| identity.id)
            .ok_or(IdentityError::NotFound(principal.email.clone()))
    }

    async fn list_students(&self) -> Result<Vec<Identity>, IdentityError> {
        let students = self.repository.list_by_role(Role::Student).await?;

        if students.is_empty() {
            return Err(IdentityError::NoStudents);
        }

        Ok(students)
    }

    async fn get_student(&self, id: &IdentityId) -> Result<Identity, IdentityError> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|identity| identity.role == Role::Student)
            .ok_or(IdentityError::StudentNotFound(id.to_string()))
    }

    async fn update_identity(
        &self,
        principal: &Principal,
        id: &IdentityId,
        command: UpdateIdentityCommand,
    ) -> Result<Identity, IdentityError> {
        let mut identity = self.find(id).await?;

        if !policy::self_service_update()
            .decide(principal, Some(&identity.id))
            .is_allowed()
        {
            tracing::warn!(
                "{} ({}) attempted to modify identity {}",
                principal.subject,
                principal.role,
                id
            );
            return Err(IdentityError::Forbidden(id.to_string()));
        }

        identity.name = command.name;
        identity.email = command.email;

        self.repository.update(identity).await
    }

    async fn create_identity(
        &self,
        command: CreateIdentityCommand,
    ) -> Result<Identity, IdentityError> {
        if !command.role.is_self_assignable() {
            return Err(IdentityError::RoleNotAssignable);
        }

        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(IdentityError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let temporary_password = credentials::temporary_password();
        let password_hash =
            credentials::hash_password(&self.password_hasher, temporary_password.clone()).await?;

        let identity = Identity {
            id: IdentityId::new(),
            name: command.name,
            email: command.email,
            role: command.role,
            password_hash,
            created_at: self.clock.now(),
        };

        let created = self.repository.create(identity).await?;

        let notification = Notification::welcome_with_temporary_password(&created, &temporary_password);
        if let Err(e) = self.notifier.send(&notification).await {
            tracing::error!(
                "Failed to send welcome notification for identity {}: {}",
                created.id,
                e
            );
        }

        Ok(created)
    }

    async fn delete_identity(&self, id: &IdentityId) -> Result<(), IdentityError> {
        self.repository.delete(id).await
    }
}
