use async_trait::async_trait;

use crate::domain::access::models::Principal;
use crate::domain::identity::models::CreateIdentityCommand;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::UpdateIdentityCommand;
use crate::domain::identity::notifications::Notification;
use crate::identity::errors::IdentityError;
use crate::identity::errors::NotificationError;

/// Port for identity management operations.
///
/// Route-level role policies are enforced before these are called; only the
/// rules that need the target record (ownership) live here.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// All identities.
    async fn list_identities(&self) -> Result<Vec<Identity>, IdentityError>;

    /// # Errors
    /// * `NotFound` - Identity does not exist
    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, IdentityError>;

    /// Resolve the caller's identity id from the email in their token.
    ///
    /// # Errors
    /// * `NotFound` - Identity was deleted after the token was issued
    async fn current_identity_id(&self, principal: &Principal)
        -> Result<IdentityId, IdentityError>;

    /// # Errors
    /// * `NoStudents` - There are no students at all
    async fn list_students(&self) -> Result<Vec<Identity>, IdentityError>;

    /// # Errors
    /// * `StudentNotFound` - Identity is absent or not a student
    async fn get_student(&self, id: &IdentityId) -> Result<Identity, IdentityError>;

    /// Change name and email. Admins may update anyone; everyone else only
    /// themselves.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `Forbidden` - Caller is neither admin nor the owner
    /// * `EmailAlreadyExists` - New email belongs to another identity
    async fn update_identity(
        &self,
        principal: &Principal,
        id: &IdentityId,
        command: UpdateIdentityCommand,
    ) -> Result<Identity, IdentityError>;

    /// Create an instructor or student with a generated temporary password.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `RoleNotAssignable` - Role is Admin
    async fn create_identity(
        &self,
        command: CreateIdentityCommand,
    ) -> Result<Identity, IdentityError>;

    /// # Errors
    /// * `NotFound` - Identity does not exist
    async fn delete_identity(&self, id: &IdentityId) -> Result<(), IdentityError>;
}

/// Persistence operations for the identity aggregate (the credential store).
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError>;

    /// # Returns
    /// Optional identity (None if not found)
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError>;

    /// Exact, case-sensitive match.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError>;

    async fn list_all(&self) -> Result<Vec<Identity>, IdentityError>;

    async fn list_by_role(&self, role: Role) -> Result<Vec<Identity>, IdentityError>;

    /// Overwrite name and email.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError>;

    /// # Errors
    /// * `NotFound` - Identity does not exist
    async fn update_password_hash(
        &self,
        id: &IdentityId,
        password_hash: &str,
    ) -> Result<(), IdentityError>;

    /// # Errors
    /// * `NotFound` - Identity does not exist
    async fn delete(&self, id: &IdentityId) -> Result<(), IdentityError>;
}

/// Outbound email delivery.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// # Errors
    /// * `SerializationFailed` - Notification could not be encoded
    /// * `DeliveryFailed` - Transport rejected or timed out
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}
