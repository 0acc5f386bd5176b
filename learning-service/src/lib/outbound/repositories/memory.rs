use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;
use crate::identity::errors::IdentityError;
use crate::identity::ports::IdentityRepository;

/// Process-local credential store.
///
/// Enforces the same email uniqueness as the Postgres schema.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<IdentityId, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(
    identities: &HashMap<IdentityId, Identity>,
    email: &str,
    except: &IdentityId,
) -> bool {
    identities
        .values()
        .any(|identity| identity.email.as_str() == email && identity.id != *except)
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut identities = self.identities.write().await;

        if email_taken(&identities, identity.email.as_str(), &identity.id) {
            return Err(IdentityError::EmailAlreadyExists(
                identity.email.as_str().to_string(),
            ));
        }

        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError> {
        Ok(self.identities.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| identity.email.as_str() == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Identity>, IdentityError> {
        let mut all: Vec<Identity> = self.identities.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Identity>, IdentityError> {
        let mut matching: Vec<Identity> = self
            .identities
            .read()
            .await
            .values()
            .filter(|identity| identity.role == role)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(matching)
    }

    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut identities = self.identities.write().await;

        if email_taken(&identities, identity.email.as_str(), &identity.id) {
            return Err(IdentityError::EmailAlreadyExists(
                identity.email.as_str().to_string(),
            ));
        }

        let stored = identities
            .get_mut(&identity.id)
            .ok_or(IdentityError::NotFound(identity.id.to_string()))?;
        stored.name = identity.name;
        stored.email = identity.email;

        Ok(stored.clone())
    }

    async fn update_password_hash(
        &self,
        id: &IdentityId,
        password_hash: &str,
    ) -> Result<(), IdentityError> {
        let mut identities = self.identities.write().await;

        let stored = identities
            .get_mut(id)
            .ok_or(IdentityError::NotFound(id.to_string()))?;
        stored.password_hash = password_hash.to_string();

        Ok(())
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), IdentityError> {
        self.identities
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(IdentityError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::identity::models::DisplayName;
    use crate::domain::identity::models::EmailAddress;

    fn identity(email: &str) -> Identity {
        Identity {
            id: IdentityId::new(),
            name: DisplayName::new("A".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            role: Role::Student,
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repository = InMemoryIdentityRepository::new();
        repository.create(identity("a@x.com")).await.unwrap();

        let result = repository.create(identity("a@x.com")).await;

        assert!(matches!(result, Err(IdentityError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let repository = InMemoryIdentityRepository::new();
        repository.create(identity("a@x.com")).await.unwrap();

        assert!(repository.find_by_email("a@x.com").await.unwrap().is_some());
        assert!(repository.find_by_email("A@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_cannot_steal_email() {
        let repository = InMemoryIdentityRepository::new();
        repository.create(identity("a@x.com")).await.unwrap();
        let mut other = repository.create(identity("b@x.com")).await.unwrap();

        other.email = EmailAddress::new("a@x.com".to_string()).unwrap();

        assert!(matches!(
            repository.update(other).await,
            Err(IdentityError::EmailAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_password_hash_update_and_delete() {
        let repository = InMemoryIdentityRepository::new();
        let created = repository.create(identity("a@x.com")).await.unwrap();

        repository
            .update_password_hash(&created.id, "$argon2id$new")
            .await
            .unwrap();
        let stored = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "$argon2id$new");

        repository.delete(&created.id).await.unwrap();
        assert!(matches!(
            repository.delete(&created.id).await,
            Err(IdentityError::NotFound(_))
        ));
    }
}
