use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;
use crate::identity::errors::IdentityError;
use crate::identity::ports::IdentityRepository;

const EMAIL_UNIQUE_CONSTRAINT: &str = "identities_email_key";

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = IdentityError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            id: IdentityId(row.id),
            name: DisplayName::new(row.name)?,
            email: EmailAddress::new(row.email)?,
            role: row.role.parse::<Role>()?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

fn map_write_error(e: sqlx::Error, email: &EmailAddress) -> IdentityError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            return IdentityError::EmailAlreadyExists(email.as_str().to_string());
        }
    }
    IdentityError::DatabaseError(e.to_string())
}

fn database_error(e: sqlx::Error) -> IdentityError {
    IdentityError::DatabaseError(e.to_string())
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError> {
        sqlx::query(
            r#"
            INSERT INTO identities (id, name, email, role, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.name.as_str())
        .bind(identity.email.as_str())
        .bind(identity.role.as_str())
        .bind(&identity.password_hash)
        .bind(identity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &identity.email))?;

        Ok(identity)
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, name, email, role, password_hash, created_at
            FROM identities
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Identity::try_from)
        .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, name, email, role, password_hash, created_at
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Identity::try_from)
        .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Identity>, IdentityError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, name, email, role, password_hash, created_at
            FROM identities
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(Identity::try_from)
        .collect()
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Identity>, IdentityError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, name, email, role, password_hash, created_at
            FROM identities
            WHERE role = $1
            ORDER BY name
            "#,
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(Identity::try_from)
        .collect()
    }

    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let result = sqlx::query(
            r#"
            UPDATE identities
            SET name = $2, email = $3
            WHERE id = $1
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.name.as_str())
        .bind(identity.email.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &identity.email))?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(identity.id.to_string()));
        }

        Ok(identity)
    }

    async fn update_password_hash(
        &self,
        id: &IdentityId,
        password_hash: &str,
    ) -> Result<(), IdentityError> {
        let result = sqlx::query("UPDATE identities SET password_hash = $2 WHERE id = $1")
            .bind(id.0)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), IdentityError> {
        let result = sqlx::query("DELETE FROM identities WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
