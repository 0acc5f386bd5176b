use auth::PasswordHasher;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::identity::errors::IdentityError;

const TEMPORARY_PASSWORD_LENGTH: usize = 16;

/// Hash on the blocking pool; argon2 is deliberately slow.
pub async fn hash_password(
    hasher: &PasswordHasher,
    password: String,
) -> Result<String, IdentityError> {
    let hasher = hasher.clone();

    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| IdentityError::Unknown(format!("Password hashing task failed: {}", e)))?
        .map_err(IdentityError::from)
}

/// Verify on the blocking pool.
///
/// `Ok(false)` for a wrong password, `Err` only when the stored digest is
/// unreadable.
pub async fn verify_password(
    hasher: &PasswordHasher,
    password: String,
    password_hash: String,
) -> Result<bool, IdentityError> {
    let hasher = hasher.clone();

    tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
        .await
        .map_err(|e| IdentityError::Unknown(format!("Password verification task failed: {}", e)))?
        .map_err(IdentityError::from)
}

/// Random alphanumeric first password for admin-created accounts.
pub fn temporary_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMPORARY_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify_off_thread() {
        let hasher = PasswordHasher::with_params(1024, 1, 1).unwrap();

        let hash = hash_password(&hasher, "p".to_string()).await.unwrap();

        assert!(verify_password(&hasher, "p".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password(&hasher, "q".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_digest_is_an_error() {
        let hasher = PasswordHasher::with_params(1024, 1, 1).unwrap();

        let result = verify_password(&hasher, "p".to_string(), "plaintext".to_string()).await;

        assert!(matches!(result, Err(IdentityError::Password(_))));
    }

    #[test]
    fn test_temporary_passwords_are_random() {
        let first = temporary_password();
        let second = temporary_password();

        assert_eq!(first.len(), TEMPORARY_PASSWORD_LENGTH);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
