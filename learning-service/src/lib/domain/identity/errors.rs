use thiserror::Error;

/// Error for IdentityId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Name must not be empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Error for notification delivery
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to serialize notification: {0}")]
    SerializationFailed(String),

    #[error("Failed to deliver notification: {0}")]
    DeliveryFailed(String),
}

/// Top-level error for identity operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("Invalid identity ID: {0}")]
    InvalidIdentityId(#[from] IdentityIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] DisplayNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    #[error("Invalid role. Allowed roles are: Instructor, Student.")]
    RoleNotAssignable,

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("No students found.")]
    NoStudents,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Not allowed to modify user {0}")]
    Forbidden(String),

    #[error("Password error: {0}")]
    Password(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<auth::PasswordError> for IdentityError {
    fn from(err: auth::PasswordError) -> Self {
        IdentityError::Password(err.to_string())
    }
}
