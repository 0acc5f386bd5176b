use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::identity::errors::DisplayNameError;
use crate::identity::errors::EmailError;
use crate::identity::errors::IdentityIdError;
use crate::identity::errors::RoleError;

/// Identity aggregate entity.
///
/// A person who can sign in: admin, instructor or student.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    /// Generate a new random identity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identity ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdentityIdError> {
        Uuid::parse_str(s)
            .map(IdentityId)
            .map_err(|e| IdentityIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Closed set of platform roles.
///
/// The wire form is the capitalized name (`"Admin"`), matching what the
/// access token's role claim carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

impl Role {
    /// Roles an account may be given through registration or admin creation.
    /// Admins are provisioned out of band.
    pub const SELF_ASSIGNABLE: [Role; 2] = [Role::Instructor, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Instructor => "Instructor",
            Role::Student => "Student",
        }
    }

    pub fn is_self_assignable(&self) -> bool {
        Self::SELF_ASSIGNABLE.contains(self)
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Instructor" => Ok(Role::Instructor),
            "Student" => Ok(Role::Student),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human readable name shown in the UI.
///
/// Trimmed, non-empty, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `Empty` - Name is blank after trimming
    /// * `TooLong` - Name exceeds 100 characters
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let trimmed = name.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(DisplayNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Matching is
/// case-sensitive; the address is stored exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create an identity on behalf of an administrator.
///
/// No password: the service generates a temporary one.
#[derive(Debug)]
pub struct CreateIdentityCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub role: Role,
}

/// Command to change an identity's name and email.
#[derive(Debug)]
pub struct UpdateIdentityCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_wire_name() {
        for role in [Role::Admin, Role::Instructor, Role::Student] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_role_parsing_is_case_sensitive() {
        assert_eq!(
            "admin".parse::<Role>(),
            Err(RoleError::Unknown("admin".to_string()))
        );
        assert!("Teacher".parse::<Role>().is_err());
    }

    #[test]
    fn test_admin_is_not_self_assignable() {
        assert!(!Role::Admin.is_self_assignable());
        assert!(Role::Instructor.is_self_assignable());
        assert!(Role::Student.is_self_assignable());
    }

    #[test]
    fn test_display_name_is_trimmed() {
        let name = DisplayName::new("  Ada Lovelace ".to_string()).unwrap();
        assert_eq!(name.as_str(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_rejects_blank_and_long() {
        assert_eq!(
            DisplayName::new("   ".to_string()),
            Err(DisplayNameError::Empty)
        );
        assert_eq!(
            DisplayName::new("x".repeat(101)),
            Err(DisplayNameError::TooLong {
                max: 100,
                actual: 101
            })
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("a@x.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_identity_id_parsing() {
        let id = IdentityId::new();
        assert_eq!(IdentityId::from_string(&id.to_string()), Ok(id));
        assert!(IdentityId::from_string("42").is_err());
    }
}
