//! Role policies and the rules built from them.
//!
//! A [`Policy`] is a named, fixed set of roles. Rules that also need the target
//! of the request (ownership) implement [`AccessRule`] and compose with
//! [`AccessRule::or`].

use std::fmt;
use std::str::FromStr;

use crate::domain::access::models::Principal;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;

/// Outcome of evaluating a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn from_bool(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Named role policies referenced by protected routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    RequireAdminRole,
    RequireInstructorRole,
    RequireStudentRole,
    RequireAdminOrInstructorRole,
    RequireAdminOrInstructorOrStudentRole,
}

impl Policy {
    pub const ALL: [Policy; 5] = [
        Policy::RequireAdminRole,
        Policy::RequireInstructorRole,
        Policy::RequireStudentRole,
        Policy::RequireAdminOrInstructorRole,
        Policy::RequireAdminOrInstructorOrStudentRole,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Policy::RequireAdminRole => "RequireAdminRole",
            Policy::RequireInstructorRole => "RequireInstructorRole",
            Policy::RequireStudentRole => "RequireStudentRole",
            Policy::RequireAdminOrInstructorRole => "RequireAdminOrInstructorRole",
            Policy::RequireAdminOrInstructorOrStudentRole => {
                "RequireAdminOrInstructorOrStudentRole"
            }
        }
    }

    pub fn roles(&self) -> &'static [Role] {
        match self {
            Policy::RequireAdminRole => &[Role::Admin],
            Policy::RequireInstructorRole => &[Role::Instructor],
            Policy::RequireStudentRole => &[Role::Student],
            Policy::RequireAdminOrInstructorRole => &[Role::Admin, Role::Instructor],
            Policy::RequireAdminOrInstructorOrStudentRole => {
                &[Role::Admin, Role::Instructor, Role::Student]
            }
        }
    }

    /// Allow iff the principal's role is in this policy's set.
    pub fn evaluate(&self, principal: &Principal) -> Decision {
        Decision::from_bool(self.roles().contains(&principal.role))
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown policy: {0}")]
pub struct UnknownPolicy(pub String);

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

/// A rule deciding whether `principal` may act, optionally on `target`.
pub trait AccessRule {
    fn decide(&self, principal: &Principal, target: Option<&IdentityId>) -> Decision;

    /// Allow when either rule allows.
    fn or<R: AccessRule>(self, other: R) -> AnyOf<Self, R>
    where
        Self: Sized,
    {
        AnyOf(self, other)
    }
}

impl AccessRule for Policy {
    fn decide(&self, principal: &Principal, _target: Option<&IdentityId>) -> Decision {
        self.evaluate(principal)
    }
}

/// The principal is the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ownership;

impl AccessRule for Ownership {
    fn decide(&self, principal: &Principal, target: Option<&IdentityId>) -> Decision {
        Decision::from_bool(target == Some(&principal.subject))
    }
}

/// Logical OR of two rules.
#[derive(Debug, Clone, Copy)]
pub struct AnyOf<A, B>(pub A, pub B);

impl<A: AccessRule, B: AccessRule> AccessRule for AnyOf<A, B> {
    fn decide(&self, principal: &Principal, target: Option<&IdentityId>) -> Decision {
        match self.0.decide(principal, target) {
            Decision::Allow => Decision::Allow,
            Decision::Deny => self.1.decide(principal, target),
        }
    }
}

/// Who may edit an identity's profile: an admin, or the identity itself.
pub fn self_service_update() -> AnyOf<Policy, Ownership> {
    Policy::RequireAdminRole.or(Ownership)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            subject: IdentityId::new(),
            email: "u@x.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_admin_role() {
        let policy = Policy::RequireAdminRole;

        assert_eq!(policy.evaluate(&principal(Role::Student)), Decision::Deny);
        assert_eq!(policy.evaluate(&principal(Role::Instructor)), Decision::Deny);
        assert_eq!(policy.evaluate(&principal(Role::Admin)), Decision::Allow);
    }

    #[test]
    fn test_policy_role_sets() {
        let admin = principal(Role::Admin);
        let instructor = principal(Role::Instructor);
        let student = principal(Role::Student);

        let table = [
            (Policy::RequireInstructorRole, [false, true, false]),
            (Policy::RequireStudentRole, [false, false, true]),
            (Policy::RequireAdminOrInstructorRole, [true, true, false]),
            (Policy::RequireAdminOrInstructorOrStudentRole, [true, true, true]),
        ];

        for (policy, expected) in table {
            let actual = [
                policy.evaluate(&admin).is_allowed(),
                policy.evaluate(&instructor).is_allowed(),
                policy.evaluate(&student).is_allowed(),
            ];
            assert_eq!(actual, expected, "{}", policy);
        }
    }

    #[test]
    fn test_policy_names_parse_back() {
        for policy in Policy::ALL {
            assert_eq!(policy.name().parse::<Policy>(), Ok(policy));
        }
        assert!("RequireTeacherRole".parse::<Policy>().is_err());
    }

    #[test]
    fn test_owner_may_update_self_regardless_of_role() {
        let student = principal(Role::Student);
        let rule = self_service_update();

        assert_eq!(rule.decide(&student, Some(&student.subject)), Decision::Allow);
    }

    #[test]
    fn test_non_owner_student_is_denied() {
        let student = principal(Role::Student);
        let someone_else = IdentityId::new();
        let rule = self_service_update();

        assert_eq!(rule.decide(&student, Some(&someone_else)), Decision::Deny);
    }

    #[test]
    fn test_admin_may_update_anyone() {
        let admin = principal(Role::Admin);
        let rule = self_service_update();

        assert_eq!(rule.decide(&admin, Some(&IdentityId::new())), Decision::Allow);
    }

    #[test]
    fn test_ownership_without_target_denies() {
        let instructor = principal(Role::Instructor);

        assert_eq!(Ownership.decide(&instructor, None), Decision::Deny);
    }
}
