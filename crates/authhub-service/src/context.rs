//! Authenticated request context.

use uuid::Uuid;

/// Identity and roles of the verified caller, built by the access gate
/// and passed into every service operation that acts on behalf of a user.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The session the presented access token belongs to.
    pub session_id: Uuid,
    /// The user's email.
    pub email: String,
    /// Role names as verified against the store at request time.
    pub roles: Vec<String>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, session_id: Uuid, email: String, roles: Vec<String>) -> Self {
        Self {
            user_id,
            session_id,
            email,
            roles,
        }
    }

    /// Whether the caller holds the named role (case-insensitive).
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(name))
    }

    /// Whether the caller holds any of the named roles (case-insensitive).
    pub fn has_any_role<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> bool {
        names.into_iter().any(|n| self.has_role(n))
    }

    /// Whether the caller is an administrator.
    pub fn is_admin(&self) -> bool {
        self.has_role(authhub_entity::role::roles::ADMIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_checks() {
        let ctx = RequestContext::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "a@example.com".into(),
            vec!["client".into()],
        );
        assert!(ctx.has_role("Client"));
        assert!(ctx.has_any_role(["admin", "client"]));
        assert!(!ctx.is_admin());
    }
}
