//! Role and ownership guards for protected routes.

use uuid::Uuid;

use authhub_core::error::AppError;
use authhub_service::context::RequestContext;

/// Passes if the caller holds any of the named roles (case-insensitive).
pub fn require_role(ctx: &RequestContext, names: &[&str]) -> Result<(), AppError> {
    if ctx.has_any_role(names.iter().copied()) {
        return Ok(());
    }
    Err(AppError::insufficient_permissions(format!(
        "Requires one of the roles: {}",
        names.join(", ")
    )))
}

/// Passes if the caller is an administrator.
pub fn require_admin(ctx: &RequestContext) -> Result<(), AppError> {
    if ctx.is_admin() {
        return Ok(());
    }
    Err(AppError::insufficient_permissions("Admin access required"))
}

/// Passes if the caller is an administrator or owns the resource.
pub fn require_ownership_or_admin(ctx: &RequestContext, owner_id: Uuid) -> Result<(), AppError> {
    if ctx.is_admin() || ctx.user_id == owner_id {
        return Ok(());
    }
    Err(AppError::access_denied(
        "You may only act on your own resources",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(roles: &[&str]) -> RequestContext {
        RequestContext::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "a@example.com".into(),
            roles.iter().map(|r| r.to_string()).collect(),
        )
    }

    #[test]
    fn test_require_role_any_of() {
        let employee = ctx(&["employee"]);
        assert!(require_role(&employee, &["admin", "employee"]).is_ok());
        assert!(require_role(&employee, &["admin"]).is_err());
        assert!(require_role(&ctx(&["EMPLOYEE"]), &["employee"]).is_ok());
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&ctx(&["admin"])).is_ok());
        assert!(require_admin(&ctx(&["client"])).is_err());
    }

    #[test]
    fn test_ownership_or_admin() {
        let caller = ctx(&["client"]);
        assert!(require_ownership_or_admin(&caller, caller.user_id).is_ok());
        assert!(require_ownership_or_admin(&caller, Uuid::new_v4()).is_err());
        assert!(require_ownership_or_admin(&ctx(&["admin"]), Uuid::new_v4()).is_ok());
    }
}
