//! Administrative user operations.
//!
//! Approval is the only path out of the pending state; there is no
//! self-service promotion. Role replacement is remove-all-then-assign-one,
//! never a differential update.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use authhub_core::error::AppError;
use authhub_core::result::AppResult;
use authhub_core::types::pagination::{PageRequest, PageResponse};
use authhub_database::repositories::role::RoleRepository;
use authhub_database::repositories::user::UserRepository;
use authhub_entity::role::roles;
use authhub_entity::user::{UpdateUser, User, UserWithRoles};

/// Handles administrative user management.
#[derive(Debug, Clone)]
pub struct UserAdminService {
    /// User repository.
    users: Arc<UserRepository>,
    /// Role repository.
    roles: Arc<RoleRepository>,
}

impl UserAdminService {
    /// Creates a new user administration service.
    pub fn new(users: Arc<UserRepository>, roles: Arc<RoleRepository>) -> Self {
        Self { users, roles }
    }

    /// Lists users with pagination, optional substring search over email
    /// and display name, and an inactive filter. Each row carries the
    /// user's current roles.
    pub async fn list_users(
        &self,
        page: &PageRequest,
        search: Option<&str>,
        include_inactive: bool,
    ) -> AppResult<PageResponse<UserWithRoles>> {
        let users = self.users.list(page, search, include_inactive).await?;

        let mut items = Vec::with_capacity(users.items.len());
        for user in &users.items {
            let user_roles = self.roles.list_roles_for_user(user.id).await?;
            items.push(UserWithRoles {
                user: user.clone(),
                roles: user_roles,
            });
        }

        Ok(PageResponse::new(
            items,
            users.page,
            users.page_size,
            users.total_items,
        ))
    }

    /// Fetches one user with roles.
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<UserWithRoles> {
        self.users
            .find_with_roles(user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found(format!("User {user_id} not found")))
    }

    /// Updates a user's allow-listed fields.
    pub async fn update_user(&self, user_id: Uuid, update: &UpdateUser) -> AppResult<UserWithRoles> {
        self.users.update(user_id, update).await?;
        info!(user_id = %user_id, "User updated by administrator");
        self.get_user(user_id).await
    }

    /// Approves a pending account: replaces its roles with `client` and
    /// activates it.
    pub async fn approve_user(&self, user_id: Uuid) -> AppResult<UserWithRoles> {
        // Validate existence first so an unknown ID reports USER_NOT_FOUND
        // rather than a role error.
        let _ = self.get_user(user_id).await?;

        self.replace_roles(user_id, roles::CLIENT).await?;
        self.users
            .update(
                user_id,
                &UpdateUser {
                    active: Some(true),
                    ..UpdateUser::default()
                },
            )
            .await?;

        info!(user_id = %user_id, "Pending user approved");
        self.get_user(user_id).await
    }

    /// Replaces a user's business role. The observed role set never holds
    /// two business roles at once: all existing roles are removed and the
    /// new one assigned.
    pub async fn change_role(&self, user_id: Uuid, role_name: &str) -> AppResult<UserWithRoles> {
        let _ = self.get_user(user_id).await?;
        self.replace_roles(user_id, role_name).await?;
        info!(user_id = %user_id, role = %role_name, "User role changed");
        self.get_user(user_id).await
    }

    /// Assigns one additional role. Duplicate assignment reports
    /// `ROLE_ALREADY_ASSIGNED`.
    pub async fn assign_role(&self, user_id: Uuid, role_name: &str) -> AppResult<UserWithRoles> {
        let _ = self.get_user(user_id).await?;
        let role = self.find_role(role_name).await?;
        self.users.assign_role(user_id, role.id).await?;
        info!(user_id = %user_id, role = %role.name, "Role assigned");
        self.get_user(user_id).await
    }

    /// Removes one role. Removing a role the user does not hold is a
    /// no-op.
    pub async fn remove_role(&self, user_id: Uuid, role_name: &str) -> AppResult<UserWithRoles> {
        let _ = self.get_user(user_id).await?;
        let role = self.find_role(role_name).await?;
        let removed = self.users.remove_role(user_id, role.id).await?;
        if removed {
            info!(user_id = %user_id, role = %role.name, "Role removed");
        }
        self.get_user(user_id).await
    }

    /// Flips a user's `active` flag.
    pub async fn toggle_active(&self, user_id: Uuid) -> AppResult<UserWithRoles> {
        let current = self.get_user(user_id).await?;
        let user = self
            .users
            .update(
                user_id,
                &UpdateUser {
                    active: Some(!current.user.active),
                    ..UpdateUser::default()
                },
            )
            .await?;

        info!(user_id = %user_id, active = user.active, "User activation toggled");
        self.get_user(user_id).await
    }

    /// Permanently deletes a user. Role associations are cleaned up
    /// first; references from collaborating business data surface as
    /// `USER_HAS_DEPENDENCIES`.
    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<()> {
        let deleted = self.users.delete(user_id).await?;
        if !deleted {
            return Err(AppError::user_not_found(format!("User {user_id} not found")));
        }
        info!(user_id = %user_id, "User permanently deleted");
        Ok(())
    }

    /// Lists all users holding a role.
    pub async fn list_users_for_role(&self, role_name: &str) -> AppResult<Vec<User>> {
        let role = self.find_role(role_name).await?;
        self.roles.list_users_for_role(role.id).await
    }

    async fn replace_roles(&self, user_id: Uuid, role_name: &str) -> AppResult<()> {
        let role = self.find_role(role_name).await?;
        self.users.remove_all_roles(user_id).await?;
        self.users.assign_role(user_id, role.id).await
    }

    async fn find_role(&self, name: &str) -> AppResult<authhub_entity::role::Role> {
        self.roles
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::role_not_found(format!("Role '{name}' not found")))
    }
}
