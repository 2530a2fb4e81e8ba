//! User self-service operations — profile viewing and updates.

use std::sync::Arc;

use tracing::info;

use authhub_core::error::AppError;
use authhub_core::result::AppResult;
use authhub_database::repositories::user::UserRepository;
use authhub_entity::user::{UpdateUser, UserWithRoles};

use crate::context::RequestContext;

/// Handles user self-service operations.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User repository.
    users: Arc<UserRepository>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<UserRepository>) -> Self {
        Self { users }
    }

    /// Gets the current user's full profile with roles.
    pub async fn get_profile(&self, ctx: &RequestContext) -> AppResult<UserWithRoles> {
        self.users
            .find_with_roles(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found("User not found"))
    }

    /// Updates the current user's display name. The self-service path
    /// cannot touch activation, lock state, or the failed-attempt counter.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        display_name: Option<String>,
    ) -> AppResult<UserWithRoles> {
        if let Some(name) = &display_name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Display name cannot be empty"));
            }
        }

        self.users
            .update(
                ctx.user_id,
                &UpdateUser {
                    display_name,
                    ..UpdateUser::default()
                },
            )
            .await?;

        info!(user_id = %ctx.user_id, "Profile updated");
        self.get_profile(ctx).await
    }
}
