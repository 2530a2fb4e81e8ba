//! User administration handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use authhub_core::error::AppError;
use authhub_core::types::pagination::{PageRequest, PageResponse};
use authhub_entity::user::UpdateUser;

use crate::dto::request::{AdminUpdateUserRequest, ChangeRoleRequest, ListUsersQuery};
use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::middleware::guard::{require_admin, require_ownership_or_admin};
use crate::state::AppState;

/// GET /api/users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<PageResponse<UserResponse>>>, AppError> {
    require_admin(&auth)?;

    let page = PageRequest::new(query.page, query.page_size);
    let users = state
        .user_admin_service
        .list_users(&page, query.search.as_deref(), query.include_inactive)
        .await?;

    Ok(Json(ApiResponse::ok(users.map(UserResponse::from))))
}

/// GET /api/users/{id} (admin or self)
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    require_ownership_or_admin(&auth, user_id)?;

    let user = state.user_admin_service.get_user(user_id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/users/{id} (admin or self; activation and lock state are
/// admin-only fields)
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<AdminUpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    require_ownership_or_admin(&auth, user_id)?;

    if (req.active.is_some() || req.locked.is_some()) && !auth.is_admin() {
        return Err(AppError::insufficient_permissions(
            "Only administrators may change activation or lock state",
        ));
    }

    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Display name cannot be empty"));
        }
    }

    let user = state
        .user_admin_service
        .update_user(
            user_id,
            &UpdateUser {
                display_name: req.name,
                active: req.active,
                locked: req.locked,
                failed_login_attempts: None,
            },
        )
        .await?;

    Ok(Json(ApiResponse::with_message("User updated", user.into())))
}

/// POST /api/users/{id}/approve (admin)
pub async fn approve_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    require_admin(&auth)?;

    let user = state.user_admin_service.approve_user(user_id).await?;
    Ok(Json(ApiResponse::with_message("User approved", user.into())))
}

/// PUT /api/users/{id}/role (admin) — replacement semantics.
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ChangeRoleRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    require_admin(&auth)?;

    let user = state
        .user_admin_service
        .change_role(user_id, &req.role)
        .await?;
    Ok(Json(ApiResponse::with_message("Role changed", user.into())))
}

/// POST /api/users/{id}/roles/{name} (admin)
pub async fn assign_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((user_id, role_name)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    require_admin(&auth)?;

    let user = state
        .user_admin_service
        .assign_role(user_id, &role_name)
        .await?;
    Ok(Json(ApiResponse::with_message("Role assigned", user.into())))
}

/// DELETE /api/users/{id}/roles/{name} (admin)
pub async fn remove_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((user_id, role_name)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    require_admin(&auth)?;

    let user = state
        .user_admin_service
        .remove_role(user_id, &role_name)
        .await?;
    Ok(Json(ApiResponse::with_message("Role removed", user.into())))
}

/// POST /api/users/{id}/deactivate (admin)
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    require_admin(&auth)?;

    let user = state
        .user_admin_service
        .update_user(
            user_id,
            &UpdateUser {
                active: Some(false),
                ..UpdateUser::default()
            },
        )
        .await?;

    Ok(Json(ApiResponse::with_message("User deactivated", user.into())))
}

/// POST /api/users/{id}/toggle-active (admin)
pub async fn toggle_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    require_admin(&auth)?;

    let user = state.user_admin_service.toggle_active(user_id).await?;
    Ok(Json(ApiResponse::with_message(
        "Activation toggled",
        user.into(),
    )))
}

/// DELETE /api/users/{id} (admin) — permanent delete.
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    require_admin(&auth)?;

    state.user_admin_service.delete_user(user_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "User permanently deleted".to_string(),
    })))
}
