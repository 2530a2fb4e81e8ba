//! Role repository implementation.
//!
//! Owns the role catalog and the read side of the `user_roles` junction.
//! The catalog is small and mostly static; [`RoleRepository::ensure_default_roles`]
//! seeds it idempotently at startup.

use sqlx::PgPool;
use uuid::Uuid;

use authhub_core::error::{AppError, ErrorCode};
use authhub_core::result::AppResult;
use authhub_entity::role::{DEFAULT_ROLES, Role};
use authhub_entity::user::User;

/// Repository for the role catalog and junction queries.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a role. Names are normalized to lowercase; a duplicate is
    /// reported as `ROLE_ALREADY_EXISTS`.
    pub async fn create(&self, name: &str, description: Option<&str>) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description) VALUES (LOWER($1), $2) RETURNING *",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("roles_name_key") => {
                AppError::new(
                    ErrorCode::RoleAlreadyExists,
                    format!("Role '{}' already exists", name.to_lowercase()),
                )
            }
            _ => AppError::database("Failed to create role", e),
        })
    }

    /// Find a role by primary key.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find role by id", e))
    }

    /// Find a role by name (case-insensitive).
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = LOWER($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find role by name", e))
    }

    /// List the entire catalog.
    pub async fn list_all(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to list roles", e))
    }

    /// Update a role's description.
    pub async fn update(&self, id: i32, description: Option<&str>) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "UPDATE roles SET description = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to update role", e))?
        .ok_or_else(|| AppError::role_not_found(format!("Role {id} not found")))
    }

    /// Delete a role. Blocked with `ROLE_HAS_USERS` while any user holds it.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::new(
                        ErrorCode::RoleHasUsers,
                        "Role cannot be deleted while users still hold it",
                    )
                }
                _ => AppError::database("Failed to delete role", e),
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// List all users currently holding a role.
    pub async fn list_users_for_role(&self, role_id: i32) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT u.* FROM users u \
             JOIN user_roles ur ON ur.user_id = u.id \
             WHERE ur.role_id = $1 ORDER BY u.email ASC",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to list users for role", e))
    }

    /// List all roles held by a user.
    pub async fn list_roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 ORDER BY r.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to list roles for user", e))
    }

    /// Whether the user holds the named role (case-insensitive).
    pub async fn has_role(&self, user_id: Uuid, name: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_roles ur \
             JOIN roles r ON r.id = ur.role_id \
             WHERE ur.user_id = $1 AND r.name = LOWER($2)",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to check role", e))?;
        Ok(count > 0)
    }

    /// Whether the user holds any of the named roles (case-insensitive).
    pub async fn has_any_role(&self, user_id: Uuid, names: &[&str]) -> AppResult<bool> {
        let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_roles ur \
             JOIN roles r ON r.id = ur.role_id \
             WHERE ur.user_id = $1 AND r.name = ANY($2)",
        )
        .bind(user_id)
        .bind(&lowered)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to check roles", e))?;
        Ok(count > 0)
    }

    /// Seed the fixed role catalog, creating only the missing entries.
    /// Safe to run on every startup.
    pub async fn ensure_default_roles(&self) -> AppResult<()> {
        for (name, description) in DEFAULT_ROLES {
            sqlx::query(
                "INSERT INTO roles (name, description) VALUES ($1, $2) \
                 ON CONFLICT (name) DO NOTHING",
            )
            .bind(name)
            .bind(description)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to seed default roles", e))?;
        }
        Ok(())
    }
}
