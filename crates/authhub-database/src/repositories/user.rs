//! User repository implementation.
//!
//! Owns the `users` relation and the `user_roles` junction mutations.
//! Emails are normalized to lowercase before every insert and lookup;
//! case-insensitive uniqueness then reduces to the plain unique constraint.

use sqlx::PgPool;
use uuid::Uuid;

use authhub_core::error::{AppError, ErrorCode};
use authhub_core::result::AppResult;
use authhub_core::types::pagination::{PageRequest, PageResponse};
use authhub_entity::role::Role;
use authhub_entity::user::{CreateUser, UpdateUser, User, UserWithRoles};

/// Repository for user CRUD, role-assignment, and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find user by id", e))
    }

    /// Find a user by email (case-insensitive).
    ///
    /// An unknown email is a normal empty result, not an error.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find user by email", e))
    }

    /// Find a user together with their current roles.
    pub async fn find_with_roles(&self, id: Uuid) -> AppResult<Option<UserWithRoles>> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let roles = sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 ORDER BY r.name ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to load user roles", e))?;

        Ok(Some(UserWithRoles { user, roles }))
    }

    /// Create a new user. The email must already be normalized by the
    /// caller; a lowercase normalization is applied again here as a
    /// belt-and-braces measure.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, display_name, active) \
             VALUES (LOWER($1), $2, $3, $4) \
             RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.display_name)
        .bind(data.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::new(ErrorCode::EmailAlreadyExists, "Email is already registered")
            }
            _ => AppError::database("Failed to create user", e),
        })
    }

    /// Update a user's allow-listed mutable fields.
    pub async fn update(&self, id: Uuid, data: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET display_name = COALESCE($2, display_name), \
                              active = COALESCE($3, active), \
                              locked = COALESCE($4, locked), \
                              failed_login_attempts = COALESCE($5, failed_login_attempts), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.display_name)
        .bind(data.active)
        .bind(data.locked)
        .bind(data.failed_login_attempts)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to update user", e))?
        .ok_or_else(|| AppError::user_not_found(format!("User {id} not found")))
    }

    /// Update a user's password hash. Nothing else is touched.
    pub async fn update_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database("Failed to update password", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::user_not_found(format!("User {user_id} not found")));
        }
        Ok(())
    }

    /// Increment the failed-login counter, returning the new value.
    pub async fn increment_failed_attempts(&self, user_id: Uuid) -> AppResult<i32> {
        let row: (i32,) = sqlx::query_as(
            "UPDATE users SET failed_login_attempts = failed_login_attempts + 1, \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING failed_login_attempts",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to increment failed attempts", e))?;

        Ok(row.0)
    }

    /// Reset the failed-login counter to zero.
    pub async fn reset_failed_attempts(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET failed_login_attempts = 0, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to reset failed attempts", e))?;
        Ok(())
    }

    /// Assign a role to a user. Assigning an already-held role is reported
    /// distinctly as `ROLE_ALREADY_ASSIGNED`.
    pub async fn assign_role(&self, user_id: Uuid, role_id: i32) -> AppResult<()> {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("user_roles_pkey") =>
                {
                    AppError::new(ErrorCode::RoleAlreadyAssigned, "User already holds this role")
                }
                _ => AppError::database("Failed to assign role", e),
            })?;
        Ok(())
    }

    /// Remove a role from a user. Returns whether a junction row existed.
    pub async fn remove_role(&self, user_id: Uuid, role_id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to remove role", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every role from a user, returning the count removed.
    pub async fn remove_all_roles(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to remove roles", e))?;
        Ok(result.rows_affected())
    }

    /// List users with pagination, an optional case-insensitive substring
    /// search over email and display name, and an inactive filter.
    pub async fn list(
        &self,
        page: &PageRequest,
        search: Option<&str>,
        include_inactive: bool,
    ) -> AppResult<PageResponse<User>> {
        let pattern = search.map(|q| format!("%{q}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users \
             WHERE ($1::text IS NULL OR email ILIKE $1 OR display_name ILIKE $1) \
               AND ($2 OR active)",
        )
        .bind(&pattern)
        .bind(include_inactive)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to count users", e))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users \
             WHERE ($1::text IS NULL OR email ILIKE $1 OR display_name ILIKE $1) \
               AND ($2 OR active) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(&pattern)
        .bind(include_inactive)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to list users", e))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Permanently delete a user.
    ///
    /// Role associations are removed first in the same transaction
    /// (referential cleanup); sessions cascade at the schema level. A
    /// remaining foreign-key reference from collaborating business data
    /// surfaces as `USER_HAS_DEPENDENCIES` rather than a raw database
    /// error.
    pub async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database("Failed to begin transaction", e))?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database("Failed to remove role associations", e))?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::new(
                        ErrorCode::UserHasDependencies,
                        "User cannot be deleted while other records reference it",
                    )
                }
                _ => AppError::database("Failed to delete user", e),
            })?;

        tx.commit()
            .await
            .map_err(|e| AppError::database("Failed to commit user deletion", e))?;

        Ok(result.rows_affected() > 0)
    }
}
