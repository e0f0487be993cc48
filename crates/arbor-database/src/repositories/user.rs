//! User queries.

use sqlx::postgres::PgConnection;

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_entity::user::{NewUser, UpdateUser, User};

/// Find a user by identifier.
pub async fn find_by_id(conn: &mut PgConnection, id: &str) -> AppResult<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
}

/// Insert a user unless one with the same identifier exists.
///
/// Returns `None` when the row already existed; the existing row is left
/// untouched.
pub async fn insert_if_absent(conn: &mut PgConnection, data: &NewUser) -> AppResult<Option<User>> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, full_name, avatar_url) VALUES ($1, $2, $3, $4) \
         ON CONFLICT (id) DO NOTHING RETURNING *",
    )
    .bind(&data.id)
    .bind(&data.email)
    .bind(&data.full_name)
    .bind(&data.avatar_url)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create user", e))
}

/// Update mutable profile fields; `None` fields keep their value.
pub async fn update_profile(
    conn: &mut PgConnection,
    id: &str,
    update: &UpdateUser,
) -> AppResult<Option<User>> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET email = COALESCE($2, email), full_name = COALESCE($3, full_name), \
         avatar_url = COALESCE($4, avatar_url), updated_at = NOW() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&update.email)
    .bind(&update.full_name)
    .bind(&update.avatar_url)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))
}
