//! File queries.

use sqlx::postgres::PgConnection;
use uuid::Uuid;

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_entity::ParentFilter;
use arbor_entity::file::File;

use super::write_error;

/// Find a file by ID, whoever owns it.
pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<File>> {
    sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
}

/// Find a file with the given name in `folder_id` (root when `None`).
pub async fn find_sibling(
    conn: &mut PgConnection,
    owner: &str,
    folder_id: Option<Uuid>,
    name: &str,
    exclude: Option<Uuid>,
) -> AppResult<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM files \
         WHERE user_id = $1 AND folder_id IS NOT DISTINCT FROM $2 AND name = $3 \
           AND ($4::uuid IS NULL OR id <> $4) \
         LIMIT 1",
    )
    .bind(owner)
    .bind(folder_id)
    .bind(name)
    .bind(exclude)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check file name", e))
}

/// List an owner's files matching a folder filter.
pub async fn list(
    conn: &mut PgConnection,
    owner: &str,
    filter: ParentFilter,
) -> AppResult<Vec<File>> {
    let result = match filter {
        ParentFilter::Root => {
            sqlx::query_as::<_, File>(
                "SELECT * FROM files WHERE user_id = $1 AND folder_id IS NULL \
                 ORDER BY name ASC, id ASC",
            )
            .bind(owner)
            .fetch_all(&mut *conn)
            .await
        }
        ParentFilter::In(folder_id) => {
            sqlx::query_as::<_, File>(
                "SELECT * FROM files WHERE user_id = $1 AND folder_id = $2 \
                 ORDER BY name ASC, id ASC",
            )
            .bind(owner)
            .bind(folder_id)
            .fetch_all(&mut *conn)
            .await
        }
        ParentFilter::Any => {
            sqlx::query_as::<_, File>(
                "SELECT * FROM files WHERE user_id = $1 ORDER BY name ASC, id ASC",
            )
            .bind(owner)
            .fetch_all(&mut *conn)
            .await
        }
    };
    result.map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
}

/// Storage paths of every file inside any of `folder_ids`.
pub async fn storage_paths_in(
    conn: &mut PgConnection,
    owner: &str,
    folder_ids: &[Uuid],
) -> AppResult<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT storage_path FROM files WHERE user_id = $1 AND folder_id = ANY($2)",
    )
    .bind(owner)
    .bind(folder_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to collect file paths", e))
}

/// Insert a file row.
pub async fn insert(
    conn: &mut PgConnection,
    id: Uuid,
    owner: &str,
    folder_id: Option<Uuid>,
    name: &str,
    storage_path: &str,
) -> AppResult<File> {
    sqlx::query_as::<_, File>(
        "INSERT INTO files (id, user_id, folder_id, name, storage_path) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(id)
    .bind(owner)
    .bind(folder_id)
    .bind(name)
    .bind(storage_path)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| write_error("file", name, e))
}

/// Set a file's name, folder, and storage path.
pub async fn update(
    conn: &mut PgConnection,
    owner: &str,
    id: Uuid,
    folder_id: Option<Uuid>,
    name: &str,
    storage_path: &str,
) -> AppResult<File> {
    sqlx::query_as::<_, File>(
        "UPDATE files SET folder_id = $3, name = $4, storage_path = $5, updated_at = NOW() \
         WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(owner)
    .bind(folder_id)
    .bind(name)
    .bind(storage_path)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| write_error("file", name, e))?
    .ok_or_else(|| AppError::not_found("File not found"))
}

/// Delete a file row.
pub async fn delete(conn: &mut PgConnection, owner: &str, id: Uuid) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM files WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(owner)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
    Ok(result.rows_affected() > 0)
}
