//! Folder queries.

use sqlx::postgres::PgConnection;
use uuid::Uuid;

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_entity::ParentFilter;
use arbor_entity::folder::Folder;

use super::write_error;

/// Find a folder by ID, whoever owns it.
pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Folder>> {
    sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
}

/// Find a sibling folder with the given name under `parent_id`.
pub async fn find_sibling(
    conn: &mut PgConnection,
    owner: &str,
    parent_id: Option<Uuid>,
    name: &str,
    exclude: Option<Uuid>,
) -> AppResult<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM folders \
         WHERE user_id = $1 AND parent_id IS NOT DISTINCT FROM $2 AND name = $3 \
           AND ($4::uuid IS NULL OR id <> $4) \
         LIMIT 1",
    )
    .bind(owner)
    .bind(parent_id)
    .bind(name)
    .bind(exclude)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check folder name", e))
}

/// List an owner's folders matching a parent filter.
pub async fn list(
    conn: &mut PgConnection,
    owner: &str,
    filter: ParentFilter,
) -> AppResult<Vec<Folder>> {
    let result = match filter {
        ParentFilter::Root => {
            sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders WHERE user_id = $1 AND parent_id IS NULL \
                 ORDER BY name ASC, id ASC",
            )
            .bind(owner)
            .fetch_all(&mut *conn)
            .await
        }
        ParentFilter::In(parent_id) => {
            sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders WHERE user_id = $1 AND parent_id = $2 \
                 ORDER BY name ASC, id ASC",
            )
            .bind(owner)
            .bind(parent_id)
            .fetch_all(&mut *conn)
            .await
        }
        ParentFilter::Any => {
            sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders WHERE user_id = $1 ORDER BY name ASC, id ASC",
            )
            .bind(owner)
            .fetch_all(&mut *conn)
            .await
        }
    };
    result.map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
}

/// IDs on the ancestor chain of `start`, `start` included.
///
/// `UNION` drops revisited rows, so a corrupted loop ends the recursion.
pub async fn ancestor_ids(
    conn: &mut PgConnection,
    owner: &str,
    start: Uuid,
) -> AppResult<Vec<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        "WITH RECURSIVE ancestors(id, parent_id) AS ( \
            SELECT id, parent_id FROM folders WHERE id = $1 AND user_id = $2 \
            UNION \
            SELECT f.id, f.parent_id FROM folders f \
            INNER JOIN ancestors a ON f.id = a.parent_id \
            WHERE f.user_id = $2 \
         ) SELECT id FROM ancestors",
    )
    .bind(start)
    .bind(owner)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to walk ancestors", e))
}

/// IDs of `root` and every folder below it.
pub async fn subtree_ids(conn: &mut PgConnection, owner: &str, root: Uuid) -> AppResult<Vec<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        "WITH RECURSIVE subtree(id) AS ( \
            SELECT id FROM folders WHERE id = $1 AND user_id = $2 \
            UNION \
            SELECT f.id FROM folders f \
            INNER JOIN subtree s ON f.parent_id = s.id \
            WHERE f.user_id = $2 \
         ) SELECT id FROM subtree",
    )
    .bind(root)
    .bind(owner)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to collect subtree", e))
}

/// Insert a folder row.
pub async fn insert(
    conn: &mut PgConnection,
    id: Uuid,
    owner: &str,
    parent_id: Option<Uuid>,
    name: &str,
) -> AppResult<Folder> {
    sqlx::query_as::<_, Folder>(
        "INSERT INTO folders (id, user_id, parent_id, name) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(id)
    .bind(owner)
    .bind(parent_id)
    .bind(name)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| write_error("folder", name, e))
}

/// Set a folder's name and parent.
pub async fn update(
    conn: &mut PgConnection,
    owner: &str,
    id: Uuid,
    parent_id: Option<Uuid>,
    name: &str,
) -> AppResult<Folder> {
    sqlx::query_as::<_, Folder>(
        "UPDATE folders SET parent_id = $3, name = $4, updated_at = NOW() \
         WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(owner)
    .bind(parent_id)
    .bind(name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| write_error("folder", name, e))?
    .ok_or_else(|| AppError::not_found("Folder not found"))
}

/// Delete a folder; descendants and files go with it through the cascades.
pub async fn delete(conn: &mut PgConnection, owner: &str, id: Uuid) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM folders WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(owner)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folder", e))?;
    Ok(result.rows_affected() > 0)
}
