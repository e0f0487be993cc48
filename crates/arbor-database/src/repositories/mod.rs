//! PostgreSQL queries for users, folders, and files.
//!
//! Functions take a `&mut PgConnection` so the store can run several of
//! them inside one transaction. None of them apply the owner policy on
//! point lookups; callers pass results through `require_owned`.

pub mod file;
pub mod folder;
pub mod user;

use sqlx::error::ErrorKind as DbErrorKind;
use sqlx::postgres::PgConnection;

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;

use crate::rules;

/// Serialize hierarchy mutations of one owner until the transaction ends.
///
/// Two concurrent moves could otherwise each pass the ancestor check and
/// together close a cycle.
pub async fn lock_owner(conn: &mut PgConnection, owner: &str) -> AppResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(owner)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock hierarchy", e))?;
    Ok(())
}

/// Map a failed INSERT/UPDATE to the domain error its constraint implies.
pub(crate) fn write_error(what: &str, name: &str, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        let constraint = db_err.constraint().unwrap_or_default();
        match db_err.kind() {
            DbErrorKind::UniqueViolation if constraint.ends_with("_sibling_name_key") => {
                return rules::name_conflict(what, name);
            }
            DbErrorKind::ForeignKeyViolation if constraint.ends_with("_user_id_fkey") => {
                return AppError::not_found("User not found");
            }
            DbErrorKind::ForeignKeyViolation => {
                return AppError::not_found("Folder not found");
            }
            DbErrorKind::CheckViolation if constraint == "folders_not_own_parent" => {
                return rules::cycle_error();
            }
            DbErrorKind::CheckViolation => {
                return AppError::validation(format!("Invalid {what} name '{name}'"));
            }
            _ => {}
        }
    }
    AppError::with_source(ErrorKind::Database, format!("Failed to write {what}"), err)
}
