//! # quizzy-db
//!
//! Record-store access layer for the Quizzy backend. Manages the single
//! SQLite database holding users, survey sessions, the star-transaction
//! ledger, redemptions, the survey catalog, and admin session tokens.
//!
//! ## Conventions
//!
//! - WAL mode mandatory, foreign keys enforced
//! - All timestamps are Unix epoch seconds (u64)
//! - Schema version stored in `PRAGMA user_version`
//! - Balance mutations are conditional `UPDATE` statements checked via
//!   rows-affected, never read-then-write

pub mod migrations;
pub mod queries;
pub mod schema;

use rusqlite::Connection;
use std::path::Path;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create the Quizzy database at the given path.
///
/// Configures WAL mode, foreign keys, and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

/// Run `f` inside an exclusive write transaction.
///
/// Takes the write lock up front (`BEGIN IMMEDIATE`) so concurrent writers
/// serialize instead of observing each other's half-applied state. Commits
/// on `Ok`, rolls back on `Err` or on a failed commit.
pub fn immediate_tx<T, E, F>(conn: &Connection, f: F) -> std::result::Result<T, E>
where
    E: From<DbError>,
    F: FnOnce(&Connection) -> std::result::Result<T, E>,
{
    conn.execute_batch("BEGIN IMMEDIATE;")
        .map_err(|e| E::from(DbError::Sqlite(e)))?;

    match f(conn) {
        Ok(value) => match conn.execute_batch("COMMIT;") {
            Ok(()) => Ok(value),
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK;");
                Err(E::from(DbError::Sqlite(e)))
            }
        },
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK;");
            Err(e)
        }
    }
}
