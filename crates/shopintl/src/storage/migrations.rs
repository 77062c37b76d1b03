//! Versioned schema migrations.
//!
//! Each migration is a batch of statements applied in its own transaction,
//! together with the bump of `schema_version` in the `metadata` table.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Error, Result};

use super::schema::{CREATE_METADATA_TABLE, SCHEMA_STATEMENTS};

/// One schema change.
#[derive(Debug)]
struct Migration {
    version: i32,
    description: &'static str,
    statements: &'static [&'static str],
}

/// Known migrations, in ascending version order.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "languages, currencies and shop configuration",
    statements: SCHEMA_STATEMENTS,
}];

/// The schema version this build writes.
pub const CURRENT_VERSION: i32 = 1;

const VERSION_KEY: &str = "schema_version";

/// Bring the schema up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if a migration fails, if the stored version is
/// unreadable, or if the database was written by a newer schema version.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_METADATA_TABLE)?;

    let version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported {CURRENT_VERSION}"
            ),
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > version) {
        apply(conn, migration)?;
    }
    Ok(())
}

/// Stored schema version, 0 for a fresh database.
fn schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for statement in migration.statements {
        tx.execute_batch(statement)
            .map_err(|e| Error::DatabaseMigration {
                message: format!("migration {} failed: {e}", migration.version),
            })?;
    }
    tx.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (VERSION_KEY, migration.version.to_string()),
    )?;
    tx.commit()?;

    info!(
        version = migration.version,
        "applied migration: {}", migration.description
    );
    Ok(())
}
