//! Schema versioning for the garage database.
//!
//! The base tables come from [`SCHEMA_STATEMENTS`]. Each later change is an
//! entry in [`MIGRATIONS`], applied in order inside one transaction and
//! recorded in the `metadata` table.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The schema version this build writes.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Ordered migrations: `(target version, SQL batch)`.
///
/// Version 1 is the base schema and needs no extra SQL.
const MIGRATIONS: &[(i32, &str)] = &[(1, "")];

/// Create the base schema and bring it up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if schema creation fails, the stored version is
/// unreadable, or the database is newer than this build.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }
    if version < CURRENT_VERSION {
        migrate(conn, version)?;
    }
    Ok(())
}

/// Stored schema version; 0 for a fresh database.
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

fn store_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

fn migrate(conn: &Connection, from_version: i32) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > from_version) {
        debug!("Applying schema migration to version {}", version);
        if !sql.is_empty() {
            tx.execute_batch(sql)?;
        }
        store_schema_version(&tx, *version)?;
    }
    tx.commit()?;

    info!(
        "Migrated database schema from version {} to {}",
        from_version, CURRENT_VERSION
    );
    Ok(())
}
