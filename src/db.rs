// ==========================================
// Community Dashboard Loader - SQLite connection setup
// ==========================================
// Goals:
// - every Connection::open goes through the same PRAGMA / busy_timeout setup
// - staging schema and procedure registry bootstrap for local environments
// ==========================================

use crate::config::StagingTargets;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Registry of named transform procedures (name → SQL script)
pub const PROCEDURE_TABLE: &str = "staging_procedure";

/// Column list of both staging tables, in insert order
pub const STAGING_COLUMNS: [&str; 7] = [
    "IndicatorName",
    "Period",
    "Date",
    "DataValue",
    "DataValue2",
    "Specialty",
    "source",
];

/// Shared PRAGMAs; both are per-connection settings.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open (creating if needed) and configure.
pub fn open_sqlite_connection<P: AsRef<Path>>(db_path: P) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Open an existing database only; a missing file is an error rather than a new empty store.
pub fn open_existing_sqlite_connection<P: AsRef<Path>>(db_path: P) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Quote an identifier for interpolation into SQL.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn staging_table_ddl(table: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            "IndicatorName" TEXT,
            "Period" TEXT,
            "Date" TEXT,
            "DataValue" REAL,
            "DataValue2" REAL,
            "Specialty" TEXT,
            "source" TEXT
        );
        "#,
        quote_ident(table)
    )
}

/// Create both staging tables and the procedure registry if absent.
pub fn init_staging_schema(conn: &Connection, targets: &StagingTargets) -> rusqlite::Result<()> {
    let mut ddl = String::new();
    ddl.push_str(&staging_table_ddl(&targets.primary_table));
    ddl.push_str(&staging_table_ddl(&targets.community_table));
    ddl.push_str(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            name TEXT PRIMARY KEY,
            body TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
        PROCEDURE_TABLE
    ));
    conn.execute_batch(&ddl)
}

/// Register or replace a named procedure body.
pub fn register_procedure(conn: &Connection, name: &str, body: &str) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO {} (name, body) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET body = excluded.body, updated_at = datetime('now')",
            PROCEDURE_TABLE
        ),
        params![name, body],
    )?;
    Ok(())
}
