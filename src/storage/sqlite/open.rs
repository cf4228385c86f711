//! Connection bootstrap for the SQLite registry.

use std::path::Path;
use std::time::{Duration, Instant};

use rusqlite::Connection;
use tracing::{error, info};

use super::migrations::apply_migrations;
use crate::storage::error::RegistryResult;

/// Opens a SQLite database file and applies all pending migrations.
pub fn open_db(path: impl AsRef<Path>) -> RegistryResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path).inspect_err(|e| {
        error!(mode = "file", error = %e, "Failed to open registry database");
    })?;
    let conn = bootstrap(conn, "file")?;

    info!(
        mode = "file",
        path = ?path,
        duration_ms = started_at.elapsed().as_millis() as u64,
        "Registry database ready"
    );
    Ok(conn)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> RegistryResult<Connection> {
    let conn = Connection::open_in_memory()?;
    let conn = bootstrap(conn, "memory")?;
    info!(mode = "memory", "Registry database ready");
    Ok(conn)
}

fn bootstrap(mut conn: Connection, mode: &'static str) -> RegistryResult<Connection> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(&mut conn).inspect_err(|e| {
        error!(mode, error = %e, "Failed to migrate registry database");
    })?;
    Ok(conn)
}
