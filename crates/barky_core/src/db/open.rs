//! Connection bootstrap for the bookmark store.
//!
//! # Invariants
//! - Returned connections have every migration applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult, StoreLocation};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the bookmark store at `path` and applies all pending migrations.
///
/// # Side effects
/// - Creates the file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(StoreLocation::File(path.to_path_buf()), || Connection::open(path))
}

/// Opens an isolated, empty in-memory bookmark store.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(StoreLocation::Memory, Connection::open_in_memory)
}

fn open_with(
    location: StoreLocation,
    opener: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start mode={} store={}",
        location.mode(),
        location
    );

    let mut conn = match opener() {
        Ok(conn) => conn,
        Err(source) => {
            error!(
                "event=db_open module=db status=error mode={} store={} duration_ms={} error_code=db_open_failed error={}",
                location.mode(),
                location,
                started_at.elapsed().as_millis(),
                source
            );
            return Err(DbError::Open { location, source });
        }
    };

    if let Err(err) = bootstrap_connection(&mut conn) {
        error!(
            "event=db_open module=db status=error mode={} store={} duration_ms={} error_code=db_bootstrap_failed error={}",
            location.mode(),
            location,
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={} store={} duration_ms={}",
        location.mode(),
        location,
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
