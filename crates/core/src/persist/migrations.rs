//! Schema setup for the SQLite store.
//!
//! The schema version lives in `PRAGMA user_version`. Step `n` of [`STEPS`]
//! moves the database from version `n` to `n + 1`.

use tokio_rusqlite::Connection;

use crate::Error;

const STEPS: &[&str] = &[include_str!("../../migrations/001_kv_store.sql")];

/// Schema version this build writes.
pub const SCHEMA_VERSION: i64 = STEPS.len() as i64;

/// Bring the schema up to [`SCHEMA_VERSION`].
///
/// Each step runs in its own transaction together with the version bump. A
/// database written by a newer build is refused.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let found: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if found > SCHEMA_VERSION {
            return Err(Error::MigrationFailed(format!(
                "database schema version {found} is newer than supported version {SCHEMA_VERSION}"
            )));
        }

        for (step, sql) in (found..SCHEMA_VERSION).zip(STEPS.iter().skip(found as usize)) {
            let tx = conn.transaction()?;
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", step + 1)?;
            tx.commit()?;
            tracing::debug!(version = step + 1, "applied storage schema step");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
