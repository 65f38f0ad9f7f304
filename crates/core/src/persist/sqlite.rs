//! SQLite-backed durable storage.
//!
//! Opens the database, applies pragmas for WAL mode, runs migrations and
//! stores one blob per namespace together with its SHA-256 checksum.

use std::path::Path;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio_rusqlite::{Connection, params, rusqlite};

use super::{Storage, migrations};
use crate::Error;

/// SQLite storage handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread.
#[derive(Clone, Debug)]
pub struct SqliteStorage {
    pub(crate) conn: Connection,
}

impl SqliteStorage {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }
}

fn checksum(blob: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(blob.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl Storage for SqliteStorage {
    /// Read the blob for a namespace.
    ///
    /// A blob whose checksum no longer matches is reported as absent.
    async fn read(&self, namespace: &str) -> Result<Option<String>, Error> {
        let key = namespace.to_string();
        let row = self
            .conn
            .call(move |conn| -> Result<Option<(String, String)>, Error> {
                let mut stmt = conn.prepare("SELECT blob, checksum FROM kv_store WHERE namespace = ?1")?;

                match stmt.query_row(params![key], |row| Ok((row.get(0)?, row.get(1)?))) {
                    Ok(found) => Ok(Some(found)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        Ok(row.and_then(|(blob, stored)| {
            if checksum(&blob) == stored {
                Some(blob)
            } else {
                tracing::warn!(namespace, "stored blob failed checksum verification; ignoring it");
                None
            }
        }))
    }

    /// Insert or replace the blob for a namespace.
    async fn write(&self, namespace: &str, blob: &str) -> Result<(), Error> {
        let key = namespace.to_string();
        let blob = blob.to_string();
        let sum = checksum(&blob);
        let written_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_store (namespace, blob, checksum, written_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(namespace) DO UPDATE SET
                        blob = excluded.blob,
                        checksum = excluded.checksum,
                        written_at = excluded.written_at",
                    params![key, blob, sum, written_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}
