// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use smajobb_core::GatewayError;
use tracing::debug;

use crate::migrations;

/// Handle to the gateway's SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

/// Error inside the open-and-migrate closure, which mixes PRAGMA
/// statements with refinery migrations.
#[derive(Debug, thiserror::Error)]
enum SetupError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Migration(#[from] refinery::Error),
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, GatewayError> {
        Self::open_with_options(path, true).await
    }

    /// Open with explicit WAL control. Non-WAL mode exists for read-only
    /// tooling on network filesystems.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, GatewayError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(GatewayError::storage)?;

        conn.call(move |conn| -> Result<(), SetupError> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(|e: tokio_rusqlite::Error<SetupError>| GatewayError::Storage {
            source: Box::new(e),
        })?;

        debug!(path, wal_mode, "database opened and migrated");
        Ok(Database { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(&self) -> Result<(), GatewayError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the gateway error type. Query closures
/// fail with plain `rusqlite::Error`, so this pins the background-call
/// error to `Error<rusqlite::Error>` and lets `?` inside the closures
/// stay annotation-free.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> GatewayError {
    GatewayError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_and_migrates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("open.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        assert!(path.exists());

        // Migrated schema should be queryable.
        let count: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                let n = conn.query_row("SELECT COUNT(*) FROM conversations", [], |r| r.get(0))?;
                Ok(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reopen.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
        // Migrations must not re-apply on a second open.
        let db2 = Database::open(path.to_str().unwrap()).await.unwrap();
        db2.close().await.unwrap();
    }
}
