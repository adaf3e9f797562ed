// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit trail. Entries are written and listed, never
//! updated or deleted.

use std::str::FromStr;

use rusqlite::params;

use smajobb_core::GatewayError;

use crate::database::{map_tr_err, Database};
use crate::models::{AuditAction, AuditEntry};

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AuditEntry> {
    let action: String = row.get(1)?;
    Ok(AuditEntry {
        id: row.get(0)?,
        action: AuditAction::from_str(&action).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        actor_id: row.get(2)?,
        subject_id: row.get(3)?,
        target_type: row.get(4)?,
        target_id: row.get(5)?,
        metadata: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert an audit entry and return its row id. `created_at` comes from
/// the database default.
pub async fn record(db: &Database, entry: &AuditEntry) -> Result<i64, GatewayError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO audit_log (action, actor_id, subject_id, target_type, target_id, metadata) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.action.to_string(),
                    entry.actor_id,
                    entry.subject_id,
                    entry.target_type,
                    entry.target_id,
                    entry.metadata,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Entries for one target, oldest first.
pub async fn list_for_target(
    db: &Database,
    target_type: &str,
    target_id: &str,
) -> Result<Vec<AuditEntry>, GatewayError> {
    let target_type = target_type.to_string();
    let target_id = target_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, action, actor_id, subject_id, target_type, target_id, \
                 metadata, created_at \
                 FROM audit_log WHERE target_type = ?1 AND target_id = ?2 \
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![target_type, target_id], entry_from_row)?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}
