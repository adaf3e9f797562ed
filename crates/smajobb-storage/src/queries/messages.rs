// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message append and history operations.
//!
//! The append re-checks conversation status inside the same transaction as
//! the insert. "Check status, then insert" as two separate calls would let
//! a message land after a freeze decided concurrently; the single
//! transaction closes that race.

use std::collections::BTreeMap;

use rusqlite::{params, OptionalExtension};

use smajobb_core::types::{ConversationId, MessageId, StoredMessage, UserId};
use smajobb_core::GatewayError;

use crate::database::{map_tr_err, Database};
use crate::models::AppendOutcome;

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredMessage> {
    let variables_json: String = row.get(4)?;
    let variables: BTreeMap<String, String> =
        serde_json::from_str(&variables_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
    Ok(StoredMessage {
        id: MessageId(row.get(0)?),
        conversation_id: ConversationId(row.get(1)?),
        sender_id: UserId(row.get(2)?),
        intent: row.get(3)?,
        variables,
        rendered_message: row.get(5)?,
        read: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Append a message iff its conversation is still `active`.
///
/// The status read, the insert, and the `last_message_at` update share one
/// transaction, so a freeze that commits first makes this append fail with
/// [`AppendOutcome::ConversationNotActive`] and write nothing.
pub async fn append(db: &Database, msg: &StoredMessage) -> Result<AppendOutcome, GatewayError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let status: Option<String> = tx
                .query_row(
                    "SELECT status FROM conversations WHERE id = ?1",
                    params![msg.conversation_id.0],
                    |row| row.get(0),
                )
                .optional()?;

            let outcome = match status.as_deref() {
                None => AppendOutcome::ConversationMissing,
                Some(s) if s != "active" => AppendOutcome::ConversationNotActive,
                Some(_) => {
                    let variables_json = serde_json::to_string(&msg.variables)
                        .unwrap_or_else(|_| "{}".to_string());
                    tx.execute(
                        "INSERT INTO messages (id, conversation_id, sender_id, intent, \
                         variables, rendered_message, is_read, created_at) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                        params![
                            msg.id.0,
                            msg.conversation_id.0,
                            msg.sender_id.0,
                            msg.intent,
                            variables_json,
                            msg.rendered_message,
                            msg.read,
                            msg.created_at,
                        ],
                    )?;
                    tx.execute(
                        "UPDATE conversations SET last_message_at = ?1 WHERE id = ?2",
                        params![msg.created_at, msg.conversation_id.0],
                    )?;
                    AppendOutcome::Appended
                }
            };

            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(map_tr_err)
}

/// Message history for a conversation in chronological order.
pub async fn list_for_conversation(
    db: &Database,
    conversation_id: &ConversationId,
) -> Result<Vec<StoredMessage>, GatewayError> {
    let conversation_id = conversation_id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, sender_id, intent, variables, \
                 rendered_message, is_read, created_at \
                 FROM messages WHERE conversation_id = ?1 \
                 ORDER BY created_at ASC, id ASC",
            )?;
            let rows = stmt.query_map(params![conversation_id], message_from_row)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

/// Mark every unread message NOT sent by `reader` as read. Returns the
/// number of messages flipped. This is the fetch-conversation side effect.
pub async fn mark_read_from_other(
    db: &Database,
    conversation_id: &ConversationId,
    reader: &UserId,
) -> Result<usize, GatewayError> {
    let conversation_id = conversation_id.0.clone();
    let reader = reader.0.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE messages SET is_read = 1 \
                 WHERE conversation_id = ?1 AND sender_id <> ?2 AND is_read = 0",
                params![conversation_id, reader],
            )?;
            Ok(changed)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::conversations;
    use smajobb_core::types::test_support::active_conversation;
    use tempfile::tempdir;

    async fn setup() -> (Database, tempfile::TempDir, ConversationId) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messages.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        let convo = active_conversation();
        conversations::create(&db, &convo).await.unwrap();
        (db, dir, convo.id)
    }

    fn make_msg(id: &str, convo: &ConversationId, sender: &str, at: &str) -> StoredMessage {
        StoredMessage {
            id: MessageId(id.to_string()),
            conversation_id: convo.clone(),
            sender_id: UserId::from(sender),
            intent: "confirm_availability".to_string(),
            variables: BTreeMap::new(),
            rendered_message: "I can confirm that I am available for this job.".to_string(),
            read: false,
            created_at: at.to_string(),
        }
    }

    #[tokio::test]
    async fn append_and_list_in_order() {
        let (db, _dir, convo_id) = setup().await;

        for (i, at) in ["2026-02-01T10:00:00.000Z", "2026-02-01T10:01:00.000Z"]
            .iter()
            .enumerate()
        {
            let msg = make_msg(&format!("m{i}"), &convo_id, "minor-1", at);
            assert_eq!(append(&db, &msg).await.unwrap(), AppendOutcome::Appended);
        }

        let messages = list_for_conversation(&db, &convo_id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id.0, "m0");
        assert_eq!(messages[1].id.0, "m1");
    }

    #[tokio::test]
    async fn append_updates_last_message_at() {
        let (db, _dir, convo_id) = setup().await;
        let msg = make_msg("m1", &convo_id, "minor-1", "2026-02-01T10:00:00.000Z");
        append(&db, &msg).await.unwrap();

        let convo = conversations::get(&db, &convo_id).await.unwrap().unwrap();
        assert_eq!(
            convo.last_message_at.as_deref(),
            Some("2026-02-01T10:00:00.000Z")
        );
    }

    #[tokio::test]
    async fn append_to_frozen_conversation_writes_nothing() {
        let (db, _dir, convo_id) = setup().await;
        conversations::freeze(&db, &convo_id, "moderation").await.unwrap();

        let msg = make_msg("m1", &convo_id, "minor-1", "2026-02-01T10:00:00.000Z");
        assert_eq!(
            append(&db, &msg).await.unwrap(),
            AppendOutcome::ConversationNotActive
        );

        let messages = list_for_conversation(&db, &convo_id).await.unwrap();
        assert!(messages.is_empty());
        let convo = conversations::get(&db, &convo_id).await.unwrap().unwrap();
        assert!(convo.last_message_at.is_none());
    }

    #[tokio::test]
    async fn append_to_missing_conversation() {
        let (db, _dir, _convo_id) = setup().await;
        let msg = make_msg(
            "m1",
            &ConversationId::from("ghost"),
            "minor-1",
            "2026-02-01T10:00:00.000Z",
        );
        assert_eq!(
            append(&db, &msg).await.unwrap(),
            AppendOutcome::ConversationMissing
        );
    }

    #[tokio::test]
    async fn mark_read_flips_only_the_other_partys_messages() {
        let (db, _dir, convo_id) = setup().await;
        append(&db, &make_msg("m1", &convo_id, "adult-1", "2026-02-01T10:00:00.000Z"))
            .await
            .unwrap();
        append(&db, &make_msg("m2", &convo_id, "minor-1", "2026-02-01T10:01:00.000Z"))
            .await
            .unwrap();

        // The minor fetches: the adult's message becomes read, their own stays.
        let flipped = mark_read_from_other(&db, &convo_id, &UserId::from("minor-1"))
            .await
            .unwrap();
        assert_eq!(flipped, 1);

        let messages = list_for_conversation(&db, &convo_id).await.unwrap();
        let by_id = |id: &str| messages.iter().find(|m| m.id.0 == id).unwrap();
        assert!(by_id("m1").read);
        assert!(!by_id("m2").read);

        // Second pass finds nothing left to flip.
        let flipped = mark_read_from_other(&db, &convo_id, &UserId::from("minor-1"))
            .await
            .unwrap();
        assert_eq!(flipped, 0);
    }

    #[tokio::test]
    async fn variables_round_trip_as_json() {
        let (db, _dir, convo_id) = setup().await;
        let mut msg = make_msg("m1", &convo_id, "minor-1", "2026-02-01T10:00:00.000Z");
        msg.intent = "propose_time".to_string();
        msg.variables
            .insert("day".to_string(), "Saturday".to_string());
        msg.variables.insert("time".to_string(), "14:00".to_string());
        append(&db, &msg).await.unwrap();

        let messages = list_for_conversation(&db, &convo_id).await.unwrap();
        assert_eq!(messages[0].variables.get("day").unwrap(), "Saturday");
        assert_eq!(messages[0].variables.get("time").unwrap(), "14:00");
    }
}
