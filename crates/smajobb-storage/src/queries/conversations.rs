// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state machine operations.
//!
//! The status transition is one-way: `active -> frozen`, enforced by a
//! conditional update. There is deliberately no unfreeze query in this
//! subsystem.

use rusqlite::params;

use smajobb_core::types::{
    AgeBracket, Conversation, ConversationId, ConversationStatus, JobRef, Participant,
    ParticipantRole, UserId,
};
use smajobb_core::GatewayError;

use crate::database::{map_tr_err, Database};

const SELECT_COLUMNS: &str = "id, participant_a_id, participant_a_role, participant_a_bracket, \
     participant_b_id, participant_b_role, participant_b_bracket, \
     status, frozen_at, frozen_reason, job_ref, last_message_at, blocked_count, created_at";

/// Parse a strum-backed enum column, surfacing bad data as a conversion
/// failure instead of a panic.
fn parse<T>(idx: usize, value: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = strum::ParseError>,
{
    value.parse().map_err(|e: strum::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Map a row with [`SELECT_COLUMNS`] ordering into a [`Conversation`].
pub(crate) fn conversation_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    let a_role: String = row.get(2)?;
    let a_bracket: String = row.get(3)?;
    let b_role: String = row.get(5)?;
    let b_bracket: String = row.get(6)?;
    let status: String = row.get(7)?;

    Ok(Conversation {
        id: ConversationId(row.get(0)?),
        participant_a: Participant {
            user_id: UserId(row.get(1)?),
            role: parse(2, a_role)?,
            age_bracket: parse(3, a_bracket)?,
        },
        participant_b: Participant {
            user_id: UserId(row.get(4)?),
            role: parse(5, b_role)?,
            age_bracket: parse(6, b_bracket)?,
        },
        status: parse(7, status)?,
        frozen_at: row.get(8)?,
        frozen_reason: row.get(9)?,
        job_ref: row.get::<_, Option<String>>(10)?.map(JobRef),
        last_message_at: row.get(11)?,
        blocked_count: row.get(12)?,
        created_at: row.get(13)?,
    })
}

/// Insert a new conversation. Called by the job subsystem when a job
/// application creates a messaging relationship, and by tests.
pub async fn create(db: &Database, convo: &Conversation) -> Result<(), GatewayError> {
    let convo = convo.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversations (id, participant_a_id, participant_a_role, participant_a_bracket, \
                 participant_b_id, participant_b_role, participant_b_bracket, \
                 status, frozen_at, frozen_reason, job_ref, last_message_at, blocked_count, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    convo.id.0,
                    convo.participant_a.user_id.0,
                    convo.participant_a.role.to_string(),
                    convo.participant_a.age_bracket.to_string(),
                    convo.participant_b.user_id.0,
                    convo.participant_b.role.to_string(),
                    convo.participant_b.age_bracket.to_string(),
                    convo.status.to_string(),
                    convo.frozen_at,
                    convo.frozen_reason,
                    convo.job_ref.as_ref().map(|j| j.0.clone()),
                    convo.last_message_at,
                    convo.blocked_count,
                    convo.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a conversation by id.
pub async fn get(db: &Database, id: &ConversationId) -> Result<Option<Conversation>, GatewayError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM conversations WHERE id = ?1"
            ))?;
            match stmt.query_row(params![id], conversation_from_row) {
                Ok(convo) => Ok(Some(convo)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Freeze a conversation. One-way compare-and-set: the update only lands
/// when the row is still `active`, so concurrent freezes are idempotent.
/// Returns whether this call performed the transition.
pub async fn freeze(
    db: &Database,
    id: &ConversationId,
    reason: &str,
) -> Result<bool, GatewayError> {
    let id = id.0.clone();
    let reason = reason.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE conversations SET status = ?1, \
                 frozen_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), \
                 frozen_reason = ?2 \
                 WHERE id = ?3 AND status = ?4",
                params![
                    ConversationStatus::Frozen.to_string(),
                    reason,
                    id,
                    ConversationStatus::Active.to_string(),
                ],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Increment the conversation's blocked-send counter and return the new
/// count. Used to drive the automatic freeze threshold.
pub async fn record_violation(db: &Database, id: &ConversationId) -> Result<u32, GatewayError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let count = conn.query_row(
                "UPDATE conversations SET blocked_count = blocked_count + 1 \
                 WHERE id = ?1 RETURNING blocked_count",
                params![id],
                |row| row.get::<_, u32>(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}
