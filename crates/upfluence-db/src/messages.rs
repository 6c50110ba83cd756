use crate::Database;
use crate::models::{MessageRow, NewMessage, col_enum, col_opt_uuid, col_timestamp, col_uuid};
use anyhow::Result;
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

use upfluence_types::api::MessageFolder;
use upfluence_types::models::{Message, MessageStatus};

impl Database {
    pub fn insert_message(&self, message: &NewMessage) -> Result<Message> {
        self.with_conn_mut(|conn| insert_message(conn, message))
    }

    /// Messages received (inbox) or sent by `user_id`, newest first, joined
    /// with the other party's display name.
    pub fn list_messages(&self, user_id: Uuid, folder: MessageFolder, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let (owner, counterpart) = match folder {
                MessageFolder::Inbox => ("receiver_id", "sender_id"),
                MessageFolder::Sent => ("sender_id", "receiver_id"),
            };
            let sql = format!(
                "SELECT m.id, m.sender_id, m.receiver_id, m.campaign_id, m.subject, m.content, m.status, m.created_at, u.name
                 FROM messages m
                 JOIN users u ON u.id = m.{counterpart}
                 WHERE m.{owner} = ?1
                 ORDER BY m.created_at DESC, m.rowid DESC
                 LIMIT ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![user_id.to_string(), limit], |row| {
                    Ok(MessageRow {
                        message: map_message(row)?,
                        counterpart_name: row.get(8)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Marks a message READ. Only the receiver may do so; returns false when
    /// no message with that id was addressed to `receiver_id`.
    pub fn mark_message_read(&self, id: Uuid, receiver_id: Uuid) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE messages SET status = ?1 WHERE id = ?2 AND receiver_id = ?3",
                params![MessageStatus::Read.as_str(), id.to_string(), receiver_id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }
}

pub(crate) fn insert_message(conn: &Connection, message: &NewMessage) -> Result<Message> {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO messages (id, sender_id, receiver_id, campaign_id, subject, content, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id.to_string(),
            message.sender_id.to_string(),
            message.receiver_id.to_string(),
            message.campaign_id.map(|c| c.to_string()),
            message.subject,
            message.content,
            message.status.as_str(),
        ],
    )?;
    let row = conn.query_row(
        "SELECT id, sender_id, receiver_id, campaign_id, subject, content, status, created_at
         FROM messages WHERE id = ?1",
        [id.to_string()],
        map_message,
    )?;
    Ok(row)
}

fn map_message(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: col_uuid(row, 0)?,
        sender_id: col_uuid(row, 1)?,
        receiver_id: col_uuid(row, 2)?,
        campaign_id: col_opt_uuid(row, 3)?,
        subject: row.get(4)?,
        content: row.get(5)?,
        status: col_enum(row, 6)?,
        created_at: col_timestamp(row, 7)?,
    })
}
