// src/db/webhook_logs.rs

use rusqlite::{params, Connection};

use crate::errors::ServerError;

/// Appends one audit row per inbound provider event. Append-only: nothing in
/// the codebase updates or deletes these rows.
pub fn insert_webhook_log(
    conn: &Connection,
    event_type: &str,
    provider_letter_id: Option<&str>,
    tracking_number: Option<&str>,
    payload: &str,
    processed: bool,
) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        INSERT INTO webhook_logs (event_type, provider_letter_id, tracking_number, payload, processed)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![event_type, provider_letter_id, tracking_number, payload, processed],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn count_webhook_logs(conn: &Connection) -> Result<i64, ServerError> {
    let count = conn.query_row("SELECT COUNT(*) FROM webhook_logs", [], |r| r.get(0))?;
    Ok(count)
}
