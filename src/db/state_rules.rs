// src/db/state_rules.rs

use std::collections::HashMap;

use rusqlite::Connection;

use crate::db::connection::Database;
use crate::domain::StateRule;
use crate::errors::ServerError;

fn rule_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StateRule> {
    Ok(StateRule {
        id: row.get(0)?,
        state_code: row.get(1)?,
        state_name: row.get(2)?,
        min_amount_certified: row.get(3)?,
        min_amount_standard: row.get(4)?,
        certified_mail_required: row.get(5)?,
    })
}

/// Bulk-loads every state rule into a map keyed by state code, so a
/// classification batch does one query instead of one per record. The map
/// lives only for the batch; nothing is cached across uploads.
pub fn load_state_rules(db: &Database) -> Result<HashMap<String, StateRule>, ServerError> {
    db.with_conn(|conn| load_state_rules_conn(conn))
}

pub fn load_state_rules_conn(
    conn: &Connection,
) -> Result<HashMap<String, StateRule>, ServerError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, state_code, state_name,
               min_amount_certified, min_amount_standard, certified_mail_required
        FROM state_rules
        "#,
    )?;

    let rows = stmt.query_map([], rule_from_row)?;

    let mut map = HashMap::new();
    for rule in rows {
        let rule = rule?;
        map.insert(rule.state_code.clone(), rule);
    }
    Ok(map)
}
