// src/db/letter_templates.rs

use rusqlite::{Connection, OptionalExtension};

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct LetterTemplate {
    pub id: i64,
    pub user_id: Option<String>,
    pub name: String,
    pub content: String,
    pub is_default: bool,
}

fn template_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LetterTemplate> {
    Ok(LetterTemplate {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        content: row.get(3)?,
        is_default: row.get(4)?,
    })
}

const TEMPLATE_COLUMNS: &str = "id, user_id, name, content, is_default";

/// The default template used for standard-tier letters.
pub fn get_default_template(conn: &Connection) -> Result<Option<LetterTemplate>, ServerError> {
    let t = conn
        .query_row(
            &format!(
                "SELECT {TEMPLATE_COLUMNS} FROM letter_templates WHERE is_default = 1 LIMIT 1"
            ),
            [],
            template_from_row,
        )
        .optional()?;
    Ok(t)
}

/// Certified-tier letters use the template whose name carries "Certified".
pub fn get_certified_template(conn: &Connection) -> Result<Option<LetterTemplate>, ServerError> {
    let t = conn
        .query_row(
            &format!(
                "SELECT {TEMPLATE_COLUMNS} FROM letter_templates
                 WHERE name LIKE '%Certified%' ORDER BY id LIMIT 1"
            ),
            [],
            template_from_row,
        )
        .optional()?;
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::Database;
    use std::time::{SystemTime, UNIX_EPOCH};

    const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

    fn make_test_db() -> Database {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut p = std::env::temp_dir();
        p.push(format!("templates_test_{nanos}.sqlite"));
        let db = Database::new(p.to_string_lossy().to_string());
        db.with_conn(|conn| {
            conn.execute_batch(SCHEMA_SQL)
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .expect("schema init failed");
        db
    }

    #[test]
    fn seeded_templates_resolve_by_tier() {
        let db = make_test_db();
        db.with_conn(|conn| {
            let default = get_default_template(conn)?.expect("default template seeded");
            assert!(default.is_default);
            assert!(default.content.contains("{{recipient_name}}"));

            let certified = get_certified_template(conn)?.expect("certified template seeded");
            assert!(certified.name.contains("Certified"));
            assert_ne!(certified.id, default.id);
            Ok(())
        })
        .unwrap();
    }
}
