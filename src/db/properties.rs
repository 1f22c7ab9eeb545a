// src/db/properties.rs

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::connection::Database;
use crate::db::state_rules;
use crate::domain::classify::determine_required_service;
use crate::domain::{
    EscheatmentRecord, MailService, MailStatus, ProcessedRecord, PropertyRecord,
};
use crate::errors::ServerError;

/// Classification pass over a raw batch: loads the state rules once, resolves
/// each record's rule and tier. A missing rule is never an error — the
/// classifier's fallback branch handles it.
pub fn process_escheatment_data(
    db: &Database,
    records: &[EscheatmentRecord],
) -> Result<Vec<ProcessedRecord>, ServerError> {
    let rules = state_rules::load_state_rules(db)?;

    let processed = records
        .iter()
        .map(|record| {
            let rule = rules.get(record.state.as_str());
            ProcessedRecord {
                record: record.clone(),
                required_service: determine_required_service(record.amount, rule),
                state_rule: rule.cloned(),
            }
        })
        .collect();

    Ok(processed)
}

/// Persists a classified batch as unclaimed_property rows with
/// `mail_status = Pending`. Records classified Not Required are filtered out
/// before storage and never hit the table. The whole insert runs in one
/// transaction: it succeeds or fails as a unit.
///
/// Returns the number of rows stored.
pub fn store_processed_records(
    db: &Database,
    processed: &[ProcessedRecord],
    job_id: i64,
    user_id: &str,
) -> Result<usize, ServerError> {
    let to_store: Vec<&ProcessedRecord> = processed
        .iter()
        .filter(|p| p.required_service != MailService::NotRequired)
        .collect();

    if to_store.is_empty() {
        return Ok(0);
    }

    db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO unclaimed_property (
                    user_id, job_id, recipient_name,
                    street, city, state, zip_code, country,
                    amount, date_of_last_contact, state_of_property,
                    required_service, mail_status
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'USA', ?8, ?9, ?10, ?11, ?12)
                "#,
            )?;

            for p in &to_store {
                let r = &p.record;
                stmt.execute(params![
                    user_id,
                    job_id,
                    &r.recipient_name,
                    &r.street,
                    &r.city,
                    &r.state,
                    &r.zip_code,
                    r.amount,
                    r.date_of_last_contact.as_deref(),
                    &r.state,
                    p.required_service.as_str(),
                    MailStatus::Pending.as_str(),
                ])?;
            }
        }

        tx.commit().map_err(|e| ServerError::DbError(e.to_string()))?;
        Ok(to_store.len())
    })
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PropertyRecord> {
    let required_service: String = row.get(13)?;
    let mail_status: String = row.get(14)?;
    Ok(PropertyRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        job_id: row.get(2)?,
        recipient_name: row.get(3)?,
        street: row.get(4)?,
        city: row.get(5)?,
        state: row.get(6)?,
        zip_code: row.get(7)?,
        country: row.get(8)?,
        amount: row.get(9)?,
        date_of_last_contact: row.get(10)?,
        state_of_property: row.get(11)?,
        tracking_number: row.get(12)?,
        required_service: MailService::parse(&required_service)
            .unwrap_or(MailService::Standard),
        mail_status: MailStatus::parse(&mail_status).unwrap_or(MailStatus::Pending),
        provider_letter_id: row.get(15)?,
        returned_scan_url: row.get(16)?,
        mailed_date: row.get(17)?,
        delivered_date: row.get(18)?,
        returned_date: row.get(19)?,
    })
}

const RECORD_COLUMNS: &str = r#"
    id, user_id, job_id, recipient_name,
    street, city, state, zip_code, country,
    amount, date_of_last_contact, state_of_property, tracking_number,
    required_service, mail_status,
    provider_letter_id, returned_scan_url,
    mailed_date, delivered_date, returned_date
"#;

/// Records still waiting to be dispatched, in insertion order.
pub fn fetch_pending_for_job(
    conn: &Connection,
    job_id: i64,
) -> Result<Vec<PropertyRecord>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM unclaimed_property
        WHERE job_id = ?1 AND mail_status = 'Pending'
        ORDER BY id
        "#
    ))?;
    let rows = stmt.query_map(params![job_id], record_from_row)?;

    let mut records = Vec::new();
    for r in rows {
        records.push(r?);
    }
    Ok(records)
}

/// Every record in a job, newest first, for the tracking detail page.
pub fn fetch_records_for_job(
    db: &Database,
    job_id: i64,
) -> Result<Vec<PropertyRecord>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM unclaimed_property
            WHERE job_id = ?1
            ORDER BY created_at DESC, id DESC
            "#
        ))?;
        let rows = stmt.query_map(params![job_id], record_from_row)?;

        let mut records = Vec::new();
        for r in rows {
            records.push(r?);
        }
        Ok(records)
    })
}

pub fn mark_processing(conn: &Connection, record_id: i64) -> Result<(), ServerError> {
    conn.execute(
        "UPDATE unclaimed_property SET mail_status = 'Processing' WHERE id = ?1",
        params![record_id],
    )?;
    Ok(())
}

/// Provider accepted the letter: store its identifiers and move to In Transit.
pub fn mark_in_transit(
    conn: &Connection,
    record_id: i64,
    tracking_number: Option<&str>,
    provider_letter_id: &str,
    mailed_at: NaiveDateTime,
) -> Result<(), ServerError> {
    conn.execute(
        r#"
        UPDATE unclaimed_property
        SET mail_status = 'In Transit',
            tracking_number = ?1,
            provider_letter_id = ?2,
            mailed_date = ?3
        WHERE id = ?4
        "#,
        params![tracking_number, provider_letter_id, mailed_at, record_id],
    )?;
    Ok(())
}

pub fn mark_failed(conn: &Connection, record_id: i64) -> Result<(), ServerError> {
    conn.execute(
        "UPDATE unclaimed_property SET mail_status = 'Failed' WHERE id = ?1",
        params![record_id],
    )?;
    Ok(())
}

/// Webhook lookup: tracking number first, then provider letter id. First
/// match wins.
pub fn find_by_tracking_or_letter_id(
    conn: &Connection,
    tracking_number: Option<&str>,
    provider_letter_id: Option<&str>,
) -> Result<Option<PropertyRecord>, ServerError> {
    let record = conn
        .query_row(
            &format!(
                r#"
                SELECT {RECORD_COLUMNS}
                FROM unclaimed_property
                WHERE (?1 IS NOT NULL AND tracking_number = ?1)
                   OR (?2 IS NOT NULL AND provider_letter_id = ?2)
                ORDER BY id
                LIMIT 1
                "#
            ),
            params![tracking_number, provider_letter_id],
            record_from_row,
        )
        .optional()?;
    Ok(record)
}

pub fn mark_delivered(
    conn: &Connection,
    record_id: i64,
    delivered_at: NaiveDateTime,
) -> Result<(), ServerError> {
    conn.execute(
        "UPDATE unclaimed_property SET mail_status = 'Delivered', delivered_date = ?1 WHERE id = ?2",
        params![delivered_at, record_id],
    )?;
    Ok(())
}

pub fn mark_returned(
    conn: &Connection,
    record_id: i64,
    returned_at: NaiveDateTime,
    scan_url: Option<&str>,
) -> Result<(), ServerError> {
    conn.execute(
        r#"
        UPDATE unclaimed_property
        SET mail_status = 'Returned', returned_date = ?1, returned_scan_url = ?2
        WHERE id = ?3
        "#,
        params![returned_at, scan_url, record_id],
    )?;
    Ok(())
}

pub fn set_mail_status(
    conn: &Connection,
    record_id: i64,
    status: MailStatus,
) -> Result<(), ServerError> {
    conn.execute(
        "UPDATE unclaimed_property SET mail_status = ?1 WHERE id = ?2",
        params![status.as_str(), record_id],
    )?;
    Ok(())
}

/// Per-status counts for one job's records.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct JobStatistics {
    pub total: i64,
    pub pending: i64,
    pub processing: i64,
    pub in_transit: i64,
    pub delivered: i64,
    pub returned: i64,
    pub failed: i64,
}

pub fn job_statistics(db: &Database, job_id: i64) -> Result<JobStatistics, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            r#"
            SELECT mail_status, COUNT(*)
            FROM unclaimed_property
            WHERE job_id = ?1
            GROUP BY mail_status
            "#,
        )?;
        let rows = stmt.query_map(params![job_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut stats = JobStatistics::default();
        for row in rows {
            let (status, count) = row?;
            stats.total += count;
            match MailStatus::parse(&status) {
                Some(MailStatus::Pending) => stats.pending = count,
                Some(MailStatus::Processing) => stats.processing = count,
                Some(MailStatus::InTransit) => stats.in_transit = count,
                Some(MailStatus::Delivered) => stats.delivered = count,
                Some(MailStatus::Returned) => stats.returned = count,
                Some(MailStatus::Failed) => stats.failed = count,
                None => {}
            }
        }
        Ok(stats)
    })
}

pub fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}
