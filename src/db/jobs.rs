// src/db/jobs.rs

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::connection::Database;
use crate::domain::{JobStatus, LetterJob};
use crate::errors::ServerError;

fn job_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LetterJob> {
    let status: String = row.get(8)?;
    Ok(LetterJob {
        id: row.get(0)?,
        user_id: row.get(1)?,
        job_name: row.get(2)?,
        upload_date: row.get(3)?,
        total_records: row.get(4)?,
        processed_records: row.get(5)?,
        mailed_records: row.get(6)?,
        returned_records: row.get(7)?,
        status: JobStatus::parse(&status).unwrap_or(JobStatus::Processing),
        template_id: row.get(9)?,
        total_cost: row.get(10)?,
    })
}

const JOB_COLUMNS: &str = r#"
    id, user_id, job_name, upload_date,
    total_records, processed_records, mailed_records, returned_records,
    status, template_id, total_cost
"#;

/// Creates a job row for a freshly uploaded batch. Starts in Processing.
pub fn create_job(
    db: &Database,
    user_id: &str,
    job_name: &str,
    total_records: usize,
    template_id: Option<i64>,
) -> Result<i64, ServerError> {
    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO letter_jobs (user_id, job_name, total_records, template_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![user_id, job_name, total_records as i64, template_id],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

pub fn get_job(db: &Database, job_id: i64) -> Result<Option<LetterJob>, ServerError> {
    db.with_conn(|conn| get_job_conn(conn, job_id))
}

pub fn get_job_conn(conn: &Connection, job_id: i64) -> Result<Option<LetterJob>, ServerError> {
    let job = conn
        .query_row(
            &format!("SELECT {JOB_COLUMNS} FROM letter_jobs WHERE id = ?1"),
            params![job_id],
            job_from_row,
        )
        .optional()?;
    Ok(job)
}

/// All jobs for the tracking page, newest upload first.
pub fn list_jobs(db: &Database, user_id: &str) -> Result<Vec<LetterJob>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {JOB_COLUMNS} FROM letter_jobs WHERE user_id = ?1 ORDER BY upload_date DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![user_id], job_from_row)?;

        let mut jobs = Vec::new();
        for job in rows {
            jobs.push(job?);
        }
        Ok(jobs)
    })
}

/// Records how many rows survived classification and were stored.
pub fn set_processed_records(
    db: &Database,
    job_id: i64,
    processed: usize,
) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE letter_jobs SET processed_records = ?1 WHERE id = ?2",
            params![processed as i64, job_id],
        )?;
        Ok(())
    })
}

/// Marks a dispatched job Mailed. `mailed` is the attempted batch size, not
/// the count of successful sends.
pub fn mark_job_mailed(
    conn: &Connection,
    job_id: i64,
    mailed: usize,
    total_cost: Option<f64>,
) -> Result<(), ServerError> {
    conn.execute(
        r#"
        UPDATE letter_jobs
        SET status = ?1, mailed_records = ?2, total_cost = ?3
        WHERE id = ?4
        "#,
        params![JobStatus::Mailed.as_str(), mailed as i64, total_cost, job_id],
    )?;
    Ok(())
}

pub fn set_job_status(conn: &Connection, job_id: i64, status: JobStatus) -> Result<(), ServerError> {
    conn.execute(
        "UPDATE letter_jobs SET status = ?1 WHERE id = ?2",
        params![status.as_str(), job_id],
    )?;
    Ok(())
}

/// Refreshes the returned-records counter from the property table and, once a
/// Mailed job has no records still in flight, advances it to Completed.
pub fn refresh_job_after_webhook(conn: &Connection, job_id: i64) -> Result<(), ServerError> {
    conn.execute(
        r#"
        UPDATE letter_jobs
        SET returned_records = (
            SELECT COUNT(*) FROM unclaimed_property
            WHERE job_id = ?1 AND mail_status = 'Returned'
        )
        WHERE id = ?1
        "#,
        params![job_id],
    )?;

    let in_flight: i64 = conn.query_row(
        r#"
        SELECT COUNT(*) FROM unclaimed_property
        WHERE job_id = ?1 AND mail_status IN ('Pending', 'Processing', 'In Transit')
        "#,
        params![job_id],
        |r| r.get(0),
    )?;

    if in_flight == 0 {
        conn.execute(
            "UPDATE letter_jobs SET status = 'Completed' WHERE id = ?1 AND status = 'Mailed'",
            params![job_id],
        )?;
    }
    Ok(())
}
