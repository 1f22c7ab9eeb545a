// src/webhooks.rs

use serde::Deserialize;

use crate::db::connection::Database;
use crate::db::{jobs, properties, webhook_logs};
use crate::domain::MailStatus;
use crate::errors::ServerError;

/// Inbound delivery-status event from the mail provider.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub lob_letter_id: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    pub status: String,
    #[serde(default)]
    pub returned_scan_url: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A matching property record was updated.
    Updated,
    /// No record matched; event audited and dropped.
    NoMatch,
    /// Status string not part of our lifecycle; event audited and dropped.
    UnknownStatus,
    /// The record already reached a terminal status; a late or duplicate
    /// event must not move it backwards. Audited and dropped.
    Stale,
}

/// Applies one provider event: look the record up by tracking number or
/// provider letter id (first match wins), advance its mail status, and append
/// an audit row. The audit row is written no matter what — unmatched,
/// unknown-status and stale events too. Nothing is retried; a dropped event
/// stays dropped.
///
/// Mail status only moves forward: once a record is Delivered, Returned or
/// Failed, a late `in_transit` (or any other) event leaves it untouched.
pub fn handle_webhook_event(
    db: &Database,
    event: &WebhookEvent,
    raw_payload: &str,
) -> Result<WebhookOutcome, ServerError> {
    db.with_conn(|conn| {
        let record = properties::find_by_tracking_or_letter_id(
            conn,
            event.tracking_number.as_deref(),
            event.lob_letter_id.as_deref(),
        )?;

        let outcome = match record {
            None => {
                log::warn!(
                    "No record found for webhook event (tracking={:?}, letter={:?})",
                    event.tracking_number,
                    event.lob_letter_id
                );
                WebhookOutcome::NoMatch
            }
            Some(record) => match MailStatus::from_provider_event(&event.status) {
                None => {
                    log::warn!(
                        "Unknown webhook status {:?} for record {}",
                        event.status,
                        record.id
                    );
                    WebhookOutcome::UnknownStatus
                }
                Some(_) if record.mail_status.is_terminal() => {
                    log::warn!(
                        "Ignoring late {:?} event for record {}: already {}",
                        event.status,
                        record.id,
                        record.mail_status.as_str()
                    );
                    WebhookOutcome::Stale
                }
                Some(status) => {
                    let now = properties::now_naive();
                    match status {
                        MailStatus::Delivered => {
                            properties::mark_delivered(conn, record.id, now)?;
                        }
                        MailStatus::Returned => {
                            properties::mark_returned(
                                conn,
                                record.id,
                                now,
                                event.returned_scan_url.as_deref(),
                            )?;
                        }
                        other => {
                            properties::set_mail_status(conn, record.id, other)?;
                        }
                    }
                    jobs::refresh_job_after_webhook(conn, record.job_id)?;
                    WebhookOutcome::Updated
                }
            },
        };

        webhook_logs::insert_webhook_log(
            conn,
            &event.status,
            event.lob_letter_id.as_deref(),
            event.tracking_number.as_deref(),
            raw_payload,
            outcome == WebhookOutcome::Updated,
        )?;

        Ok(outcome)
    })
}
