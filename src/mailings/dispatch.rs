// src/mailings/dispatch.rs

use crate::config::AppConfig;
use crate::db::connection::Database;
use crate::db::{jobs, letter_templates, pricing, properties};
use crate::domain::{MailService, PropertyRecord};
use crate::errors::ServerError;
use crate::mailings::letter::{render_letter, wrap_letter_html};
use crate::mailings::provider::{Address, LetterProvider, LetterRequest};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Dispatches every Pending record in a job through the mail provider,
/// one at a time, in insertion order.
///
/// Per record: Pending -> Processing -> In Transit on success, -> Failed on a
/// provider or template error. A failure is local to its record; the loop
/// always moves on to the next one. Afterwards the job goes to Mailed with
/// `mailed_records` set to the attempted batch size (failed sends are counted
/// too) and `total_cost` set from the pricing rules.
///
/// There is no guard against two concurrent dispatches of the same job; both
/// would see the same Pending rows. See DESIGN.md.
pub fn send_letters_for_job(
    db: &Database,
    provider: &dyn LetterProvider,
    cfg: &AppConfig,
    job_id: i64,
) -> Result<DispatchSummary, ServerError> {
    let (records, default_template, certified_template, pricing_rules) =
        db.with_conn(|conn| {
            Ok((
                properties::fetch_pending_for_job(conn, job_id)?,
                letter_templates::get_default_template(conn)?,
                letter_templates::get_certified_template(conn)?,
                pricing::load_pricing_rules(conn)?,
            ))
        })?;

    if records.is_empty() {
        log::info!("Job {job_id}: no pending records to dispatch");
        return Ok(DispatchSummary::default());
    }

    let from = sender_address(cfg);
    let mut summary = DispatchSummary {
        attempted: records.len(),
        ..DispatchSummary::default()
    };

    for record in &records {
        db.with_conn(|conn| properties::mark_processing(conn, record.id))?;

        let template = match record.required_service {
            MailService::Certified => certified_template.as_ref(),
            _ => default_template.as_ref(),
        };

        let result = template
            .ok_or_else(|| {
                ServerError::Provider("No template found for required service".to_string())
            })
            .and_then(|template| {
                let content =
                    wrap_letter_html(&render_letter(&template.content, record, &cfg.company_name));
                let request = LetterRequest {
                    to: recipient_address(record),
                    from: from.clone(),
                    content,
                    mail_service: record.required_service,
                };
                provider
                    .send_letter(&request)
                    .map_err(|e| ServerError::Provider(e.to_string()))
            });

        match result {
            Ok(resp) => {
                db.with_conn(|conn| {
                    properties::mark_in_transit(
                        conn,
                        record.id,
                        resp.tracking_number.as_deref(),
                        &resp.id,
                        properties::now_naive(),
                    )
                })?;
                summary.sent += 1;
            }
            Err(e) => {
                log::error!("Failed to send letter for record {}: {e}", record.id);
                db.with_conn(|conn| properties::mark_failed(conn, record.id))?;
                summary.failed += 1;
            }
        }
    }

    let services: Vec<MailService> = records.iter().map(|r| r.required_service).collect();
    let total_cost = pricing::estimate_batch_cost(&pricing_rules, &services);

    db.with_conn(|conn| {
        jobs::mark_job_mailed(conn, job_id, summary.attempted, Some(total_cost))
    })?;

    log::info!(
        "Job {job_id}: dispatched {} records ({} sent, {} failed)",
        summary.attempted,
        summary.sent,
        summary.failed
    );
    Ok(summary)
}

fn sender_address(cfg: &AppConfig) -> Address {
    Address {
        name: cfg.sender.name.clone(),
        address_line1: cfg.sender.address_line1.clone(),
        address_line2: None,
        city: cfg.sender.city.clone(),
        state: cfg.sender.state.clone(),
        zip_code: cfg.sender.zip_code.clone(),
        country: cfg.sender.country.clone(),
    }
}

fn recipient_address(record: &PropertyRecord) -> Address {
    Address {
        name: record.recipient_name.clone(),
        address_line1: record.street.clone(),
        address_line2: None,
        city: record.city.clone(),
        state: record.state.clone(),
        zip_code: record.zip_code.clone(),
        country: record.country.clone(),
    }
}
