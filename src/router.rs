use std::collections::HashMap;
use std::io::Read;

use astra::Request;

use crate::config::AppConfig;
use crate::db::connection::Database;
use crate::db::{jobs, pricing, properties};
use crate::domain::{EscheatmentRecord, JobStatus, ProcessedRecord};
use crate::errors::ServerError;
use crate::ingest;
use crate::mailings::{send_letters_for_job, LetterProvider};
use crate::responses::{
    csv_response, html_response, json_response, redirect_response, ResultResp,
};
use crate::spreadsheets::export_job_records_xlsx;
use crate::templates::pages;
use crate::webhooks::{handle_webhook_event, WebhookEvent, WebhookOutcome};

/// Everything a request handler needs, shared across worker threads.
pub struct AppState {
    pub db: Database,
    pub provider: Box<dyn LetterProvider>,
    pub config: AppConfig,
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => html_response(pages::home_page()),

        ("GET", "/upload") => html_response(pages::upload_page()),
        ("GET", "/escheatment/sample.csv") => {
            csv_response(ingest::SAMPLE_CSV, "escheatment-sample.csv")
        }
        ("POST", "/escheatment/upload") => handle_upload(req, state),

        ("GET", "/jobs") => {
            let jobs = jobs::list_jobs(&state.db, &state.config.user_id)?;
            html_response(pages::jobs_page(&jobs))
        }

        ("GET", "/pricing") => {
            let envelopes = pricing::list_envelopes(&state.db)?;
            let rules = state.db.with_conn(|conn| pricing::load_pricing_rules(conn))?;
            html_response(pages::pricing_page(&envelopes, &rules))
        }

        ("POST", "/webhooks/mailing") => handle_webhook(req, state),

        // /jobs/{id}, /jobs/{id}/send, /jobs/{id}/export.xlsx
        ("GET", p) if p.starts_with("/jobs/") => match parse_job_path(p) {
            Some((job_id, None)) => job_detail(state, job_id),
            Some((job_id, Some("export.xlsx"))) => job_export(state, job_id),
            _ => Err(ServerError::NotFound),
        },
        ("POST", p) if p.starts_with("/jobs/") => match parse_job_path(p) {
            Some((job_id, Some("send"))) => {
                send_letters_for_job(&state.db, state.provider.as_ref(), &state.config, job_id)?;
                redirect_response(&format!("/jobs/{job_id}"))
            }
            _ => Err(ServerError::NotFound),
        },

        _ => Err(ServerError::NotFound),
    }
}

fn job_detail(state: &AppState, job_id: i64) -> ResultResp {
    let job = jobs::get_job(&state.db, job_id)?.ok_or(ServerError::NotFound)?;
    let stats = properties::job_statistics(&state.db, job_id)?;
    let records = properties::fetch_records_for_job(&state.db, job_id)?;
    html_response(pages::job_detail_page(&job, &stats, &records))
}

fn job_export(state: &AppState, job_id: i64) -> ResultResp {
    let job = jobs::get_job(&state.db, job_id)?.ok_or(ServerError::NotFound)?;
    let records = properties::fetch_records_for_job(&state.db, job_id)?;
    let filename = format!("{}-records.xlsx", job.job_name.replace(' ', "_"));
    export_job_records_xlsx(&records, &filename)
}

/// Create a job from an uploaded CSV: parse, classify, store, summarize.
/// Accepts either a urlencoded form (job_name + csv fields) or a raw CSV
/// body with the job name in the query string.
fn handle_upload(mut req: Request, state: &AppState) -> ResultResp {
    let query = parse_query(&req);
    let form_content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Failed to read body: {e}")))?;

    let (job_name, csv_text) = if form_content_type {
        let form = parse_form(&body);
        let name = form
            .get("job_name")
            .cloned()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ServerError::BadRequest("missing job_name".into()))?;
        let csv = form
            .get("csv")
            .cloned()
            .ok_or_else(|| ServerError::BadRequest("missing csv field".into()))?;
        (name, csv)
    } else {
        let name = query
            .get("job_name")
            .cloned()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ServerError::BadRequest("missing job_name".into()))?;
        let csv = String::from_utf8(body)
            .map_err(|_| ServerError::BadRequest("CSV body is not valid UTF-8".into()))?;
        (name, csv)
    };

    let batch = ingest::parse_escheatment_csv(csv_text.as_bytes())?;
    if batch.records.is_empty() {
        return Err(ServerError::BadRequest(
            "No valid records found in CSV".into(),
        ));
    }

    let job_id = jobs::create_job(
        &state.db,
        &state.config.user_id,
        job_name.trim(),
        batch.records.len(),
        None,
    )?;

    let (processed, stored) = match classify_and_store(state, job_id, &batch.records) {
        Ok(ok) => ok,
        Err(e) => {
            // The job row already exists; leave it in a terminal state.
            if let Err(mark_err) = state
                .db
                .with_conn(|conn| jobs::set_job_status(conn, job_id, JobStatus::Failed))
            {
                log::warn!("Could not mark job {job_id} Failed after storage error: {mark_err}");
            }
            return Err(e);
        }
    };
    jobs::set_processed_records(&state.db, job_id, stored)?;

    log::info!(
        "Job {job_id} ({}): {} records parsed, {} stored, {} skipped",
        job_name.trim(),
        batch.records.len(),
        stored,
        batch.skipped
    );

    html_response(pages::upload_result_page(
        job_id,
        job_name.trim(),
        &processed,
        stored,
        batch.skipped,
    ))
}

fn handle_webhook(mut req: Request, state: &AppState) -> ResultResp {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Failed to read body: {e}")))?;

    let raw = String::from_utf8(body)
        .map_err(|_| ServerError::BadRequest("webhook payload is not valid UTF-8".into()))?;
    let event: WebhookEvent = serde_json::from_str(&raw)
        .map_err(|e| ServerError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    let outcome = handle_webhook_event(&state.db, &event, &raw)?;
    let matched = outcome == WebhookOutcome::Updated;

    json_response(&serde_json::json!({
        "received": true,
        "matched": matched,
    }))
}

fn classify_and_store(
    state: &AppState,
    job_id: i64,
    records: &[EscheatmentRecord],
) -> Result<(Vec<ProcessedRecord>, usize), ServerError> {
    let processed = properties::process_escheatment_data(&state.db, records)?;
    let stored = properties::store_processed_records(
        &state.db,
        &processed,
        job_id,
        &state.config.user_id,
    )?;
    Ok((processed, stored))
}

/// Splits "/jobs/{id}" and "/jobs/{id}/{action}" into id and action.
fn parse_job_path(path: &str) -> Option<(i64, Option<&str>)> {
    let rest = path.strip_prefix("/jobs/")?;
    let mut parts = rest.splitn(2, '/');
    let id = parts.next()?.parse::<i64>().ok()?;
    match parts.next() {
        None | Some("") => Some((id, None)),
        Some(action) => Some((id, Some(action))),
    }
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    match req.uri().query() {
        Some(q) => url::form_urlencoded::parse(q.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        None => HashMap::new(),
    }
}

fn parse_form(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_paths_parse() {
        assert_eq!(parse_job_path("/jobs/42"), Some((42, None)));
        assert_eq!(parse_job_path("/jobs/42/send"), Some((42, Some("send"))));
        assert_eq!(
            parse_job_path("/jobs/7/export.xlsx"),
            Some((7, Some("export.xlsx")))
        );
        assert_eq!(parse_job_path("/jobs/abc"), None);
        assert_eq!(parse_job_path("/other"), None);
    }
}
