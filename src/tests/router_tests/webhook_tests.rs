use crate::db::{jobs, properties, webhook_logs};
use crate::domain::{JobStatus, MailStatus};
use crate::errors::ServerError;
use crate::router::{handle, AppState};
use crate::tests::utils::{body_string, get, make_state, post};

const TEST_CSV: &str = "\
recipient_name,street,city,state,zip_code,amount,date_of_last_contact
\"John Smith\",\"123 Main St\",\"New York\",\"NY\",\"10001\",1500.00,\"2023-01-15\"
\"Jane Doe\",\"456 Oak Ave\",\"Los Angeles\",\"CA\",\"90210\",750.00,\"2023-02-20\"
";

/// Upload a batch and dispatch it, returning the job id and the tracking
/// numbers the mock provider assigned.
fn mailed_job(state: &AppState) -> (i64, Vec<String>) {
    handle(
        post("/escheatment/upload?job_name=Webhooks", "text/csv", TEST_CSV),
        state,
    )
    .unwrap();
    let job_id = jobs::list_jobs(&state.db, &state.config.user_id).unwrap()[0].id;

    handle(post(&format!("/jobs/{job_id}/send"), "text/plain", ""), state).unwrap();

    let tracking = properties::fetch_records_for_job(&state.db, job_id)
        .unwrap()
        .into_iter()
        .filter_map(|r| r.tracking_number)
        .collect();
    (job_id, tracking)
}

#[test]
fn delivered_event_updates_record() {
    let state = make_state("wh_delivered");
    let (job_id, tracking) = mailed_job(&state);

    let payload = format!(
        r#"{{"tracking_number":"{}","status":"delivered"}}"#,
        tracking[0]
    );
    let mut resp = handle(
        post("/webhooks/mailing", "application/json", &payload),
        &state,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(&mut resp).contains("\"matched\":true"));

    let records = properties::fetch_records_for_job(&state.db, job_id).unwrap();
    let delivered = records
        .iter()
        .find(|r| r.tracking_number.as_deref() == Some(tracking[0].as_str()))
        .unwrap();
    assert_eq!(delivered.mail_status, MailStatus::Delivered);
    assert!(delivered.delivered_date.is_some());
}

#[test]
fn job_completes_when_every_letter_resolves() {
    let state = make_state("wh_complete");
    let (job_id, tracking) = mailed_job(&state);

    for t in &tracking {
        let payload = format!(r#"{{"tracking_number":"{t}","status":"delivered"}}"#);
        handle(
            post("/webhooks/mailing", "application/json", &payload),
            &state,
        )
        .unwrap();
    }

    let job = jobs::get_job(&state.db, job_id).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
}

#[test]
fn returned_event_increments_job_counter() {
    let state = make_state("wh_returned");
    let (job_id, tracking) = mailed_job(&state);

    let payload = format!(
        r#"{{"tracking_number":"{}","status":"returned_to_sender","returned_scan_url":"https://files.example.com/scan.pdf"}}"#,
        tracking[0]
    );
    handle(
        post("/webhooks/mailing", "application/json", &payload),
        &state,
    )
    .unwrap();

    let job = jobs::get_job(&state.db, job_id).unwrap().unwrap();
    assert_eq!(job.returned_records, 1);

    let records = properties::fetch_records_for_job(&state.db, job_id).unwrap();
    let returned = records
        .iter()
        .find(|r| r.mail_status == MailStatus::Returned)
        .unwrap();
    assert_eq!(
        returned.returned_scan_url.as_deref(),
        Some("https://files.example.com/scan.pdf")
    );
}

#[test]
fn unknown_tracking_is_acked_and_logged() {
    let state = make_state("wh_unknown");
    mailed_job(&state);

    let mut resp = handle(
        post(
            "/webhooks/mailing",
            "application/json",
            r#"{"tracking_number":"TRKNOSUCH01","status":"delivered"}"#,
        ),
        &state,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(&mut resp).contains("\"matched\":false"));

    // Every event lands in the audit log, matched or not.
    let logged = state
        .db
        .with_conn(|conn| webhook_logs::count_webhook_logs(conn))
        .unwrap();
    assert!(logged >= 1);
}

#[test]
fn malformed_payload_is_rejected() {
    let state = make_state("wh_bad_json");

    let result = handle(
        post("/webhooks/mailing", "application/json", "not json"),
        &state,
    );
    assert!(matches!(result, Err(ServerError::BadRequest(_))));
}

#[test]
fn webhook_route_rejects_get() {
    let state = make_state("wh_get");

    let result = handle(get("/webhooks/mailing"), &state);
    assert!(matches!(result, Err(ServerError::NotFound)));
}
