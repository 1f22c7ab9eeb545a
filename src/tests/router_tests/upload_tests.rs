use crate::db::jobs;
use crate::db::properties;
use crate::domain::{JobStatus, MailService};
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, header, make_state, post};

const TEST_CSV: &str = "\
recipient_name,street,city,state,zip_code,amount,date_of_last_contact
\"John Smith\",\"123 Main St\",\"New York\",\"NY\",\"10001\",1500.00,\"2023-01-15\"
\"Jane Doe\",\"456 Oak Ave\",\"Los Angeles\",\"CA\",\"90210\",750.00,\"2023-02-20\"
\"Tiny Claim\",\"9 Low St\",\"Albany\",\"NY\",\"12207\",10.00,\"2023-04-01\"
";

#[test]
fn upload_creates_job_and_stores_records() {
    let state = make_state("upload_creates");

    let mut resp = handle(
        post("/escheatment/upload?job_name=Q1%20Batch", "text/csv", TEST_CSV),
        &state,
    )
    .unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("Q1 Batch"));

    let jobs = jobs::list_jobs(&state.db, &state.config.user_id).unwrap();
    assert_eq!(jobs.len(), 1);
    let job = &jobs[0];
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.total_records, 3);
    // The $10 NY claim falls below every threshold and is never stored.
    assert_eq!(job.processed_records, 2);

    let records = properties::fetch_records_for_job(&state.db, job.id).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| r.required_service != MailService::NotRequired));
}

#[test]
fn upload_accepts_urlencoded_form() {
    let state = make_state("upload_form");

    let form = format!(
        "job_name=Form+Job&csv={}",
        url::form_urlencoded::byte_serialize(TEST_CSV.as_bytes()).collect::<String>()
    );
    let resp = handle(
        post(
            "/escheatment/upload",
            "application/x-www-form-urlencoded",
            &form,
        ),
        &state,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    let jobs = jobs::list_jobs(&state.db, &state.config.user_id).unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].job_name, "Form Job");
}

#[test]
fn upload_without_job_name_is_rejected() {
    let state = make_state("upload_no_name");

    let result = handle(post("/escheatment/upload", "text/csv", TEST_CSV), &state);
    assert!(matches!(result, Err(ServerError::BadRequest(_))));
    assert!(jobs::list_jobs(&state.db, &state.config.user_id)
        .unwrap()
        .is_empty());
}

#[test]
fn upload_with_no_valid_rows_is_rejected() {
    let state = make_state("upload_empty");

    let result = handle(
        post(
            "/escheatment/upload?job_name=Empty",
            "text/csv",
            "recipient_name,street\nonly,two\n",
        ),
        &state,
    );
    assert!(matches!(result, Err(ServerError::BadRequest(_))));
}

#[test]
fn sample_csv_is_downloadable() {
    let state = make_state("sample_csv");

    let mut resp = handle(get("/escheatment/sample.csv"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "Content-Type").starts_with("text/csv"));
    assert!(body_string(&mut resp).contains("recipient_name"));
}
