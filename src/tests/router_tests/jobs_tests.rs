use crate::db::{jobs, properties};
use crate::domain::{JobStatus, MailStatus};
use crate::errors::ServerError;
use crate::router::{handle, AppState};
use crate::tests::utils::{body_string, get, header, make_state, post};

const TEST_CSV: &str = "\
recipient_name,street,city,state,zip_code,amount,date_of_last_contact
\"John Smith\",\"123 Main St\",\"New York\",\"NY\",\"10001\",1500.00,\"2023-01-15\"
\"Jane Doe\",\"456 Oak Ave\",\"Los Angeles\",\"CA\",\"90210\",750.00,\"2023-02-20\"
";

fn upload_job(state: &AppState, name: &str) -> i64 {
    let resp = handle(
        post(
            &format!("/escheatment/upload?job_name={name}"),
            "text/csv",
            TEST_CSV,
        ),
        state,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    jobs::list_jobs(&state.db, &state.config.user_id).unwrap()[0].id
}

#[test]
fn jobs_page_lists_uploaded_jobs() {
    let state = make_state("jobs_list");
    upload_job(&state, "AuditBatch");

    let mut resp = handle(get("/jobs"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(&mut resp).contains("AuditBatch"));
}

#[test]
fn job_detail_shows_records() {
    let state = make_state("job_detail");
    let job_id = upload_job(&state, "DetailJob");

    let mut resp = handle(get(&format!("/jobs/{job_id}")), &state).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("DetailJob"));
    assert!(body.contains("John Smith"));
}

#[test]
fn unknown_job_is_not_found() {
    let state = make_state("job_missing");

    let result = handle(get("/jobs/999"), &state);
    assert!(matches!(result, Err(ServerError::NotFound)));
}

#[test]
fn send_dispatches_pending_letters() {
    let state = make_state("job_send");
    let job_id = upload_job(&state, "SendJob");

    let resp = handle(post(&format!("/jobs/{job_id}/send"), "text/plain", ""), &state).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), format!("/jobs/{job_id}"));

    let job = jobs::get_job(&state.db, job_id).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Mailed);
    assert_eq!(job.mailed_records, 2);
    assert!(job.total_cost.is_some());

    let records = properties::fetch_records_for_job(&state.db, job_id).unwrap();
    for record in &records {
        assert_eq!(record.mail_status, MailStatus::InTransit);
        assert!(record.tracking_number.is_some());
        assert!(record.provider_letter_id.is_some());
    }
}

#[test]
fn export_returns_spreadsheet() {
    let state = make_state("job_export");
    let job_id = upload_job(&state, "ExportJob");

    let resp = handle(get(&format!("/jobs/{job_id}/export.xlsx")), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "Content-Type").contains("spreadsheetml"));
    assert!(header(&resp, "Content-Disposition").contains("ExportJob-records.xlsx"));
}

#[test]
fn pricing_page_lists_seeded_rules() {
    let state = make_state("pricing_page");

    let mut resp = handle(get("/pricing"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("base_postage"));
}
