// templates/pages/upload.rs

use crate::domain::{MailService, ProcessedRecord};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn upload_page() -> Markup {
    desktop_layout(
        "Upload",
        html! {
            h1 { "Upload Escheatment Records" }
            p {
                "Paste or upload a CSV with columns: recipient_name, street, "
                "city, state, zip_code, amount, date_of_last_contact (optional). "
                a href="/escheatment/sample.csv" { "Download a sample file" } "."
            }
            form method="post" action="/escheatment/upload" {
                label for="job_name" { "Job name" }
                input type="text" name="job_name" id="job_name" required;
                textarea name="csv" rows="12" cols="80"
                    placeholder="recipient_name,street,city,state,zip_code,amount,date_of_last_contact" {}
                button type="submit" { "Process Records" }
            }
        },
    )
}

/// Post-upload summary: the classified breakdown plus how many letters will
/// actually be sent.
pub fn upload_result_page(
    job_id: i64,
    job_name: &str,
    processed: &[ProcessedRecord],
    stored: usize,
    skipped: usize,
) -> Markup {
    let certified = processed
        .iter()
        .filter(|p| p.required_service == MailService::Certified)
        .count();
    let standard = processed
        .iter()
        .filter(|p| p.required_service == MailService::Standard)
        .count();
    let not_required = processed
        .iter()
        .filter(|p| p.required_service == MailService::NotRequired)
        .count();

    desktop_layout(
        "Upload Complete",
        html! {
            h1 { "Job \"" (job_name) "\" created" }
            p { (stored) " letters will be sent." }
            table {
                tr { th { "Certified" } td { (certified) } }
                tr { th { "Standard" } td { (standard) } }
                tr { th { "Not Required" } td { (not_required) } }
                @if skipped > 0 {
                    tr { th { "Skipped rows" } td { (skipped) } }
                }
            }
            p {
                a href={ "/jobs/" (job_id) } { "View job" }
                " | "
                form method="post" action={ "/jobs/" (job_id) "/send" } style="display:inline" {
                    button type="submit" { "Send letters now" }
                }
            }
        },
    )
}
