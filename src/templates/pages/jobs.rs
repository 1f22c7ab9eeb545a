// templates/pages/jobs.rs

use crate::domain::LetterJob;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn jobs_page(jobs: &[LetterJob]) -> Markup {
    desktop_layout(
        "Job Tracking",
        html! {
            h1 { "Job Tracking" }
            @if jobs.is_empty() {
                p { "No jobs yet. " a href="/upload" { "Upload a batch" } " to get started." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Job" }
                            th { "Uploaded" }
                            th { "Status" }
                            th { "Total" }
                            th { "Processed" }
                            th { "Mailed" }
                            th { "Returned" }
                            th { "Cost" }
                        }
                    }
                    tbody {
                        @for job in jobs {
                            tr {
                                td { a href={ "/jobs/" (job.id) } { (job.job_name) } }
                                td { (job.upload_date) }
                                td { (job.status.as_str()) }
                                td { (job.total_records) }
                                td { (job.processed_records) }
                                td { (job.mailed_records) }
                                td { (job.returned_records) }
                                td {
                                    @if let Some(cost) = job.total_cost {
                                        "$" (format!("{cost:.2}"))
                                    } @else {
                                        "-"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
