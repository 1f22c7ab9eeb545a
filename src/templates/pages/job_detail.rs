// templates/pages/job_detail.rs

use crate::db::properties::JobStatistics;
use crate::domain::{LetterJob, PropertyRecord};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn job_detail_page(
    job: &LetterJob,
    stats: &JobStatistics,
    records: &[PropertyRecord],
) -> Markup {
    desktop_layout(
        &format!("Job: {}", job.job_name),
        html! {
            h1 { (job.job_name) }
            p {
                "Status: " strong { (job.status.as_str()) }
                " | Uploaded: " (job.upload_date)
            }

            h2 { "Statistics" }
            table {
                tr { th { "Total" } td { (stats.total) } }
                tr { th { "Pending" } td { (stats.pending) } }
                tr { th { "Processing" } td { (stats.processing) } }
                tr { th { "In Transit" } td { (stats.in_transit) } }
                tr { th { "Delivered" } td { (stats.delivered) } }
                tr { th { "Returned" } td { (stats.returned) } }
                tr { th { "Failed" } td { (stats.failed) } }
            }

            @if stats.pending > 0 {
                form method="post" action={ "/jobs/" (job.id) "/send" } {
                    button type="submit" { "Send " (stats.pending) " pending letters" }
                }
            }
            p { a href={ "/jobs/" (job.id) "/export.xlsx" } { "Export records (.xlsx)" } }

            h2 { "Records" }
            table {
                thead {
                    tr {
                        th { "Recipient" }
                        th { "Address" }
                        th { "Amount" }
                        th { "Service" }
                        th { "Status" }
                        th { "Tracking" }
                    }
                }
                tbody {
                    @for rec in records {
                        tr {
                            td { (rec.recipient_name) }
                            td { (rec.street) ", " (rec.city) ", " (rec.state) " " (rec.zip_code) }
                            td { "$" (format!("{:.2}", rec.amount)) }
                            td { (rec.required_service.as_str()) }
                            td { (rec.mail_status.as_str()) }
                            td {
                                @if let Some(tracking) = &rec.tracking_number {
                                    (tracking)
                                } @else {
                                    "-"
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
