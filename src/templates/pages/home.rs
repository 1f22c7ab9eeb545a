// templates/pages/home.rs

use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn home_page() -> Markup {
    desktop_layout(
        "Home",
        html! {
            h1 { "Escheatment Mail Service" }
            p {
                "Upload unclaimed-property data, classify each record against "
                "state notice thresholds, and send the required letters through "
                "the mail provider."
            }
            ul {
                li { a href="/upload" { "Upload a CSV batch" } }
                li { a href="/jobs" { "Track letter jobs" } }
                li { a href="/pricing" { "Review letter pricing" } }
            }
        },
    )
}
