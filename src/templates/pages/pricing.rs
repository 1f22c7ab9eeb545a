// templates/pages/pricing.rs

use crate::db::pricing::{Envelope, PricingRule};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn pricing_page(envelopes: &[Envelope], rules: &[PricingRule]) -> Markup {
    desktop_layout(
        "Pricing",
        html! {
            h1 { "Letter Pricing" }

            h2 { "Envelopes" }
            table {
                thead {
                    tr { th { "Envelope" } th { "Service" } th { "Price" } }
                }
                tbody {
                    @for e in envelopes {
                        tr {
                            td { (e.name) }
                            td { (e.service_type) }
                            td { "$" (format!("{:.2}", e.price)) }
                        }
                    }
                }
            }

            h2 { "Per-letter rules" }
            table {
                thead {
                    tr { th { "Rule" } th { "Service" } th { "Price" } }
                }
                tbody {
                    @for r in rules {
                        tr {
                            td { (r.rule_type) }
                            td { (r.service_type) }
                            td { "$" (format!("{:.2}", r.price)) }
                        }
                    }
                }
            }
        },
    )
}
