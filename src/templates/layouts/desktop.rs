use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    h3 { "Escheatment Mail Service" }
                    nav {
                        ul {
                            li { a href="/" { "Home" } }
                            li { a href="/upload" { "Upload" } }
                            li { a href="/jobs" { "Job Tracking" } }
                            li { a href="/pricing" { "Pricing" } }
                        }
                    }
                }
                main class="px-6 py-4" {
                    (content)
                }
            }
        }
    }
}
