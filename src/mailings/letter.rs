// src/mailings/letter.rs

use crate::domain::PropertyRecord;

/// Substitutes the known placeholders into a template body. Unknown
/// placeholders are left in place — templates are seeded, so that only
/// happens with hand-edited content.
pub fn render_letter(template_content: &str, record: &PropertyRecord, company_name: &str) -> String {
    template_content
        .replace("{{recipient_name}}", &record.recipient_name)
        .replace("{{amount}}", &format!("{:.2}", record.amount))
        .replace("{{state_of_property}}", &record.state_of_property)
        .replace(
            "{{date_of_last_contact}}",
            record.date_of_last_contact.as_deref().unwrap_or("Unknown"),
        )
        .replace("{{company_name}}", company_name)
}

/// Wraps rendered letter text in the HTML document the provider prints.
/// Each line of the body becomes a paragraph.
pub fn wrap_letter_html(content: &str) -> String {
    let body: String = content
        .lines()
        .map(|line| format!("<p>{line}</p>"))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Letter</title>
    <style>
      body {{
        font-family: 'Times New Roman', serif;
        font-size: 12pt;
        line-height: 1.5;
        margin: 1in;
      }}
      p {{
        margin: 0 0 1em 0;
      }}
    </style>
  </head>
  <body>
    {body}
  </body>
</html>"#
    )
}
