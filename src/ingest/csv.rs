// src/ingest/csv.rs

use std::io::Read;

use csv::{ReaderBuilder, Trim};

use crate::domain::EscheatmentRecord;
use crate::errors::ServerError;

/// Sample upload offered for download on the upload page.
pub const SAMPLE_CSV: &str = "\
recipient_name,street,city,state,zip_code,amount,date_of_last_contact
\"John Smith\",\"123 Main St\",\"New York\",\"NY\",\"10001\",1500.00,\"2023-01-15\"
\"Jane Doe\",\"456 Oak Ave\",\"Los Angeles\",\"CA\",\"90210\",750.00,\"2023-02-20\"
\"Bob Johnson\",\"789 Pine Rd\",\"Chicago\",\"IL\",\"60601\",2500.00,\"2023-03-10\"
";

#[derive(Debug)]
pub struct ParsedBatch {
    pub records: Vec<EscheatmentRecord>,
    /// Rows skipped for having fewer than the six required columns.
    pub skipped: usize,
}

/// Parses an uploaded escheatment CSV. Expected column order:
/// recipient_name, street, city, state, zip_code, amount,
/// date_of_last_contact (optional).
///
/// The header row is skipped. Rows with fewer than six columns are dropped
/// with a warning rather than failing the upload; a malformed amount is
/// coerced to 0 and left to the classifier's Not Required branch.
pub fn parse_escheatment_csv(input: impl Read) -> Result<ParsedBatch, ServerError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(|e| ServerError::BadRequest(format!("CSV parse error: {e}")))?;

        // Line number as the user sees it: header is line 1.
        let line = i + 2;

        if row.len() < 6 {
            log::warn!("Skipping invalid line {line}: insufficient columns");
            skipped += 1;
            continue;
        }

        let amount = row[5].parse::<f64>().unwrap_or(0.0);
        let date_of_last_contact = row
            .get(6)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        records.push(EscheatmentRecord {
            recipient_name: row[0].to_string(),
            street: row[1].to_string(),
            city: row[2].to_string(),
            state: row[3].to_string(),
            zip_code: row[4].to_string(),
            amount,
            date_of_last_contact,
        });
    }

    Ok(ParsedBatch { records, skipped })
}
