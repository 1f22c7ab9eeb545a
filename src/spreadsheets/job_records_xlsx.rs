use crate::domain::PropertyRecord;
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::Workbook;

/// One spreadsheet row per property record in a job, for offline review of
/// delivery status.
pub fn export_job_records_xlsx(records: &[PropertyRecord], filename: &str) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = [
        "Recipient", "Street", "City", "State", "Zip", "Amount", "Service", "Status",
        "Tracking", "Mailed", "Delivered", "Returned",
    ];
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write header: {}", e)))?;
    }

    for (i, rec) in records.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet
            .write_string(r, 0, &rec.recipient_name)
            .map_err(|e| ServerError::XlsxError(format!("recipient: {}", e)))?;
        worksheet
            .write_string(r, 1, &rec.street)
            .map_err(|e| ServerError::XlsxError(format!("street: {}", e)))?;
        worksheet
            .write_string(r, 2, &rec.city)
            .map_err(|e| ServerError::XlsxError(format!("city: {}", e)))?;
        worksheet
            .write_string(r, 3, &rec.state)
            .map_err(|e| ServerError::XlsxError(format!("state: {}", e)))?;
        worksheet
            .write_string(r, 4, &rec.zip_code)
            .map_err(|e| ServerError::XlsxError(format!("zip: {}", e)))?;
        worksheet
            .write_number(r, 5, rec.amount)
            .map_err(|e| ServerError::XlsxError(format!("amount: {}", e)))?;
        worksheet
            .write_string(r, 6, rec.required_service.as_str())
            .map_err(|e| ServerError::XlsxError(format!("service: {}", e)))?;
        worksheet
            .write_string(r, 7, rec.mail_status.as_str())
            .map_err(|e| ServerError::XlsxError(format!("status: {}", e)))?;
        worksheet
            .write_string(r, 8, rec.tracking_number.as_deref().unwrap_or(""))
            .map_err(|e| ServerError::XlsxError(format!("tracking: {}", e)))?;
        worksheet
            .write_string(r, 9, &date_cell(&rec.mailed_date))
            .map_err(|e| ServerError::XlsxError(format!("mailed: {}", e)))?;
        worksheet
            .write_string(r, 10, &date_cell(&rec.delivered_date))
            .map_err(|e| ServerError::XlsxError(format!("delivered: {}", e)))?;
        worksheet
            .write_string(r, 11, &date_cell(&rec.returned_date))
            .map_err(|e| ServerError::XlsxError(format!("returned: {}", e)))?;
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))?;

    xlsx_response(buffer, filename)
}

fn date_cell(date: &Option<chrono::NaiveDateTime>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
