mod job_records_xlsx;

pub use job_records_xlsx::export_job_records_xlsx;
