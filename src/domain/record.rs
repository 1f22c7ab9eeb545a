// src/domain/record.rs

use chrono::NaiveDateTime;

/// Mail service tier required for a record, as decided by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailService {
    Standard,
    Certified,
    NotRequired,
}

impl MailService {
    pub fn as_str(self) -> &'static str {
        match self {
            MailService::Standard => "Standard",
            MailService::Certified => "Certified",
            MailService::NotRequired => "Not Required",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Standard" => Some(MailService::Standard),
            "Certified" => Some(MailService::Certified),
            "Not Required" => Some(MailService::NotRequired),
            _ => None,
        }
    }
}

/// Per-letter delivery lifecycle. Only ever advances forward:
/// Pending -> Processing -> In Transit -> Delivered | Returned,
/// with Failed as the dispatch-error terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailStatus {
    Pending,
    Processing,
    InTransit,
    Delivered,
    Returned,
    Failed,
}

impl MailStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MailStatus::Pending => "Pending",
            MailStatus::Processing => "Processing",
            MailStatus::InTransit => "In Transit",
            MailStatus::Delivered => "Delivered",
            MailStatus::Returned => "Returned",
            MailStatus::Failed => "Failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(MailStatus::Pending),
            "Processing" => Some(MailStatus::Processing),
            "In Transit" => Some(MailStatus::InTransit),
            "Delivered" => Some(MailStatus::Delivered),
            "Returned" => Some(MailStatus::Returned),
            "Failed" => Some(MailStatus::Failed),
            _ => None,
        }
    }

    /// Maps a provider webhook status string onto our lifecycle.
    /// Unknown strings yield None; the ingestor logs and drops those.
    pub fn from_provider_event(event: &str) -> Option<Self> {
        match event {
            "delivered" => Some(MailStatus::Delivered),
            "returned_to_sender" => Some(MailStatus::Returned),
            "in_transit" | "mailed" => Some(MailStatus::InTransit),
            "failed" => Some(MailStatus::Failed),
            _ => None,
        }
    }

    /// Pending, Processing and In Transit still have work ahead of them;
    /// Delivered, Returned and Failed are final.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MailStatus::Delivered | MailStatus::Returned | MailStatus::Failed
        )
    }
}

/// Batch lifecycle for an uploaded job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Processing,
    Mailed,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Processing => "Processing",
            JobStatus::Mailed => "Mailed",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Processing" => Some(JobStatus::Processing),
            "Mailed" => Some(JobStatus::Mailed),
            "Completed" => Some(JobStatus::Completed),
            "Failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

/// Jurisdiction-specific notice thresholds. Immutable reference data.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRule {
    pub id: i64,
    pub state_code: String,
    pub state_name: String,
    pub min_amount_certified: f64,
    pub min_amount_standard: f64,
    pub certified_mail_required: bool,
}

/// One raw row out of an uploaded CSV. Exists only during parse and
/// classification; never persisted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct EscheatmentRecord {
    pub recipient_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub amount: f64,
    /// Opaque date string from the upload; echoed into letters verbatim.
    pub date_of_last_contact: Option<String>,
}

/// An EscheatmentRecord plus its classification result.
#[derive(Debug, Clone)]
pub struct ProcessedRecord {
    pub record: EscheatmentRecord,
    pub required_service: MailService,
    pub state_rule: Option<StateRule>,
}

/// A named batch of uploaded records.
#[derive(Debug, Clone)]
pub struct LetterJob {
    pub id: i64,
    pub user_id: String,
    pub job_name: String,
    pub upload_date: String,
    pub total_records: i64,
    pub processed_records: i64,
    pub mailed_records: i64,
    pub returned_records: i64,
    pub status: JobStatus,
    pub template_id: Option<i64>,
    pub total_cost: Option<f64>,
}

/// One persisted unclaimed-property row, as stored in `unclaimed_property`.
#[derive(Debug, Clone)]
pub struct PropertyRecord {
    pub id: i64,
    pub user_id: String,
    pub job_id: i64,
    pub recipient_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub amount: f64,
    pub date_of_last_contact: Option<String>,
    pub state_of_property: String,
    pub required_service: MailService,
    pub mail_status: MailStatus,
    pub tracking_number: Option<String>,
    pub provider_letter_id: Option<String>,
    pub returned_scan_url: Option<String>,
    pub mailed_date: Option<NaiveDateTime>,
    pub delivered_date: Option<NaiveDateTime>,
    pub returned_date: Option<NaiveDateTime>,
}
