pub mod classify;
pub mod record;

pub use classify::determine_required_service;
pub use record::{
    EscheatmentRecord, JobStatus, LetterJob, MailService, MailStatus, ProcessedRecord,
    PropertyRecord, StateRule,
};
