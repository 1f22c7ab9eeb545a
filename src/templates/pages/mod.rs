mod home;
mod job_detail;
mod jobs;
mod pricing;
mod upload;

pub use home::home_page;
pub use job_detail::job_detail_page;
pub use jobs::jobs_page;
pub use pricing::pricing_page;
pub use upload::{upload_page, upload_result_page};
