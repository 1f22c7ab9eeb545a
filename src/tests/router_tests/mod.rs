mod jobs_tests;
mod upload_tests;
mod webhook_tests;
