pub mod connection;
pub mod jobs;
pub mod letter_templates;
pub mod pricing;
pub mod properties;
pub mod state_rules;
pub mod webhook_logs;

pub use connection::Database;
