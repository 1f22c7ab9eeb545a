// src/config.rs
use std::env;

/// Return address printed on every outbound letter.
#[derive(Debug, Clone)]
pub struct SenderAddress {
    pub name: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for SenderAddress {
    fn default() -> Self {
        Self {
            name: "Escheatment Service".to_string(),
            address_line1: "123 Business St".to_string(),
            city: "Business City".to_string(),
            state: "CA".to_string(),
            zip_code: "90210".to_string(),
            country: "USA".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to bind the HTTP server to.
    pub bind_addr: String,
    /// SQLite database file path.
    pub db_path: String,
    /// Lob API key. When absent the mock provider is used instead.
    pub lob_api_key: Option<String>,
    /// Owning-user identifier stamped on jobs and property rows.
    /// Single-tenant deployment, so one fixed id.
    pub user_id: String,
    /// Company name substituted into the {{company_name}} placeholder.
    pub company_name: String,
    pub sender: SenderAddress,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            db_path: "escheatmail.sqlite3".to_string(),
            lob_api_key: None,
            user_id: "local".to_string(),
            company_name: "Your Company Name".to_string(),
            sender: SenderAddress::default(),
        }
    }
}

impl AppConfig {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_path: env::var("DB_PATH").unwrap_or(defaults.db_path),
            lob_api_key: env::var("LOB_API_KEY").ok().filter(|k| !k.is_empty()),
            user_id: env::var("ESCHEAT_USER_ID").unwrap_or(defaults.user_id),
            company_name: env::var("COMPANY_NAME").unwrap_or(defaults.company_name),
            sender: defaults.sender,
        }
    }
}
