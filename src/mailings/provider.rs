// src/mailings/provider.rs

use std::error::Error;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::domain::MailService;

#[derive(Debug)]
pub enum MailerError {
    RequestFailed(String),
    ApiError(String),
}

impl fmt::Display for MailerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailerError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            MailerError::ApiError(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl Error for MailerError {}

/// Recipient or sender address block sent to the provider.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub name: String,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct LetterRequest {
    pub to: Address,
    pub from: Address,
    /// Fully rendered HTML letter body.
    pub content: String,
    pub mail_service: MailService,
}

#[derive(Debug, Clone)]
pub struct LetterResponse {
    pub id: String,
    pub status: String,
    pub tracking_number: Option<String>,
    pub expected_delivery_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LetterStatus {
    pub status: String,
    pub tracking_number: Option<String>,
}

/// External mail-fulfilment provider. Real and mock implementations are
/// selected by configuration, never by inline branching in the dispatcher.
pub trait LetterProvider: Send + Sync {
    fn send_letter(&self, request: &LetterRequest) -> Result<LetterResponse, MailerError>;
    fn letter_status(&self, letter_id: &str) -> Result<LetterStatus, MailerError>;
}

// --- Lob ---

const LOB_BASE_URL: &str = "https://api.lob.com/v1";

#[derive(Serialize)]
struct LobLetterPayload<'a> {
    to: &'a Address,
    from: &'a Address,
    file: &'a str,
    color: bool,
    double_sided: bool,
    address_placement: &'a str,
    mail_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra_service: Option<&'a str>,
}

#[derive(Deserialize)]
struct LobLetterReply {
    id: String,
    status: String,
    tracking_number: Option<String>,
    expected_delivery_date: Option<String>,
}

pub struct LobClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl LobClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, LOB_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            client: Client::new(),
        }
    }
}

impl LetterProvider for LobClient {
    fn send_letter(&self, request: &LetterRequest) -> Result<LetterResponse, MailerError> {
        let payload = LobLetterPayload {
            to: &request.to,
            from: &request.from,
            file: &request.content,
            color: false,
            double_sided: false,
            address_placement: "top_first_page",
            mail_type: "usps_first_class",
            extra_service: match request.mail_service {
                MailService::Certified => Some("certified"),
                _ => None,
            },
        };

        let resp = self
            .client
            .post(format!("{}/letters", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(MailerError::ApiError(format!(
                "Mailing service error: {} - {}",
                status, body
            )));
        }

        let reply: LobLetterReply = resp
            .json()
            .map_err(|e| MailerError::ApiError(format!("Malformed provider response: {e}")))?;

        Ok(LetterResponse {
            id: reply.id,
            status: reply.status,
            tracking_number: reply.tracking_number,
            expected_delivery_date: reply.expected_delivery_date,
        })
    }

    fn letter_status(&self, letter_id: &str) -> Result<LetterStatus, MailerError> {
        let resp = self
            .client
            .get(format!("{}/letters/{}", self.base_url, letter_id))
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MailerError::ApiError(format!(
                "Failed to get letter status: {}",
                resp.status()
            )));
        }

        let reply: LobLetterReply = resp
            .json()
            .map_err(|e| MailerError::ApiError(format!("Malformed provider response: {e}")))?;

        Ok(LetterStatus {
            status: reply.status,
            tracking_number: reply.tracking_number,
        })
    }
}

// --- Mock ---

/// No-credentials fallback for local development: fabricates a submitted
/// letter after a fixed delay.
pub struct MockProvider {
    delay: Duration,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(1000),
        }
    }

    /// Zero-delay variant for tests.
    pub fn instant() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    fn mock_tracking_number() -> String {
        const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let mut rng = rand::thread_rng();
        let suffix: String = (0..9)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        format!("TRK{suffix}")
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LetterProvider for MockProvider {
    fn send_letter(&self, _request: &LetterRequest) -> Result<LetterResponse, MailerError> {
        std::thread::sleep(self.delay);

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let expected = chrono::Utc::now() + chrono::Duration::days(7);

        Ok(LetterResponse {
            id: format!("mock_{nanos}"),
            status: "submitted".to_string(),
            tracking_number: Some(Self::mock_tracking_number()),
            expected_delivery_date: Some(expected.to_rfc3339()),
        })
    }

    fn letter_status(&self, _letter_id: &str) -> Result<LetterStatus, MailerError> {
        std::thread::sleep(self.delay);
        Ok(LetterStatus {
            status: "mailed".to_string(),
            tracking_number: Some(Self::mock_tracking_number()),
        })
    }
}

/// Real client when an API key is configured, mock otherwise.
pub fn provider_from_config(cfg: &AppConfig) -> Box<dyn LetterProvider> {
    match &cfg.lob_api_key {
        Some(key) => Box::new(LobClient::new(key.clone())),
        None => {
            log::warn!("LOB_API_KEY not set; using the mock letter provider");
            Box::new(MockProvider::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LetterRequest {
        let addr = Address {
            name: "John Smith".to_string(),
            address_line1: "123 Main St".to_string(),
            address_line2: None,
            city: "New York".to_string(),
            state: "NY".to_string(),
            zip_code: "10001".to_string(),
            country: "USA".to_string(),
        };
        LetterRequest {
            to: addr.clone(),
            from: addr,
            content: "<html></html>".to_string(),
            mail_service: MailService::Standard,
        }
    }

    #[test]
    fn mock_provider_fabricates_a_submitted_letter() {
        let provider = MockProvider::instant();
        let resp = provider.send_letter(&request()).unwrap();

        assert!(resp.id.starts_with("mock_"));
        assert_eq!(resp.status, "submitted");
        let tracking = resp.tracking_number.unwrap();
        assert!(tracking.starts_with("TRK"));
        assert_eq!(tracking.len(), 12);
        assert!(resp.expected_delivery_date.is_some());
    }

    #[test]
    fn mock_status_lookup_reports_mailed() {
        let provider = MockProvider::instant();
        let status = provider.letter_status("mock_1").unwrap();
        assert_eq!(status.status, "mailed");
    }

    #[test]
    fn provider_selection_follows_the_api_key() {
        let mut cfg = AppConfig::default();
        cfg.lob_api_key = None;
        provider_from_config(&cfg); // mock, no panic

        cfg.lob_api_key = Some("test_key".to_string());
        provider_from_config(&cfg); // real client constructed without I/O
    }
}
