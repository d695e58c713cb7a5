//! HTTP client for the Calendar API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GENERATE_PATH: &str = "/api/gemini/text";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalendarEntry {
    pub day: u8,
    pub title: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalendarResult {
    pub profession: String,
    #[serde(default)]
    pub calendar: Vec<CalendarEntry>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    profession: &'a str,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// The backend operation the form submits to.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn generate(&self, profession: &str) -> Result<CalendarResult, ApiError>;
}

pub struct HttpCalendarApi {
    client: Client,
    endpoint: String,
}

impl HttpCalendarApi {
    pub fn new(api_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: format!("{}{GENERATE_PATH}", api_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl CalendarApi for HttpCalendarApi {
    async fn generate(&self, profession: &str) -> Result<CalendarResult, ApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest { profession })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<CalendarResult>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}
