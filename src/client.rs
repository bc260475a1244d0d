use dotenv::dotenv;
use reqwest::Client;
use serde::Serialize;
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::application::ApplicationPayload;
use crate::models::booking::BookingPayload;
use crate::models::common::ErrorResponse;

// Explicit bound on the one remote call the funnel makes. No retry: a
// failed submission is surfaced and the user resubmits by hand.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a submission did not reach the intake service.
#[derive(Debug)]
pub enum SubmissionError {
    /// The request never completed (connect, timeout, decode).
    Transport(reqwest::Error),
    /// The intake service answered with an error status. The message is the
    /// remote error body when one was readable; the client cannot tell a
    /// server-side validation failure apart from any other remote failure.
    Rejected { status: u16, message: String },
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::Transport(e) => write!(f, "transport error: {}", e),
            SubmissionError::Rejected { status, message } => {
                write!(f, "intake service rejected submission ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for SubmissionError {}

impl From<reqwest::Error> for SubmissionError {
    fn from(e: reqwest::Error) -> Self {
        SubmissionError::Transport(e)
    }
}

/// Client for the intake service's submission endpoints.
pub struct IntakeClient {
    client: Client,
    endpoint: String,
}

impl IntakeClient {
    /// Create a new intake client from environment variables.
    pub fn new() -> Self {
        dotenv().ok();

        let endpoint = env::var("INTAKE_API_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Self::with_endpoint(&endpoint)
    }

    /// Create a client against an explicit endpoint (tests use this).
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a validated athlete application.
    pub async fn submit_application(
        &self,
        payload: &ApplicationPayload,
    ) -> Result<(), SubmissionError> {
        info!("Submitting application for {}", payload.full_name);
        self.post_json("/api/applications", payload).await
    }

    /// Submit a consultation booking request.
    pub async fn submit_consultation(
        &self,
        payload: &BookingPayload,
    ) -> Result<(), SubmissionError> {
        info!("Submitting consultation request for {}", payload.name);
        self.post_json("/api/consultations", payload).await
    }

    async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<(), SubmissionError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();

        if status.is_success() {
            info!("Submission accepted with status {}", status);
            return Ok(());
        }

        // Pull the error body if the service sent one; otherwise report the
        // status alone.
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("intake service returned status {}", status),
        };

        warn!("Submission rejected ({}): {}", status, message);
        Err(SubmissionError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl Default for IntakeClient {
    fn default() -> Self {
        Self::with_endpoint("http://localhost:3000")
    }
}
