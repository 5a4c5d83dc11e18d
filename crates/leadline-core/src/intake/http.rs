//! HTTP intake for forwarding leads to a CRM or webhook endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response, Url};
use tracing::{debug, warn};

use super::{Intake, IntakeError, LeadRecord};

/// HTTP request timeout in seconds.
/// The form controller applies its own submit timeout on top of this.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Intake that POSTs each lead as JSON.
#[derive(Clone)]
pub struct HttpIntake {
    client: Client,
    endpoint: Url,
}

impl HttpIntake {
    pub fn new(endpoint: Url) -> Result<Self, IntakeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Map non-2xx responses to an IntakeError, keeping the body for context
    async fn check_response(response: Response) -> Result<Response, IntakeError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%status, "Intake endpoint returned an error");
        Err(IntakeError::from_status(status, &body))
    }
}

#[async_trait]
impl Intake for HttpIntake {
    async fn deliver(&self, lead: &LeadRecord) -> Result<(), IntakeError> {
        debug!(endpoint = %self.endpoint, source_page = %lead.source_page, "Posting lead");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .json(lead)
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
