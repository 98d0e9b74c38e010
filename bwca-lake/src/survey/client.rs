use super::SurveyDocument;
use crate::error::{BwcaError, Result};
use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Minnesota DNR LakeFinder detail endpoint.
pub const DEFAULT_SURVEY_URL: &str = "https://maps2.dnr.state.mn.us/cgi-bin/lakefinder/detail.cgi";

/// Default limit on one survey request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for lake survey documents.
///
/// Each call is a fresh request; nothing is retried. Every failure (network,
/// timeout, non-200, malformed body, API error status) comes back as
/// [`BwcaError::SurveyFetchFailed`].
#[derive(Debug, Clone)]
pub struct SurveyClient {
    client: Client,
    base_url: String,
}

impl SurveyClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(SurveyClient {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn survey_url(&self, lake_id: &str) -> String {
        format!("{}?type=lake_survey&id={}", self.base_url, lake_id)
    }

    /// Fetch and parse the survey document for one lake.
    pub async fn fetch(&self, lake_id: &str) -> Result<SurveyDocument> {
        let failed = |reason: String| BwcaError::SurveyFetchFailed {
            lake_id: lake_id.to_string(),
            reason,
        };

        if lake_id.is_empty() || !lake_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(failed(format!("invalid lake id {:?}", lake_id)));
        }

        let url = self.survey_url(lake_id);
        info!("Fetching survey for lake {} from {}", lake_id, url);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                warn!("Survey request for {} timed out", lake_id);
                return Err(failed("request timed out".to_string()));
            }
            Err(e) => {
                warn!("Survey request for {} failed: {}", lake_id, e);
                return Err(failed(e.to_string()));
            }
        };

        if response.status() != StatusCode::OK {
            warn!("Bad response status for {}: {}", lake_id, response.status());
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read response body for {}: {}", lake_id, e);
            failed(e.to_string())
        })?;

        let document = SurveyDocument::parse(&body).map_err(|e| {
            warn!("Malformed survey document for {}: {}", lake_id, e);
            failed(e.to_string())
        })?;

        if document.is_error() {
            let message = document
                .message
                .clone()
                .unwrap_or_else(|| "API reported an error".to_string());
            warn!("Survey API error for {}: {}", lake_id, message);
            return Err(failed(message));
        }

        info!(
            "Survey for lake {} holds {} surveys",
            lake_id,
            document.surveys.len()
        );
        Ok(document)
    }
}
