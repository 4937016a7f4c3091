use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Symbol, SymbolSet},
    error::SubmitError,
    protocol::{PredictRequest, ResultPayload, ServiceFailure},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod collector;
pub mod notification;
pub mod submission;

pub use collector::SymbolCollector;
pub use notification::{DismissTrigger, Notification, Severity};
pub use submission::{SubmissionController, SubmissionPhase};

/// Remote prediction service interface. One outbound call per submission; no
/// retries, no internal timeout.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn predict(&self, symbols: &[Symbol]) -> Result<ResultPayload, SubmitError>;
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to fetch artifact '{filename}': {source}")]
    Fetch {
        filename: String,
        source: reqwest::Error,
    },
    #[error("artifact endpoint returned status {status} for '{filename}'")]
    Status { filename: String, status: u16 },
}

/// HTTP client for the prediction service: the POST prediction endpoint plus
/// the read-only artifact endpoint used by the results view.
pub struct HttpPredictionClient {
    http: Client,
    base_url: String,
}

impl HttpPredictionClient {
    /// Validates and normalizes the service base URL.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("invalid prediction service URL '{base_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!(
                "unsupported prediction service URL scheme '{}'",
                parsed.scheme()
            );
        }
        Ok(Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches a generated artifact file by name from the results endpoint.
    pub async fn fetch_artifact(&self, filename: &str) -> Result<Vec<u8>, ArtifactError> {
        let response = self
            .http
            .get(format!("{}/api/results/{filename}", self.base_url))
            .send()
            .await
            .map_err(|source| ArtifactError::Fetch {
                filename: filename.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArtifactError::Status {
                filename: filename.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| ArtifactError::Fetch {
            filename: filename.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionClient {
    async fn predict(&self, symbols: &[Symbol]) -> Result<ResultPayload, SubmitError> {
        debug!(count = symbols.len(), "submitting prediction request");
        let response = self
            .http
            .post(format!("{}/predict", self.base_url))
            .json(&PredictRequest {
                symbols: symbols.to_vec(),
            })
            .send()
            .await
            .map_err(|err| SubmitError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let failure: ServiceFailure = response.json().await.unwrap_or_default();
            return Err(SubmitError::Service(failure.message()));
        }

        response
            .json()
            .await
            .map_err(|err| SubmitError::Transport(format!("invalid prediction response payload: {err}")))
    }
}

/// Runs one full submission: the empty-input contract check, the single
/// outbound call, and the post-response usability validation. The usability
/// check is a separate layer on top of the transport result; a nominally
/// successful response with nothing usable is `NoValidPredictions`, not a
/// service error.
pub async fn run_submission(
    api: &dyn PredictionApi,
    symbols: &SymbolSet,
) -> Result<ResultPayload, SubmitError> {
    if symbols.is_empty() {
        return Err(SubmitError::InvalidRequest);
    }

    let payload = api.predict(symbols.as_slice()).await?;
    if !payload.has_usable_predictions() {
        return Err(SubmitError::NoValidPredictions);
    }
    Ok(payload)
}

#[cfg(test)]
mod tests;
