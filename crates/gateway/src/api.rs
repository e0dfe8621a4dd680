//! REST client for the workflow backend's webhook endpoints.
//!
//! Wraps the six webhooks (dashboard, archive, analyze, tag, train,
//! subjects) using [`reqwest`]. Every call is a single request with no
//! retry and no timeout beyond what the underlying client enforces.

use async_trait::async_trait;
use facewatch_core::validation::NonBlank;
use facewatch_core::video::{AnalysisResponse, VideoRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::endpoints::WebhookEndpoints;
use crate::subjects::extract_subjects;
use crate::FaceGateway;

/// HTTP client for one backend deployment.
pub struct WebhookApi {
    client: reqwest::Client,
    endpoints: WebhookEndpoints,
}

/// Errors from the webhook layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed, or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered non-2xx without a usable body.
    #[error("{operation}: {reason}")]
    Network {
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Status reason phrase, or the bare code when there is none.
        reason: String,
    },

    /// The backend answered non-2xx and explained why.
    #[error("{message}")]
    Remote {
        status: u16,
        /// Response body, verbatim.
        message: String,
    },

    /// A 2xx body that is not valid JSON for the expected shape.
    #[error("{operation}: malformed response: {source}")]
    Decode {
        operation: &'static str,
        source: serde_json::Error,
    },
}

const OP_DASHBOARD: &str = "Failed to fetch dashboard";
const OP_ARCHIVE: &str = "Failed to fetch archive";
const OP_ANALYZE: &str = "Failed to start analysis";
const OP_SUBJECTS: &str = "Failed to fetch subjects";
const OP_TAG: &str = "Failed to tag person";
const OP_TRAIN: &str = "Failed to train subject";

#[derive(Serialize)]
struct AnalyzeBody<'a> {
    video_url: &'a str,
}

#[derive(Serialize)]
struct TagBody<'a> {
    video_id: &'a str,
    old_name: &'a str,
    new_name: &'a str,
}

#[derive(Serialize)]
struct TrainBody<'a> {
    person_name: &'a str,
    image_url: &'a str,
}

impl WebhookApi {
    /// Create a client for the given endpoint table.
    pub fn new(endpoints: WebhookEndpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, endpoints: WebhookEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &WebhookEndpoints {
        &self.endpoints
    }

    async fn get_videos(
        &self,
        url: &str,
        operation: &'static str,
    ) -> Result<Vec<VideoRecord>, GatewayError> {
        tracing::debug!(endpoint = %url, "Fetching video listing");

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response, operation).await?;
        let videos: Vec<VideoRecord> = Self::parse_json(response, operation).await?;

        tracing::debug!(endpoint = %url, count = videos.len(), "Video listing received");
        Ok(videos)
    }

    async fn post_expecting_empty<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        operation: &'static str,
    ) -> Result<(), GatewayError> {
        let response = self.client.post(url).json(body).send().await?;
        Self::ensure_success_explained(response, operation).await?;
        Ok(())
    }

    // ---- private helpers ----

    /// Map a non-2xx response to [`GatewayError::Network`], ignoring the body.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!(status = status.as_u16(), operation, "Webhook call failed");
        Err(network_error(status, operation))
    }

    /// Decode a 2xx body. Malformed JSON is a [`GatewayError::Decode`].
    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<T, GatewayError> {
        let text = response.text().await?;
        decode(&text, operation)
    }

    /// Like [`ensure_success`](Self::ensure_success), but a non-empty error
    /// body becomes a [`GatewayError::Remote`] carrying that text.
    async fn ensure_success_explained(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, operation, "Could not read error body");
                String::new()
            }
        };
        tracing::warn!(status = status.as_u16(), operation, body = %body, "Webhook call rejected");

        if body.trim().is_empty() {
            return Err(network_error(status, operation));
        }
        Err(GatewayError::Remote {
            status: status.as_u16(),
            message: body,
        })
    }
}

fn decode<T: DeserializeOwned>(text: &str, operation: &'static str) -> Result<T, GatewayError> {
    serde_json::from_str(text).map_err(|source| GatewayError::Decode { operation, source })
}

fn network_error(status: reqwest::StatusCode, operation: &'static str) -> GatewayError {
    GatewayError::Network {
        operation,
        status: status.as_u16(),
        reason: status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_u16().to_string()),
    }
}

#[async_trait]
impl FaceGateway for WebhookApi {
    async fn list_active_videos(&self) -> Result<Vec<VideoRecord>, GatewayError> {
        self.get_videos(&self.endpoints.dashboard, OP_DASHBOARD).await
    }

    async fn list_archived_videos(&self) -> Result<Vec<VideoRecord>, GatewayError> {
        self.get_videos(&self.endpoints.archive, OP_ARCHIVE).await
    }

    /// Sends a `POST analyze` with `{video_url}`.
    async fn start_analysis(&self, video_url: &NonBlank) -> Result<AnalysisResponse, GatewayError> {
        let body = AnalyzeBody {
            video_url: video_url.as_str(),
        };

        let response = self
            .client
            .post(&self.endpoints.analyze)
            .json(&body)
            .send()
            .await?;
        let response = Self::ensure_success(response, OP_ANALYZE).await?;
        let ack: AnalysisResponse = Self::parse_json(response, OP_ANALYZE).await?;

        tracing::info!(video_id = %ack.video_id, "Analysis queued");
        Ok(ack)
    }

    /// Sends a `POST tag-video` with `{video_id, old_name, new_name}`.
    async fn tag_person(
        &self,
        video_id: &str,
        old_name: &str,
        new_name: &NonBlank,
    ) -> Result<(), GatewayError> {
        let body = TagBody {
            video_id,
            old_name,
            new_name: new_name.as_str(),
        };
        self.post_expecting_empty(&self.endpoints.tag, &body, OP_TAG)
            .await?;

        tracing::info!(video_id, new_name = %new_name, "Face tagged");
        Ok(())
    }

    /// Sends a `POST train-subject` with `{person_name, image_url}`.
    async fn train_subject(
        &self,
        person_name: &NonBlank,
        image_url: &NonBlank,
    ) -> Result<(), GatewayError> {
        let body = TrainBody {
            person_name: person_name.as_str(),
            image_url: image_url.as_str(),
        };
        self.post_expecting_empty(&self.endpoints.train, &body, OP_TRAIN)
            .await?;

        tracing::info!(person_name = %person_name, "Training image submitted");
        Ok(())
    }

    /// Sends a `GET subjects`. An empty body or an unrecognized JSON shape
    /// is an empty list.
    async fn list_subjects(&self) -> Result<Vec<String>, GatewayError> {
        let response = self
            .client
            .get(&self.endpoints.subjects)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = Self::ensure_success(response, OP_SUBJECTS).await?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value: serde_json::Value = decode(&text, OP_SUBJECTS)?;

        Ok(extract_subjects(&value))
    }
}
