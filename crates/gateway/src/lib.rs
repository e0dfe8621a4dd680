//! Webhook client for the face-recognition workflow backend.
//!
//! Provides the [`FaceGateway`] trait the session layer depends on, the
//! [`WebhookApi`](api::WebhookApi) implementation over [`reqwest`], the
//! endpoint table, and the tolerant subjects-payload classifier.

pub mod api;
pub mod endpoints;
pub mod subjects;

use async_trait::async_trait;
use facewatch_core::validation::NonBlank;
use facewatch_core::video::{AnalysisResponse, VideoRecord};

pub use api::{GatewayError, WebhookApi};
pub use endpoints::WebhookEndpoints;

/// The six backend operations, one outbound call each.
///
/// Implementations never retry and never cache.
#[async_trait]
pub trait FaceGateway: Send + Sync {
    async fn list_active_videos(&self) -> Result<Vec<VideoRecord>, GatewayError>;

    async fn list_archived_videos(&self) -> Result<Vec<VideoRecord>, GatewayError>;

    async fn start_analysis(&self, video_url: &NonBlank) -> Result<AnalysisResponse, GatewayError>;

    async fn tag_person(
        &self,
        video_id: &str,
        old_name: &str,
        new_name: &NonBlank,
    ) -> Result<(), GatewayError>;

    async fn train_subject(
        &self,
        person_name: &NonBlank,
        image_url: &NonBlank,
    ) -> Result<(), GatewayError>;

    async fn list_subjects(&self) -> Result<Vec<String>, GatewayError>;
}
