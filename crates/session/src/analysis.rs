//! New-analysis form and the results panel shown after submission.

use std::sync::Arc;

use facewatch_core::error::CoreError;
use facewatch_core::status::{status_badge, StatusBadge};
use facewatch_core::validation::NonBlank;
use facewatch_core::video::AnalysisStatus;
use facewatch_gateway::FaceGateway;
use tokio::sync::RwLock;

use crate::error::{display_or, FlowError};

pub const VIDEO_URL_REQUIRED: &str = "Please enter a video URL";
pub const ANALYSIS_FAILED: &str = "Failed to start analysis";
pub const MISSING_VIDEO_ID: &str = "Missing video ID";

/// "Analysis in progress" panel for a freshly queued video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub video_id: String,
    /// Always the processing badge; the real status is only known once the
    /// dashboard is fetched again.
    pub badge: StatusBadge,
    /// Optional note from the backend's acknowledgement.
    pub message: Option<String>,
}

impl ResultsView {
    pub fn for_video(video_id: &str) -> Result<Self, CoreError> {
        let video_id = NonBlank::parse(video_id, MISSING_VIDEO_ID)?;
        Ok(Self {
            video_id: video_id.into_inner(),
            badge: status_badge(&AnalysisStatus::Processing),
            message: None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisFormView {
    pub video_url: String,
    pub submitting: bool,
    pub error: Option<String>,
}

pub struct AnalysisSession {
    gateway: Arc<dyn FaceGateway>,
    state: RwLock<AnalysisFormView>,
}

impl AnalysisSession {
    pub fn new(gateway: Arc<dyn FaceGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(AnalysisFormView::default()),
        }
    }

    pub async fn view(&self) -> AnalysisFormView {
        self.state.read().await.clone()
    }

    pub async fn set_video_url(&self, url: &str) {
        self.state.write().await.video_url = url.to_string();
    }

    /// Validate the URL and queue the analysis.
    ///
    /// On success the form is cleared and the results panel for the new
    /// video is returned. On failure the entered URL is kept and the error
    /// is shown on the form.
    pub async fn submit(&self) -> Result<ResultsView, FlowError> {
        let video_url = {
            let mut state = self.state.write().await;
            if state.submitting {
                return Err(CoreError::Conflict("analysis is already being started".into()).into());
            }
            match NonBlank::parse(&state.video_url, VIDEO_URL_REQUIRED) {
                Ok(url) => {
                    state.submitting = true;
                    state.error = None;
                    url
                }
                Err(e) => {
                    state.error = Some(e.to_string());
                    return Err(e.into());
                }
            }
        };

        tracing::info!(video_url = %video_url, "Starting analysis");
        let result = self.gateway.start_analysis(&video_url).await;

        let mut state = self.state.write().await;
        state.submitting = false;
        match result {
            Ok(ack) => match ResultsView::for_video(&ack.video_id) {
                Ok(mut results) => {
                    *state = AnalysisFormView::default();
                    results.message = ack.message;
                    Ok(results)
                }
                Err(e) => {
                    tracing::warn!("Analysis acknowledgement carried no video id");
                    state.error = Some(e.to_string());
                    Err(e.into())
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to start analysis");
                state.error = Some(display_or(&e, ANALYSIS_FAILED));
                Err(e.into())
            }
        }
    }
}
