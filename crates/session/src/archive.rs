use std::sync::Arc;

use facewatch_core::video::VideoRecord;
use facewatch_core::view::{archive_rows, ArchiveRow};
use facewatch_gateway::FaceGateway;
use tokio::sync::RwLock;

use crate::dashboard::LoadState;
use crate::error::{display_or, FlowError};

pub const ARCHIVE_LOAD_FAILED: &str = "Failed to load archive";

#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveView {
    pub load: LoadState,
    pub rows: Vec<ArchiveRow>,
}

/// Archive listing: every fetched video that is no longer processing.
pub struct ArchiveSession {
    gateway: Arc<dyn FaceGateway>,
    state: RwLock<(LoadState, Vec<VideoRecord>)>,
}

impl ArchiveSession {
    pub fn new(gateway: Arc<dyn FaceGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new((LoadState::Loading, Vec::new())),
        }
    }

    pub async fn load(&self) -> Result<(), FlowError> {
        self.state.write().await.0 = LoadState::Loading;

        let result = self.gateway.list_archived_videos().await;

        let mut state = self.state.write().await;
        match result {
            Ok(videos) => {
                tracing::info!(count = videos.len(), "Archive loaded");
                *state = (LoadState::Ready, videos);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load archive");
                state.0 = LoadState::Failed(display_or(&e, ARCHIVE_LOAD_FAILED));
                Err(e.into())
            }
        }
    }

    pub async fn view(&self) -> ArchiveView {
        let state = self.state.read().await;
        ArchiveView {
            load: state.0.clone(),
            rows: archive_rows(&state.1),
        }
    }
}
