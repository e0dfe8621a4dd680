//! Dashboard session: the video listing plus the tag modal.
//!
//! Tag saves follow the modal's epoch protocol from
//! [`facewatch_core::tagging`]: the request is built under the state lock,
//! the lock is released while the backend call is in flight, and the
//! answer is applied only if the same modal is still waiting for it.

use std::sync::Arc;

use facewatch_core::tagging::{apply_tag, TagCompletion, TagModal, TagState, TagTarget};
use facewatch_core::video::VideoRecord;
use facewatch_core::view::{dashboard_rows, DashboardRow};
use facewatch_gateway::FaceGateway;
use tokio::sync::RwLock;

use crate::error::{display_or, FlowError};
use crate::subjects::SubjectsCache;

pub const DASHBOARD_LOAD_FAILED: &str = "Failed to load dashboard";
pub const TAG_FAILED: &str = "Failed to tag person";

/// Progress of a view's initial fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Everything the tag modal renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagModalView {
    pub target: TagTarget,
    pub selection: String,
    pub error: Option<String>,
    pub saving: bool,
    /// Known subjects offered in the picker.
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub load: LoadState,
    pub rows: Vec<DashboardRow>,
    pub modal: Option<TagModalView>,
}

struct DashboardState {
    load: LoadState,
    videos: Vec<VideoRecord>,
    modal: TagModal,
}

pub struct DashboardSession {
    gateway: Arc<dyn FaceGateway>,
    subjects: Arc<SubjectsCache>,
    state: RwLock<DashboardState>,
}

impl DashboardSession {
    pub fn new(gateway: Arc<dyn FaceGateway>, subjects: Arc<SubjectsCache>) -> Self {
        Self {
            gateway,
            subjects,
            state: RwLock::new(DashboardState {
                load: LoadState::Loading,
                videos: Vec::new(),
                modal: TagModal::new(),
            }),
        }
    }

    /// Fetch the active video list, replacing whatever was shown.
    pub async fn load(&self) -> Result<(), FlowError> {
        self.state.write().await.load = LoadState::Loading;

        let result = self.gateway.list_active_videos().await;

        let mut state = self.state.write().await;
        match result {
            Ok(videos) => {
                tracing::info!(count = videos.len(), "Dashboard loaded");
                state.videos = videos;
                state.load = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load dashboard");
                state.load = LoadState::Failed(display_or(&e, DASHBOARD_LOAD_FAILED));
                Err(e.into())
            }
        }
    }

    /// Local copy of the video records, including optimistic patches.
    pub async fn videos(&self) -> Vec<VideoRecord> {
        self.state.read().await.videos.clone()
    }

    pub async fn view(&self) -> DashboardView {
        let state = self.state.read().await;

        let modal = match state.modal.state() {
            TagState::Idle => None,
            TagState::Editing {
                target,
                selection,
                error,
                ..
            } => Some(TagModalView {
                target: target.clone(),
                selection: selection.clone(),
                error: error.clone(),
                saving: false,
                subjects: self.subjects.subjects(),
            }),
            TagState::Saving {
                target, new_name, ..
            } => Some(TagModalView {
                target: target.clone(),
                selection: new_name.to_string(),
                error: None,
                saving: true,
                subjects: self.subjects.subjects(),
            }),
        };

        DashboardView {
            load: state.load.clone(),
            rows: dashboard_rows(&state.videos),
            modal,
        }
    }

    /// Open the tag modal for one face. Only unidentified faces of
    /// browsable videos can be tagged.
    pub async fn open_tag(&self, video_id: &str, face_index: usize) -> Result<(), FlowError> {
        let mut state = self.state.write().await;
        let target = TagTarget::locate(&state.videos, video_id, face_index)?;
        let epoch = state.modal.open(target);
        tracing::debug!(video_id, face_index, epoch, "Tag modal opened");
        Ok(())
    }

    /// Pick an existing subject or type a new name.
    pub async fn select_subject(&self, name: &str) -> Result<(), FlowError> {
        self.state.write().await.modal.select(name)?;
        Ok(())
    }

    /// Close the modal. A save still in flight will be ignored when it
    /// resolves.
    pub async fn cancel_tag(&self) {
        self.state.write().await.modal.cancel();
    }

    /// Send the tag and, on success, patch the local list without
    /// re-fetching.
    ///
    /// Returns [`TagCompletion::Stale`] when the modal was cancelled or
    /// reopened while the request was in flight. A backend failure keeps the
    /// modal open with the error shown and is also returned.
    pub async fn save_tag(&self) -> Result<TagCompletion, FlowError> {
        let request = self.state.write().await.modal.begin_save()?;

        tracing::info!(
            video_id = %request.target.video_id,
            face_index = request.target.face_index,
            new_name = %request.new_name,
            "Saving face tag",
        );

        let result = self
            .gateway
            .tag_person(
                &request.target.video_id,
                request.old_name(),
                &request.new_name,
            )
            .await;

        let mut state = self.state.write().await;
        let outcome = match &result {
            Ok(()) => Ok(()),
            Err(e) => Err(display_or(e, TAG_FAILED)),
        };
        let completion = state.modal.finish_save(&request, outcome);

        match (completion, result) {
            (TagCompletion::Applied, _) => {
                if let Err(e) = apply_tag(
                    &mut state.videos,
                    &request.target.video_id,
                    request.target.face_index,
                    &request.new_name,
                ) {
                    // The backend accepted the tag but the local list moved
                    // on; the next load shows the server's view.
                    tracing::warn!(error = %e, "Tag saved but local list could not be patched");
                }
                Ok(TagCompletion::Applied)
            }
            (TagCompletion::Failed, Err(e)) => Err(e.into()),
            (TagCompletion::Failed, Ok(())) => Ok(TagCompletion::Failed),
            (TagCompletion::Stale, _) => {
                tracing::debug!(epoch = request.epoch, "Discarding stale tag result");
                Ok(TagCompletion::Stale)
            }
        }
    }
}
