//! Tag modal state machine and the optimistic tag reducer.
//!
//! The modal moves `Idle -> Editing -> Saving -> Idle`. A failed save
//! returns to `Editing` with the error text and the entered name intact.
//! Every opening of the modal gets a fresh epoch; a save result whose
//! epoch no longer matches the modal is stale and must be dropped.

use crate::error::CoreError;
use crate::validation::NonBlank;
use crate::video::{AnalysisStatus, VideoRecord, UNKNOWN_FACE_NAME};

/// Value sent as `old_name` with every tag request.
///
/// Only faces the backend left unidentified are taggable, and the backend
/// keys them by this sentinel rather than by their displayed name.
pub const TAG_OLD_NAME: &str = UNKNOWN_FACE_NAME;

/// Shown when save is attempted with nothing selected or typed.
pub const MISSING_TAG_NAME: &str = "Please select or enter a person name";

/// The face a modal is retagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTarget {
    pub video_id: String,
    pub face_index: usize,
    /// Thumbnail for the preview, when the backend provided one.
    pub face_image_url: Option<String>,
}

impl TagTarget {
    /// Resolve a target from the current video list.
    ///
    /// Fails unless the video exists, its faces are browsable, the index is
    /// in range, and the face is still unidentified.
    pub fn locate(
        videos: &[VideoRecord],
        video_id: &str,
        face_index: usize,
    ) -> Result<Self, CoreError> {
        let video = find_video(videos, video_id)?;

        if !video.analysis_status.faces_browsable() {
            return Err(CoreError::Conflict(format!(
                "faces of video {video_id} are not available while it is {}",
                video.analysis_status
            )));
        }

        let face = video
            .faces
            .as_ref()
            .and_then(|faces| faces.get(face_index))
            .ok_or_else(|| face_not_found(video_id, face_index))?;

        if !face.is_unknown() {
            return Err(CoreError::Conflict(format!(
                "face {face_index} of video {video_id} is already identified as {}",
                face.name
            )));
        }

        Ok(Self {
            video_id: video_id.to_string(),
            face_index,
            face_image_url: face.thumbnail_url.clone(),
        })
    }
}

/// A tag request ready to be sent, stamped with the modal epoch that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRequest {
    pub epoch: u64,
    pub target: TagTarget,
    pub new_name: NonBlank,
}

impl TagRequest {
    pub fn old_name(&self) -> &'static str {
        TAG_OLD_NAME
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagState {
    Idle,
    Editing {
        epoch: u64,
        target: TagTarget,
        selection: String,
        error: Option<String>,
    },
    Saving {
        epoch: u64,
        target: TagTarget,
        new_name: NonBlank,
    },
}

/// What the caller should do with a finished save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCompletion {
    /// The backend accepted the tag; apply the optimistic patch.
    Applied,
    /// The backend rejected the tag; the modal shows the error.
    Failed,
    /// The modal was cancelled or reopened meanwhile; ignore the result.
    Stale,
}

#[derive(Debug)]
pub struct TagModal {
    state: TagState,
    next_epoch: u64,
}

impl Default for TagModal {
    fn default() -> Self {
        Self::new()
    }
}

impl TagModal {
    pub fn new() -> Self {
        Self {
            state: TagState::Idle,
            next_epoch: 1,
        }
    }

    pub fn state(&self) -> &TagState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, TagState::Idle)
    }

    /// Error currently displayed in the modal, if any.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            TagState::Editing { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// Open the modal for `target`, discarding any previous selection.
    ///
    /// Returns the new epoch.
    pub fn open(&mut self, target: TagTarget) -> u64 {
        let epoch = self.next_epoch;
        self.next_epoch += 1;
        self.state = TagState::Editing {
            epoch,
            target,
            selection: String::new(),
            error: None,
        };
        epoch
    }

    /// Replace the selected or typed name.
    pub fn select(&mut self, name: &str) -> Result<(), CoreError> {
        match &mut self.state {
            TagState::Editing { selection, .. } => {
                *selection = name.to_string();
                Ok(())
            }
            TagState::Saving { .. } => Err(CoreError::Conflict(
                "a tag request is already being saved".into(),
            )),
            TagState::Idle => Err(CoreError::Conflict("no face is being tagged".into())),
        }
    }

    /// Close the modal without saving. Safe from any state.
    pub fn cancel(&mut self) {
        self.state = TagState::Idle;
    }

    /// Validate the selection and move to `Saving`.
    ///
    /// A blank selection leaves the modal in `Editing` with the validation
    /// message shown and returns the error.
    pub fn begin_save(&mut self) -> Result<TagRequest, CoreError> {
        let TagState::Editing {
            epoch,
            target,
            selection,
            error,
        } = &mut self.state
        else {
            return Err(CoreError::Conflict("no face is being tagged".into()));
        };

        let new_name = match NonBlank::parse(selection, MISSING_TAG_NAME) {
            Ok(name) => name,
            Err(e) => {
                *error = Some(e.to_string());
                return Err(e);
            }
        };

        let request = TagRequest {
            epoch: *epoch,
            target: target.clone(),
            new_name: new_name.clone(),
        };
        self.state = TagState::Saving {
            epoch: request.epoch,
            target: request.target.clone(),
            new_name,
        };
        Ok(request)
    }

    /// Record the backend's answer for `request`.
    pub fn finish_save(&mut self, request: &TagRequest, outcome: Result<(), String>) -> TagCompletion {
        let current = match &self.state {
            TagState::Saving { epoch, .. } => *epoch,
            _ => return TagCompletion::Stale,
        };
        if current != request.epoch {
            return TagCompletion::Stale;
        }

        match outcome {
            Ok(()) => {
                self.state = TagState::Idle;
                TagCompletion::Applied
            }
            Err(message) => {
                self.state = TagState::Editing {
                    epoch: request.epoch,
                    target: request.target.clone(),
                    selection: request.new_name.to_string(),
                    error: Some(message),
                };
                TagCompletion::Failed
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

fn find_video<'a>(videos: &'a [VideoRecord], video_id: &str) -> Result<&'a VideoRecord, CoreError> {
    videos
        .iter()
        .find(|v| v.video_id == video_id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "video",
            id: video_id.to_string(),
        })
}

fn face_not_found(video_id: &str, face_index: usize) -> CoreError {
    CoreError::NotFound {
        entity: "face",
        id: format!("{video_id}#{face_index}"),
    }
}

/// Apply a confirmed tag to the local video list.
///
/// Exactly one face, keyed by `(video_id, face_index)`, is renamed, and the
/// owning video moves forward to `name_replaced`. Nothing is modified when
/// the key does not resolve or the video's faces are not browsable.
pub fn apply_tag(
    videos: &mut [VideoRecord],
    video_id: &str,
    face_index: usize,
    new_name: &NonBlank,
) -> Result<(), CoreError> {
    let video = videos
        .iter_mut()
        .find(|v| v.video_id == video_id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "video",
            id: video_id.to_string(),
        })?;

    if !video.analysis_status.faces_browsable() {
        return Err(CoreError::Conflict(format!(
            "cannot tag video {video_id} while it is {}",
            video.analysis_status
        )));
    }

    let face = video
        .faces
        .as_mut()
        .and_then(|faces| faces.get_mut(face_index))
        .ok_or_else(|| face_not_found(video_id, face_index))?;

    face.name = new_name.to_string();
    video.analysis_status = AnalysisStatus::NameReplaced;
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::video::FaceDetection;

    fn face(name: &str) -> FaceDetection {
        FaceDetection {
            name: name.into(),
            first_timecode: "00:00:01".into(),
            last_timecode: "00:00:09".into(),
            appearances: 2,
            thumbnail_url: Some(format!("https://thumbs/{name}.jpg")),
        }
    }

    fn videos() -> Vec<VideoRecord> {
        vec![
            VideoRecord {
                video_id: "v1".into(),
                video_name: "one".into(),
                duration_seconds: Some(10.0),
                analysis_status: AnalysisStatus::FacesDone,
                faces: Some(vec![face("UNKNOWN"), face("Bob"), face("unknown_2")]),
            },
            VideoRecord {
                video_id: "v2".into(),
                video_name: "two".into(),
                duration_seconds: Some(10.0),
                analysis_status: AnalysisStatus::Processing,
                faces: None,
            },
        ]
    }

    fn name(value: &str) -> NonBlank {
        NonBlank::parse(value, "required").unwrap()
    }

    // -- reducer ----------------------------------------------------------------

    #[test]
    fn apply_tag_updates_exactly_one_face_and_status() {
        let mut list = videos();
        apply_tag(&mut list, "v1", 2, &name("Alice")).unwrap();

        let faces = list[0].faces.as_ref().unwrap();
        assert_eq!(faces[0].name, "UNKNOWN");
        assert_eq!(faces[1].name, "Bob");
        assert_eq!(faces[2].name, "Alice");
        assert_eq!(list[0].analysis_status, AnalysisStatus::NameReplaced);
        assert_eq!(list[1].analysis_status, AnalysisStatus::Processing);
    }

    #[test]
    fn apply_tag_missing_video_changes_nothing() {
        let mut list = videos();
        let before = list.clone();
        let err = apply_tag(&mut list, "nope", 0, &name("Alice")).unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "video", .. });
        assert_eq!(list, before);
    }

    #[test]
    fn apply_tag_out_of_range_face_changes_nothing() {
        let mut list = videos();
        let before = list.clone();
        let err = apply_tag(&mut list, "v1", 7, &name("Alice")).unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "face", .. });
        assert_eq!(list, before);
    }

    #[test]
    fn apply_tag_refuses_non_browsable_video() {
        let mut list = videos();
        let err = apply_tag(&mut list, "v2", 0, &name("Alice")).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
        assert_eq!(list[1].analysis_status, AnalysisStatus::Processing);
    }

    // -- target -----------------------------------------------------------------

    #[test]
    fn locate_captures_thumbnail() {
        let target = TagTarget::locate(&videos(), "v1", 0).unwrap();
        assert_eq!(target.face_index, 0);
        assert_eq!(
            target.face_image_url.as_deref(),
            Some("https://thumbs/UNKNOWN.jpg")
        );
    }

    #[test]
    fn locate_rejects_identified_face() {
        let err = TagTarget::locate(&videos(), "v1", 1).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }

    #[test]
    fn locate_rejects_processing_video() {
        assert!(TagTarget::locate(&videos(), "v2", 0).is_err());
    }

    // -- modal ------------------------------------------------------------------

    fn open_modal() -> TagModal {
        let mut modal = TagModal::new();
        modal.open(TagTarget::locate(&videos(), "v1", 0).unwrap());
        modal
    }

    #[test]
    fn blank_selection_keeps_modal_open_with_error() {
        let mut modal = open_modal();
        modal.select("   ").unwrap();

        let err = modal.begin_save().unwrap_err();
        assert_eq!(err, CoreError::Validation(MISSING_TAG_NAME.into()));
        assert!(modal.is_open());
        assert_eq!(modal.error(), Some(MISSING_TAG_NAME));
    }

    #[test]
    fn successful_save_returns_to_idle() {
        let mut modal = open_modal();
        modal.select(" Alice ").unwrap();

        let request = modal.begin_save().unwrap();
        assert_eq!(request.new_name.as_str(), "Alice");
        assert_eq!(request.old_name(), "UNKNOWN");
        assert_matches!(modal.state(), TagState::Saving { .. });

        assert_eq!(modal.finish_save(&request, Ok(())), TagCompletion::Applied);
        assert_eq!(modal.state(), &TagState::Idle);
    }

    #[test]
    fn failed_save_keeps_selection_and_shows_error() {
        let mut modal = open_modal();
        modal.select("Alice").unwrap();
        let request = modal.begin_save().unwrap();

        let completion = modal.finish_save(&request, Err("subject locked".into()));
        assert_eq!(completion, TagCompletion::Failed);
        assert_matches!(
            modal.state(),
            TagState::Editing { selection, error: Some(e), .. }
                if selection == "Alice" && e == "subject locked"
        );
    }

    #[test]
    fn cancel_during_save_makes_result_stale() {
        let mut modal = open_modal();
        modal.select("Alice").unwrap();
        let request = modal.begin_save().unwrap();

        modal.cancel();
        assert_eq!(modal.finish_save(&request, Ok(())), TagCompletion::Stale);
        assert_eq!(modal.state(), &TagState::Idle);
    }

    #[test]
    fn reopened_modal_ignores_previous_request() {
        let mut modal = open_modal();
        modal.select("Alice").unwrap();
        let first = modal.begin_save().unwrap();

        modal.cancel();
        modal.open(TagTarget::locate(&videos(), "v1", 2).unwrap());
        modal.select("Carol").unwrap();
        let second = modal.begin_save().unwrap();
        assert_ne!(first.epoch, second.epoch);

        assert_eq!(modal.finish_save(&first, Ok(())), TagCompletion::Stale);
        assert_eq!(modal.finish_save(&second, Ok(())), TagCompletion::Applied);
    }

    #[test]
    fn select_without_open_modal_is_rejected() {
        let mut modal = TagModal::new();
        assert!(modal.select("Alice").is_err());
        assert!(modal.begin_save().is_err());
    }
}
