//! Dashboard and archive row derivation.
//!
//! Pure functions from fetched [`VideoRecord`]s to display rows. No network
//! access happens here; the session layer fetches and this module derives.

use crate::status::{archived_badge, status_badge, StatusBadge};
use crate::timecode::{
    display_or_placeholder, format_duration, format_duration_with_frames, screen_time,
    DEFAULT_FRAME_RATE, PLACEHOLDER,
};
use crate::video::VideoRecord;

pub const UNNAMED_VIDEO: &str = "Unnamed video";
pub const NO_FACES_DETECTED: &str = "None detected";
pub const EMPTY_DASHBOARD: &str = "No videos yet. Start your first analysis!";
pub const EMPTY_ARCHIVE: &str = "No archived videos yet.";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One detected face as shown in the dashboard face column.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRow {
    /// Position inside the video's `faces` list; the tagging key.
    pub index: usize,
    pub name: String,
    pub screen_time: String,
    pub first_timecode: String,
    pub last_timecode: String,
    /// Whether the "Tag" affordance is offered for this face.
    pub taggable: bool,
    pub thumbnail_url: Option<String>,
}

impl FaceRow {
    pub fn summary(&self) -> String {
        format!(
            "{} | Screen time: {} | First: {} | Last: {}",
            self.name, self.screen_time, self.first_timecode, self.last_timecode
        )
    }
}

/// Content of the dashboard face column.
#[derive(Debug, Clone, PartialEq)]
pub enum FacesCell {
    /// Face results are not browsable for the current status.
    NotAvailable,
    /// Browsable, but the backend reported no faces.
    NoneDetected,
    Faces(Vec<FaceRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRow {
    pub video_id: String,
    pub name: String,
    /// `MM:SS:FF` at [`DEFAULT_FRAME_RATE`].
    pub duration: String,
    pub badge: StatusBadge,
    pub faces: FacesCell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRow {
    pub video_id: String,
    pub name: String,
    /// `MM:SS`.
    pub duration: String,
    pub badge: StatusBadge,
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

fn display_name(video: &VideoRecord) -> String {
    if video.video_name.trim().is_empty() {
        UNNAMED_VIDEO.to_string()
    } else {
        video.video_name.clone()
    }
}

fn faces_cell(video: &VideoRecord) -> FacesCell {
    if !video.analysis_status.faces_browsable() {
        return FacesCell::NotAvailable;
    }

    match video.faces.as_deref() {
        None | Some([]) => FacesCell::NoneDetected,
        Some(faces) => FacesCell::Faces(
            faces
                .iter()
                .enumerate()
                .map(|(index, face)| FaceRow {
                    index,
                    name: face.name.clone(),
                    screen_time: screen_time(&face.first_timecode, &face.last_timecode)
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                    first_timecode: face.first_timecode.clone(),
                    last_timecode: face.last_timecode.clone(),
                    taggable: face.is_unknown(),
                    thumbnail_url: face.thumbnail_url.clone(),
                })
                .collect(),
        ),
    }
}

/// Derive one dashboard row per video, in server order.
pub fn dashboard_rows(videos: &[VideoRecord]) -> Vec<DashboardRow> {
    videos
        .iter()
        .map(|video| DashboardRow {
            video_id: video.video_id.clone(),
            name: display_name(video),
            duration: display_or_placeholder(video.duration_seconds, |s| {
                format_duration_with_frames(s, DEFAULT_FRAME_RATE)
            }),
            badge: status_badge(&video.analysis_status),
            faces: faces_cell(video),
        })
        .collect()
}

/// Derive archive rows, dropping every video that is still processing.
pub fn archive_rows(videos: &[VideoRecord]) -> Vec<ArchiveRow> {
    videos
        .iter()
        .filter(|video| video.analysis_status.is_archived())
        .map(|video| ArchiveRow {
            video_id: video.video_id.clone(),
            name: display_name(video),
            duration: display_or_placeholder(video.duration_seconds, format_duration),
            badge: archived_badge(),
        })
        .collect()
}
