//! Video and face records as returned by the analysis backend.
//!
//! Field names match the webhook JSON exactly, so these types are used
//! directly as serde wire types by the gateway.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name the backend assigns to a face it could not identify.
pub const UNKNOWN_FACE_NAME: &str = "UNKNOWN";

// ---------------------------------------------------------------------------
// Analysis status
// ---------------------------------------------------------------------------

/// Server-driven analysis state of a video.
///
/// The client never drives transitions itself (apart from the optimistic
/// tag patch), so unrecognized values are kept verbatim in [`Other`](Self::Other)
/// instead of failing deserialization of the whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisStatus {
    Processing,
    FacesDone,
    NameReplaced,
    AudioDone,
    VisDone,
    Done,
    Failed,
    Other(String),
}

impl AnalysisStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Processing => "processing",
            Self::FacesDone => "faces_done",
            Self::NameReplaced => "name_replaced",
            Self::AudioDone => "audio_done",
            Self::VisDone => "vis_done",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Other(raw) => raw,
        }
    }

    /// Face results can be listed (and tagged) for this video.
    pub fn faces_browsable(&self) -> bool {
        matches!(self, Self::FacesDone | Self::NameReplaced)
    }

    /// Anything that is no longer being processed belongs in the archive.
    pub fn is_archived(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

impl From<String> for AnalysisStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "processing" => Self::Processing,
            "faces_done" => Self::FacesDone,
            "name_replaced" => Self::NameReplaced,
            "audio_done" => Self::AudioDone,
            "vis_done" => Self::VisDone,
            "done" => Self::Done,
            "failed" => Self::Failed,
            _ => Self::Other(raw),
        }
    }
}

impl From<AnalysisStatus> for String {
    fn from(status: AnalysisStatus) -> Self {
        match status {
            AnalysisStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One appearance cluster of a face inside a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub name: String,
    /// First appearance, `HH:MM:SS`.
    pub first_timecode: String,
    /// Last appearance, `HH:MM:SS`.
    pub last_timecode: String,
    #[serde(default)]
    pub appearances: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl FaceDetection {
    /// Only faces the backend left unidentified can be tagged.
    pub fn is_unknown(&self) -> bool {
        self.name.to_lowercase().contains("unknown")
    }
}

/// A server-tracked unit of analysis work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    #[serde(default)]
    pub video_name: String,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    pub analysis_status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faces: Option<Vec<FaceDetection>>,
}

/// Acknowledgement returned when an analysis is queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Blank when the backend omitted it.
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
