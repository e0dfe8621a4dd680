//! Status badge lookup for the dashboard.
//!
//! Every known [`AnalysisStatus`] maps to a fixed emoji, label and colour.
//! Unrecognized statuses fall back to a neutral bullet badge that shows the
//! raw status text.

use crate::video::AnalysisStatus;

/// Colour group of a badge, for renderers that cannot use hex colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Pending,
    Success,
    Failure,
    Neutral,
}

/// Display data for a status badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub emoji: &'static str,
    pub label: String,
    /// CSS-style hex colour, e.g. `#4ade80`.
    pub color: &'static str,
    pub tone: BadgeTone,
}

const COLOR_PENDING: &str = "#facc15";
const COLOR_SUCCESS: &str = "#4ade80";
const COLOR_FAILURE: &str = "#ef4444";
const COLOR_NEUTRAL: &str = "#888";

/// Label of the static badge shown on every archive row.
pub const ARCHIVED_LABEL: &str = "Archived";

fn badge(emoji: &'static str, label: &str, color: &'static str, tone: BadgeTone) -> StatusBadge {
    StatusBadge {
        emoji,
        label: label.to_string(),
        color,
        tone,
    }
}

/// Look up the badge for a status.
pub fn status_badge(status: &AnalysisStatus) -> StatusBadge {
    use BadgeTone::*;

    match status {
        AnalysisStatus::Processing => badge("⏳", "Processing", COLOR_PENDING, Pending),
        AnalysisStatus::FacesDone => {
            badge("✅", "Face analysis completed", COLOR_SUCCESS, Success)
        }
        AnalysisStatus::NameReplaced => badge(
            "✅",
            "Face analysis completed (tag updated)",
            COLOR_SUCCESS,
            Success,
        ),
        AnalysisStatus::AudioDone => {
            badge("🎧", "Audio analysis completed", COLOR_SUCCESS, Success)
        }
        AnalysisStatus::VisDone => badge("👁", "Visual analysis completed", COLOR_SUCCESS, Success),
        AnalysisStatus::Done => badge("✔", "Analysis completed", COLOR_SUCCESS, Success),
        AnalysisStatus::Failed => badge("❌", "Failed", COLOR_FAILURE, Failure),
        AnalysisStatus::Other(raw) => badge("●", raw, COLOR_NEUTRAL, Neutral),
    }
}

/// The static badge used by the archive view.
pub fn archived_badge() -> StatusBadge {
    badge("✓", ARCHIVED_LABEL, COLOR_SUCCESS, BadgeTone::Success)
}
