//! Plain-text rendering of session views for the terminal.
//!
//! Every function returns a `String` so output can be asserted on after
//! stripping ANSI codes.

use console::style;
use facewatch_core::status::{BadgeTone, StatusBadge};
use facewatch_core::timecode::PLACEHOLDER;
use facewatch_core::view::{FacesCell, EMPTY_ARCHIVE, EMPTY_DASHBOARD, NO_FACES_DETECTED};
use facewatch_session::analysis::ResultsView;
use facewatch_session::archive::ArchiveView;
use facewatch_session::dashboard::{DashboardView, LoadState, TagModalView};
use facewatch_session::subjects::SubjectsSnapshot;
use facewatch_session::training::TrainingView;

pub fn badge(badge: &StatusBadge) -> String {
    let text = format!("{} {}", badge.emoji, badge.label);
    match badge.tone {
        BadgeTone::Pending => style(text).yellow().to_string(),
        BadgeTone::Success => style(text).green().to_string(),
        BadgeTone::Failure => style(text).red().to_string(),
        BadgeTone::Neutral => style(text).dim().to_string(),
    }
}

pub fn error(message: &str) -> String {
    format!("{} {}", style("error:").red().bold(), style(message).red())
}

fn heading(title: &str) -> String {
    style(title).cyan().bold().to_string()
}

/// `None` when the view is ready; otherwise the text that replaces it.
fn load_banner(load: &LoadState) -> Option<String> {
    match load {
        LoadState::Loading => Some(style("Loading...").dim().to_string()),
        LoadState::Ready => None,
        LoadState::Failed(message) => Some(error(message)),
    }
}

pub fn dashboard(view: &DashboardView) -> String {
    let mut lines = vec![heading("Dashboard")];

    if let Some(banner) = load_banner(&view.load) {
        lines.push(banner);
        return lines.join("\n");
    }
    if view.rows.is_empty() {
        lines.push(EMPTY_DASHBOARD.to_string());
        return lines.join("\n");
    }

    for row in &view.rows {
        lines.push(format!(
            "{}  {}  {}  {}",
            style(&row.video_id).bold(),
            row.name,
            style(&row.duration).dim(),
            badge(&row.badge)
        ));
        match &row.faces {
            FacesCell::NotAvailable => lines.push(format!("    faces: {PLACEHOLDER}")),
            FacesCell::NoneDetected => lines.push(format!("    faces: {NO_FACES_DETECTED}")),
            FacesCell::Faces(faces) => {
                for face in faces {
                    let marker = if face.taggable {
                        style(" [tag]").magenta().to_string()
                    } else {
                        String::new()
                    };
                    lines.push(format!("    #{} {}{marker}", face.index, face.summary()));
                }
            }
        }
    }

    if let Some(modal) = &view.modal {
        lines.push(String::new());
        lines.push(tag_modal(modal));
    }

    lines.join("\n")
}

pub fn tag_modal(modal: &TagModalView) -> String {
    let mut lines = vec![heading(&format!(
        "Tag face #{} in {}",
        modal.target.face_index, modal.target.video_id
    ))];

    if let Some(url) = &modal.target.face_image_url {
        lines.push(format!("  thumbnail: {url}"));
    }
    if !modal.subjects.is_empty() {
        lines.push(format!("  known subjects: {}", modal.subjects.join(", ")));
    }
    if !modal.selection.is_empty() {
        lines.push(format!("  selected: {}", modal.selection));
    }
    if modal.saving {
        lines.push(style("  Saving...").dim().to_string());
    }
    if let Some(message) = &modal.error {
        lines.push(format!("  {}", error(message)));
    }

    lines.join("\n")
}

pub fn archive(view: &ArchiveView) -> String {
    let mut lines = vec![heading("Archive")];

    if let Some(banner) = load_banner(&view.load) {
        lines.push(banner);
    } else if view.rows.is_empty() {
        lines.push(EMPTY_ARCHIVE.to_string());
    } else {
        lines.extend(view.rows.iter().map(|row| {
            format!(
                "{}  {}  {}  {}",
                style(&row.video_id).bold(),
                row.name,
                style(&row.duration).dim(),
                badge(&row.badge)
            )
        }));
    }

    lines.join("\n")
}

pub fn results(view: &ResultsView) -> String {
    let mut lines = vec![
        heading("Analysis in Progress"),
        format!("Video ID: {}", style(&view.video_id).bold()),
        "The video has been received and is being processed.".to_string(),
        "Face recognition analysis may take a few minutes.".to_string(),
        format!("Status: {}", badge(&view.badge)),
    ];
    if let Some(message) = &view.message {
        lines.push(style(message).dim().to_string());
    }
    lines.push(
        style("Results will appear in the archive once processing finishes.")
            .dim()
            .to_string(),
    );
    lines.join("\n")
}

pub fn training(view: &TrainingView) -> String {
    let mut lines = vec![heading("Train subject")];

    if let Some(confirmation) = view.confirmation {
        lines.push(style(confirmation).green().bold().to_string());
    }
    if let Some(message) = &view.error {
        lines.push(error(message));
    }
    if view.submitting {
        lines.push(style("Submitting...").dim().to_string());
    }
    lines.join("\n")
}

pub fn subjects(snapshot: &SubjectsSnapshot) -> String {
    let mut lines = vec![heading("Subjects")];

    if snapshot.loading {
        lines.push(style("Loading...").dim().to_string());
    }
    if let Some(message) = &snapshot.error {
        lines.push(error(message));
    }
    if snapshot.subjects.is_empty() && snapshot.error.is_none() && !snapshot.loading {
        lines.push(style("No subjects yet.").dim().to_string());
    }
    lines.extend(snapshot.subjects.iter().map(|name| format!("  {name}")));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use console::strip_ansi_codes;
    use facewatch_core::status::{archived_badge, status_badge};
    use facewatch_core::video::AnalysisStatus;
    use facewatch_core::view::{ArchiveRow, DashboardRow, FaceRow};

    use super::*;

    fn plain(text: String) -> String {
        strip_ansi_codes(&text).into_owned()
    }

    fn row(id: &str, status: AnalysisStatus, faces: FacesCell) -> DashboardRow {
        DashboardRow {
            video_id: id.into(),
            name: format!("{id}.mp4"),
            duration: "01:05:00".into(),
            badge: status_badge(&status),
            faces,
        }
    }

    #[test]
    fn badge_shows_emoji_and_label() {
        assert_eq!(
            plain(badge(&status_badge(&AnalysisStatus::Failed))),
            "❌ Failed"
        );
    }

    #[test]
    fn dashboard_face_column_states() {
        let view = DashboardView {
            load: LoadState::Ready,
            rows: vec![
                row("a", AnalysisStatus::Processing, FacesCell::NotAvailable),
                row("b", AnalysisStatus::FacesDone, FacesCell::NoneDetected),
                row(
                    "c",
                    AnalysisStatus::FacesDone,
                    FacesCell::Faces(vec![FaceRow {
                        index: 0,
                        name: "UNKNOWN".into(),
                        screen_time: "00:55".into(),
                        first_timecode: "00:00:10".into(),
                        last_timecode: "00:01:05".into(),
                        taggable: true,
                        thumbnail_url: None,
                    }]),
                ),
            ],
            modal: None,
        };

        let text = plain(dashboard(&view));
        assert!(text.contains("faces: —"));
        assert!(text.contains("faces: None detected"));
        assert!(text.contains(
            "#0 UNKNOWN | Screen time: 00:55 | First: 00:00:10 | Last: 00:01:05 [tag]"
        ));
    }

    #[test]
    fn empty_and_failed_lists() {
        let empty = DashboardView {
            load: LoadState::Ready,
            rows: vec![],
            modal: None,
        };
        assert!(plain(dashboard(&empty)).contains(EMPTY_DASHBOARD));

        let failed = ArchiveView {
            load: LoadState::Failed("Failed to fetch archive: Bad Gateway".into()),
            rows: vec![ArchiveRow {
                video_id: "x".into(),
                name: "x".into(),
                duration: "00:01".into(),
                badge: archived_badge(),
            }],
        };
        let text = plain(archive(&failed));
        assert!(text.contains("error: Failed to fetch archive: Bad Gateway"));
        assert!(!text.contains("Archived"));
    }

    #[test]
    fn subjects_error_is_shown() {
        let text = plain(subjects(&SubjectsSnapshot {
            subjects: vec![],
            loading: false,
            error: Some("subjects workflow is disabled".into()),
        }));
        assert!(text.contains("error: subjects workflow is disabled"));
        assert!(!text.contains("No subjects yet."));
    }
}
