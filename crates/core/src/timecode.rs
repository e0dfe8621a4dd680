//! Duration and timecode formatting.
//!
//! Durations from the backend are real-valued seconds; face appearances are
//! `H:MM:SS` strings. All formatters return `None` for values that cannot
//! be displayed (negative, NaN, infinite) and leave the placeholder choice
//! to the caller, except [`display_or_placeholder`].

/// Shown wherever a duration cannot be rendered.
pub const PLACEHOLDER: &str = "—";

/// Frame rate assumed when rendering `MM:SS:FF` durations.
pub const DEFAULT_FRAME_RATE: u32 = 25;

fn displayable(seconds: f64) -> bool {
    seconds.is_finite() && seconds >= 0.0
}

/// Render `seconds` as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours, so long videos render as e.g. `125:03`.
pub fn format_duration(seconds: f64) -> Option<String> {
    if !displayable(seconds) {
        return None;
    }
    let whole = seconds.floor() as u64;
    Some(format!("{:02}:{:02}", whole / 60, whole % 60))
}

/// Render `seconds` as `MM:SS:FF`, where `FF` counts frames of the
/// fractional second at `frame_rate`.
pub fn format_duration_with_frames(seconds: f64, frame_rate: u32) -> Option<String> {
    if !displayable(seconds) {
        return None;
    }
    let whole = seconds.floor();
    let frames = ((seconds - whole) * f64::from(frame_rate)).floor() as u64;
    let whole = whole as u64;
    Some(format!(
        "{:02}:{:02}:{:02}",
        whole / 60,
        whole % 60,
        frames
    ))
}

/// Convenience for optional durations: absent or undisplayable values
/// collapse to [`PLACEHOLDER`].
pub fn display_or_placeholder(seconds: Option<f64>, format: impl Fn(f64) -> Option<String>) -> String {
    seconds
        .and_then(format)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Convert an `H:MM:SS` timecode to seconds.
///
/// Exactly three colon-separated numeric parts are read as hours, minutes
/// and seconds. Any other part count, or a part that is not a number,
/// yields `0.0`.
pub fn timecode_to_seconds(timecode: &str) -> f64 {
    let parts: Vec<&str> = timecode.split(':').collect();
    if parts.len() != 3 {
        return 0.0;
    }

    let parsed: Option<Vec<f64>> = parts
        .iter()
        .map(|part| part.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();

    match parsed.as_deref() {
        Some([hours, minutes, secs]) => hours * 3600.0 + minutes * 60.0 + secs,
        _ => 0.0,
    }
}

/// Time a face is on screen, `last - first`, rendered as `MM:SS`.
///
/// Returns `None` when the last timecode precedes the first one.
pub fn screen_time(first_timecode: &str, last_timecode: &str) -> Option<String> {
    let first = timecode_to_seconds(first_timecode);
    let last = timecode_to_seconds(last_timecode);
    format_duration(last - first)
}
