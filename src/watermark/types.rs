use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Per-run processing configuration, constructed once from CLI and config
/// file input and passed down the call chain unchanged.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProcessOptions {
    /// Font size of the stamped text in pixels
    pub font_size: u32,
    /// Color spec: `#RRGGBB`, `#RGB`, or a named color
    pub color: String,
    /// Placement of the text, e.g. `bottom-right` or `center`
    pub position: String,
    /// Explicit font file to try before the system fallback list
    pub font_path: Option<PathBuf>,
    /// Text opacity, 0 (invisible) to 255 (opaque)
    pub opacity: u8,
    /// Fall back to the file modification time when no EXIF date exists
    pub use_mtime_fallback: bool,
    /// Skip files for which no date could be determined
    pub skip_if_no_date: bool,
    /// Distance from the image edges in pixels
    pub margin: u32,
    /// JPEG output quality (1-100)
    pub jpeg_quality: u8,
    /// Report the would-be output path without writing anything
    pub dry_run: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            font_size: 36,
            color: "#FFFFFF".to_string(),
            position: "bottom-right".to_string(),
            font_path: None,
            opacity: 255,
            use_mtime_fallback: true,
            skip_if_no_date: false,
            margin: 10,
            jpeg_quality: 95,
            dry_run: false,
        }
    }
}

/// Text anchor within the image frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Position {
    /// Look up a position by name, case-insensitively. Returns `None` for
    /// unrecognized names; callers fall back to centered placement.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "top-left" => Some(Position::TopLeft),
            "top-center" | "center-top" => Some(Position::TopCenter),
            "top-right" => Some(Position::TopRight),
            "center-left" => Some(Position::CenterLeft),
            "center" => Some(Position::Center),
            "center-right" => Some(Position::CenterRight),
            "bottom-left" => Some(Position::BottomLeft),
            "bottom-center" | "center-bottom" => Some(Position::BottomCenter),
            "bottom-right" => Some(Position::BottomRight),
            _ => None,
        }
    }
}

/// Outcome of processing a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// File was written (or would be written, on a dry run)
    Success(PathBuf),
    /// File was deliberately not processed (no date available)
    Skipped,
    /// File could not be processed; the batch continues
    Failed(String),
}

/// Aggregated outcome counts for a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub success: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl BatchStats {
    pub(crate) fn record(&mut self, result: &ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped => self.skipped += 1,
            ProcessResult::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.success + self.failed + self.skipped
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed: {} succeeded, {} failed, {} skipped",
            self.success, self.failed, self.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_names_and_aliases() {
        assert_eq!(Position::from_name("bottom-right"), Some(Position::BottomRight));
        assert_eq!(Position::from_name("bottom-center"), Some(Position::BottomCenter));
        assert_eq!(Position::from_name("center-bottom"), Some(Position::BottomCenter));
        assert_eq!(Position::from_name("top-center"), Some(Position::TopCenter));
        assert_eq!(Position::from_name("center-top"), Some(Position::TopCenter));
        assert_eq!(Position::from_name("center"), Some(Position::Center));
    }

    #[test]
    fn test_position_is_case_insensitive() {
        assert_eq!(Position::from_name("Bottom-Right"), Some(Position::BottomRight));
        assert_eq!(Position::from_name("CENTER"), Some(Position::Center));
    }

    #[test]
    fn test_unknown_position_is_none() {
        assert_eq!(Position::from_name("middle"), None);
        assert_eq!(Position::from_name(""), None);
    }

    #[test]
    fn test_stats_record_and_total() {
        let mut stats = BatchStats::default();
        stats.record(&ProcessResult::Success(PathBuf::from("a")));
        stats.record(&ProcessResult::Skipped);
        stats.record(&ProcessResult::Failed("bad".to_string()));
        stats.record(&ProcessResult::Success(PathBuf::from("b")));
        assert_eq!(stats.success, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn test_stats_summary_line() {
        let stats = BatchStats {
            success: 3,
            failed: 1,
            skipped: 2,
        };
        assert_eq!(
            stats.to_string(),
            "Processed: 3 succeeded, 1 failed, 2 skipped"
        );
    }

    #[test]
    fn test_default_options_match_cli_defaults() {
        let options = ProcessOptions::default();
        assert_eq!(options.font_size, 36);
        assert_eq!(options.color, "#FFFFFF");
        assert_eq!(options.position, "bottom-right");
        assert_eq!(options.opacity, 255);
        assert!(options.use_mtime_fallback);
        assert!(!options.skip_if_no_date);
        assert_eq!(options.jpeg_quality, 95);
        assert!(!options.dry_run);
    }
}
