//! View-state types for the trial flow.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::analysis::{AnalysisError, AnalysisResult, ScanUpload};

use super::image::DecodedImage;

/// Which screen of the trial flow is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewState {
    Upload,
    Preview,
    Analyzing,
    Results,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Upload => "upload",
            Self::Preview => "preview",
            Self::Analyzing => "analyzing",
            Self::Results => "results",
        })
    }
}

/// Extensions offered by the file picker. Only a hint; contents are never
/// inspected before upload.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["nii", "nii.gz", "dcm", "jpg", "png"];

/// Extension filter for native file dialogs, which match only the last
/// extension component.
pub const PICKER_EXTENSIONS: &[&str] = &["nii", "gz", "dcm", "jpg", "png"];

/// A scan chosen by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    /// Declared MIME type, when the extension maps to one.
    pub mime: Option<String>,
}

impl SelectedFile {
    /// Describe the file at `path` from its metadata.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_for_name(&name).map(str::to_string);
        Ok(Self {
            path: path.to_path_buf(),
            name,
            size_bytes: metadata.len(),
            mime,
        })
    }

    /// Size in mebibytes, for display.
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }

    /// Type label shown on the preview screen.
    pub fn type_label(&self) -> &str {
        self.mime.as_deref().unwrap_or("Medical Image")
    }

    /// Load the file for submission.
    pub fn to_upload(&self) -> Result<ScanUpload, AnalysisError> {
        ScanUpload::read(&self.path, &self.name, self.mime.as_deref())
    }
}

/// MIME type a browser would declare for the accepted extensions.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        Some("image/png")
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        Some("image/jpeg")
    } else if lower.ends_with(".dcm") {
        Some("application/dicom")
    } else if lower.ends_with(".gz") {
        Some("application/gzip")
    } else {
        None
    }
}

/// Tone of an inline banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeTone {
    Info,
    Error,
}

/// Non-blocking banner shown above the trial screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialNotice {
    pub text: String,
    pub tone: NoticeTone,
}

impl TrialNotice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: NoticeTone::Error,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: NoticeTone::Info,
        }
    }
}

/// Load state of the segmentation image on the results screen.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultImage {
    Loading,
    Ready(DecodedImage),
    /// Nothing to show; the reason is displayed in place of the image.
    Unavailable(String),
}

/// The active screen and the data it owns.
///
/// A file exists only while previewing, analyzing or showing results, and a
/// result only on the results screen.
#[derive(Clone, Debug, Default)]
pub(crate) enum TrialView {
    #[default]
    Upload,
    Preview {
        file: SelectedFile,
    },
    Analyzing {
        file: SelectedFile,
        request_id: u64,
    },
    Results {
        file: SelectedFile,
        result: Box<AnalysisResult>,
        request_id: u64,
        image: ResultImage,
    },
}

impl TrialView {
    pub(crate) fn state(&self) -> ViewState {
        match self {
            Self::Upload => ViewState::Upload,
            Self::Preview { .. } => ViewState::Preview,
            Self::Analyzing { .. } => ViewState::Analyzing,
            Self::Results { .. } => ViewState::Results,
        }
    }

    pub(crate) fn file(&self) -> Option<&SelectedFile> {
        match self {
            Self::Upload => None,
            Self::Preview { file }
            | Self::Analyzing { file, .. }
            | Self::Results { file, .. } => Some(file),
        }
    }

    pub(crate) fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Results { result, .. } => Some(result.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn analyzing_request(&self) -> Option<u64> {
        match self {
            Self::Analyzing { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn from_path_reads_size_and_declared_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slice.PNG");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();
        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "slice.PNG");
        assert_eq!(file.size_bytes, 2048);
        assert_eq!(file.mime.as_deref(), Some("image/png"));
    }

    #[test]
    fn nifti_has_no_declared_type() {
        assert_eq!(mime_for_name("chest.nii"), None);
        assert_eq!(mime_for_name("chest.nii.gz"), Some("application/gzip"));
        let file = SelectedFile {
            path: PathBuf::from("chest.nii"),
            name: "chest.nii".to_string(),
            size_bytes: 3 * 1024 * 1024,
            mime: None,
        };
        assert_eq!(file.type_label(), "Medical Image");
        assert!((file.size_mb() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn from_path_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        assert!(SelectedFile::from_path(&dir.path().join("missing.dcm")).is_err());
    }
}
