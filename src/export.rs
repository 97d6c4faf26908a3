//! Report export as a downloadable markdown file.

use crate::error::{EvaluatorError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name offered for every exported report.
pub const REPORT_FILE_NAME: &str = "benchmark-report.md";

/// Content type of the exported file.
pub const REPORT_CONTENT_TYPE: &str = "text/markdown;charset=utf-8";

/// A report ready to be handed to the user as a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDownload {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ReportDownload {
    /// Wrap the verbatim report text as `benchmark-report.md`.
    pub fn markdown(report: &str) -> Self {
        Self {
            file_name: REPORT_FILE_NAME,
            content_type: REPORT_CONTENT_TYPE,
            bytes: report.as_bytes().to_vec(),
        }
    }

    /// `Content-Disposition` header value for an attachment download.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }

    /// Write the file. A directory target receives `benchmark-report.md`.
    pub fn save(&self, target: &Path) -> Result<PathBuf> {
        let path = if target.is_dir() {
            target.join(self.file_name)
        } else {
            target.to_path_buf()
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| EvaluatorError::io(parent, e))?;
            }
        }

        fs::write(&path, &self.bytes).map_err(|e| EvaluatorError::io(&path, e))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_markdown_download() {
        let download = ReportDownload::markdown("# Report\nAccuracy: 0.91");
        assert_eq!(download.file_name, "benchmark-report.md");
        assert_eq!(download.content_type, "text/markdown;charset=utf-8");
        assert_eq!(download.bytes, "# Report\nAccuracy: 0.91".as_bytes());
        assert_eq!(
            download.content_disposition(),
            "attachment; filename=\"benchmark-report.md\""
        );
    }

    #[test]
    fn test_save_into_directory() {
        let dir = TempDir::new().unwrap();
        let download = ReportDownload::markdown("F1: 0.88, précision élevée");

        let path = download.save(dir.path()).unwrap();

        assert_eq!(path, dir.path().join(REPORT_FILE_NAME));
        assert_eq!(fs::read_to_string(&path).unwrap(), "F1: 0.88, précision élevée");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("reports/mrpc/run-1.md");

        let path = ReportDownload::markdown("ok").save(&target).unwrap();

        assert_eq!(path, target);
        assert!(path.exists());
    }
}
