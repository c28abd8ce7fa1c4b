//! Finished export output

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ExportError;

/// How the artifact should be handed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Saved as a download.
    Attachment,
    /// Opened for viewing, e.g. a PDF that prints on open.
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    pub disposition: Disposition,
}

impl Artifact {
    pub fn attachment(file_name: impl Into<String>, mime_type: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
            disposition: Disposition::Attachment,
        }
    }

    /// Writes the artifact into `dir` under its own file name and returns the
    /// full path. Directory parts in the file name are dropped.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(safe_file_name(&self.file_name));
        fs::write(&path, &self.bytes)?;

        info!(
            "Export written: {} ({} bytes, {})",
            path.display(),
            self.bytes.len(),
            self.mime_type
        );
        Ok(path)
    }
}

fn safe_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        "export".to_string()
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("report.csv"), "report.csv");
        assert_eq!(safe_file_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_file_name("a\\b\\c.pdf"), "c.pdf");
        assert_eq!(safe_file_name("reports/"), "export");
        assert_eq!(safe_file_name(".."), "export");
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact::attachment("drivers.csv", "text/csv;charset=utf-8", b"a,b".to_vec());

        let path = artifact.write_to_dir(&dir.path().join("nested")).unwrap();
        assert_eq!(path.file_name().unwrap(), "drivers.csv");
        assert_eq!(fs::read(&path).unwrap(), b"a,b");
    }
}
