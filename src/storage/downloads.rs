// src/storage/downloads.rs
//! Local destination for files returned by the signing service.
//!
//! A "download" writes the returned bytes under a file name derived from the
//! user's input. Names never contain directories, so a crafted input name
//! cannot escape the output directory.

use bytes::Bytes;
use log::debug;
use std::path::{Path, PathBuf};

use crate::api::error::ApiError;

/// Somewhere to put a returned file.
pub trait DownloadSink: Send + Sync {
    /// Stores `content` as `file_name` and returns where it went.
    fn save(&self, file_name: &str, content: &Bytes) -> Result<PathBuf, ApiError>;
}

/// Writes downloads into a directory, creating it on first use.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, file_name: &str, content: &Bytes) -> Result<PathBuf, ApiError> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name == "."
            || file_name == ".."
        {
            return Err(ApiError::Validation(format!("refusing to write file named '{}'", file_name)));
        }

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, content)?;
        debug!("wrote {} bytes to {}", content.len(), path.display());
        Ok(path)
    }
}

// =====================
// Naming rules
// =====================

/// `signed-<original name>` for PAdES, XAdES and WS-Security results.
pub fn signed_file_name(original: &str) -> String {
    format!("signed-{}", original)
}

/// `signed-cades-<unix millis>.p7s` for CAdES results.
pub fn cades_file_name(unix_millis: i64) -> String {
    format!("signed-cades-{}.p7s", unix_millis)
}

/// `<original name>.tst` for issued timestamp tokens.
pub fn timestamp_file_name(original: &str) -> String {
    format!("{}.tst", original)
}

/// Keeps every download in memory for assertions.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    saved: std::sync::Mutex<Vec<(String, Bytes)>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn saved(&self) -> Vec<(String, Bytes)> {
        self.saved.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl DownloadSink for RecordingSink {
    fn save(&self, file_name: &str, content: &Bytes) -> Result<PathBuf, ApiError> {
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_string(), content.clone()));
        Ok(PathBuf::from(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_rules() {
        assert_eq!(signed_file_name("contract.pdf"), "signed-contract.pdf");
        assert_eq!(cades_file_name(1734534326266), "signed-cades-1734534326266.p7s");
        assert_eq!(timestamp_file_name("invoice.xml"), "invoice.xml.tst");
    }

    #[test]
    fn writes_into_created_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("out"));
        let path = sink.save("signed-a.pdf", &Bytes::from_static(b"%PDF")).unwrap();
        assert_eq!(path, tmp.path().join("out").join("signed-a.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF");
    }

    #[test]
    fn rejects_names_with_separators() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());
        for name in ["../evil", "a/b", "..", ""] {
            assert!(matches!(
                sink.save(name, &Bytes::new()),
                Err(ApiError::Validation(_))
            ));
        }
    }
}
