// src/api/upload.rs
//! Documents selected by the user for upload.

use bytes::Bytes;
use log::debug;
use reqwest::multipart::Part;
use std::path::Path;

use crate::api::error::ApiError;

/// An in-memory document with the file name it was selected under.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub file_name: String,
    pub content: Bytes,
}

impl Document {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Document {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Loads a document from disk, keeping only its file name.
    pub async fn read(path: &Path) -> Result<Self, ApiError> {
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::Validation(format!("'{}' is not a file path", path.display())))?
            .to_string();
        let document = Document::new(file_name, content);
        debug!("read {} ({} bytes)", path.display(), document.len());
        Ok(document)
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Content type guessed from the extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => "application/pdf",
            Some("xml") => "application/xml",
            Some("p7s") | Some("p7m") => "application/pkcs7-signature",
            Some("tst") | Some("tsr") | Some("ts") => "application/timestamp-reply",
            Some("txt") => "text/plain",
            Some("json") => "application/json",
            _ => "application/octet-stream",
        }
    }

    /// Multipart file part carrying the original file name.
    pub fn to_part(&self) -> Result<Part, ApiError> {
        Ok(Part::bytes(self.content.to_vec())
            .file_name(self.file_name.clone())
            .mime_str(self.mime_type())?)
    }
}
