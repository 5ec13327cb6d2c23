use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the bytes of a pending attachment live
#[derive(Debug, Clone)]
pub enum FileSource {
    Memory(Vec<u8>),
    Disk(PathBuf),
}

/// A local file waiting to be uploaded.
///
/// The size is known up front so validation never reads the contents.
#[derive(Debug, Clone)]
pub struct LocalFile {
    name: String,
    size: u64,
    source: FileSource,
}

impl LocalFile {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// File on disk with an already-known size
    pub fn on_disk(name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            source: FileSource::Disk(path.into()),
        }
    }

    /// Stat a file on disk; its name is the final path component
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::on_disk(name, path, metadata.len()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Lowercased text after the last `.`, if any
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase()).filter(|e| !e.is_empty())
    }

    /// Load the file contents for upload
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(bytes.clone()),
            FileSource::Disk(path) => tokio::fs::read(path).await,
        }
    }
}

/// File object returned by `POST /files`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub purpose: String,
}

/// Successful upload as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub filename: String,
    pub bytes: u64,
}

/// Per-file progress report (0 before the request, 100 on success)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub filename: String,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl UploadProgress {
    pub fn started(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            progress: 0,
            file_id: None,
        }
    }

    pub fn finished(filename: impl Into<String>, file_id: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            progress: 100,
            file_id: Some(file_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(
            LocalFile::from_bytes("Report.PDF", b"x".to_vec()).extension(),
            Some("pdf".to_string())
        );
    }

    #[test]
    fn test_extension_missing() {
        assert_eq!(LocalFile::from_bytes("README", b"x".to_vec()).extension(), None);
        assert_eq!(LocalFile::from_bytes("notes.", b"x".to_vec()).extension(), None);
    }

    #[test]
    fn test_extension_uses_last_dot() {
        let file = LocalFile::from_bytes("archive.tar.txt", b"x".to_vec());
        assert_eq!(file.extension(), Some("txt".to_string()));
    }

    #[tokio::test]
    async fn test_from_bytes_reads_back() {
        let file = LocalFile::from_bytes("a.txt", b"hello".to_vec());
        assert_eq!(file.size(), 5);
        assert_eq!(file.read().await.unwrap(), b"hello");
    }
}
