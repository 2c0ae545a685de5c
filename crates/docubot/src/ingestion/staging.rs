//! Staging checkpoint between extraction and chunking
//!
//! The rendered text stream is persisted before chunking and removed after a
//! successful upsert. On upsert failure the artifact is retained for manual
//! retry: stray staging files beat silently lost unvectorized content.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Durability checkpoint for extracted text
#[async_trait]
pub trait Staging: Send + Sync {
    /// Persist the rendered text for `filename`
    async fn store(&self, filename: &str, text: &str) -> Result<()>;

    /// Remove the artifact for `filename` after a successful upsert
    async fn remove(&self, filename: &str) -> Result<()>;

    /// Whether an artifact currently exists for `filename`
    async fn contains(&self, filename: &str) -> bool;
}

/// Filesystem staging: one UTF-8 `<filename>.txt` per document
pub struct FsStaging {
    dir: PathBuf,
}

impl FsStaging {
    /// Create a staging store rooted at `dir`, creating it if missing
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Config(format!("Failed to create staging dir: {}", e)))?;
        Ok(Self { dir })
    }

    fn artifact_path(&self, filename: &str) -> PathBuf {
        // Uploaded names can carry path separators; keep only the final
        // component so artifacts stay inside the staging dir.
        let safe = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.to_string());
        self.dir.join(format!("{}.txt", safe))
    }
}

#[async_trait]
impl Staging for FsStaging {
    async fn store(&self, filename: &str, text: &str) -> Result<()> {
        let path = self.artifact_path(filename);
        tokio::fs::write(&path, text).await?;
        tracing::debug!(path = %path.display(), "Staged extracted text");
        Ok(())
    }

    async fn remove(&self, filename: &str) -> Result<()> {
        let path = self.artifact_path(filename);
        tokio::fs::remove_file(&path).await?;
        tracing::debug!(path = %path.display(), "Removed staging artifact");
        Ok(())
    }

    async fn contains(&self, filename: &str) -> bool {
        self.artifact_path(filename).exists()
    }
}

/// In-memory staging for tests and fully in-memory pipelines
#[derive(Default)]
pub struct MemoryStaging {
    artifacts: Mutex<std::collections::HashMap<String, String>>,
}

impl MemoryStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a staged artifact, if present
    pub fn get(&self, filename: &str) -> Option<String> {
        self.artifacts.lock().get(filename).cloned()
    }
}

#[async_trait]
impl Staging for MemoryStaging {
    async fn store(&self, filename: &str, text: &str) -> Result<()> {
        self.artifacts
            .lock()
            .insert(filename.to_string(), text.to_string());
        Ok(())
    }

    async fn remove(&self, filename: &str) -> Result<()> {
        self.artifacts.lock().remove(filename);
        Ok(())
    }

    async fn contains(&self, filename: &str) -> bool {
        self.artifacts.lock().contains_key(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fs_staging_store_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let staging = FsStaging::new(dir.path()).unwrap();

        staging.store("report.pdf", "Page 1:\nHello\n").await.unwrap();
        assert!(staging.contains("report.pdf").await);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("report.pdf.txt")).unwrap(),
            "Page 1:\nHello\n"
        );

        staging.remove("report.pdf").await.unwrap();
        assert!(!staging.contains("report.pdf").await);
    }

    #[tokio::test]
    async fn test_fs_staging_strips_path_components() {
        let dir = tempfile::tempdir().unwrap();
        let staging = FsStaging::new(dir.path()).unwrap();

        staging.store("../escape.txt", "text").await.unwrap();
        assert!(dir.path().join("escape.txt.txt").exists());
    }

    #[test]
    fn test_memory_staging_roundtrip() {
        tokio_test::block_on(async {
            let staging = MemoryStaging::new();
            staging.store("a.txt", "content").await.unwrap();
            assert!(staging.contains("a.txt").await);
            assert_eq!(staging.get("a.txt").as_deref(), Some("content"));
            staging.remove("a.txt").await.unwrap();
            assert!(!staging.contains("a.txt").await);
        });
    }
}
