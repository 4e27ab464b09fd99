// Local upload staging
//
// Uploaded files are written under the upload directory keyed by the
// client-supplied filename. Files are never removed, and two uploads with
// the same name overwrite each other.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::types::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> AppResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Where `filename` is staged. Only the last path component is kept.
    pub fn path_for(&self, filename: &str) -> AppResult<PathBuf> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| AppError::InvalidRequest(format!("invalid filename: {:?}", filename)))?;
        Ok(self.root.join(name))
    }

    pub async fn save(&self, filename: &str, data: &[u8]) -> AppResult<PathBuf> {
        let path = self.path_for(filename)?;
        self.ensure_dir().await?;
        fs::write(&path, data).await?;
        debug!(path = %path.display(), bytes = data.len(), "Upload staged");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_writes_under_root() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());

        let path = store.save("contract.txt", b"terms").await.unwrap();

        assert_eq!(path, temp_dir.path().join("contract.txt"));
        assert_eq!(fs::read(&path).await.unwrap(), b"terms");
    }

    #[tokio::test]
    async fn test_same_name_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());

        store.save("memo.txt", b"first").await.unwrap();
        let path = store.save("memo.txt", b"second").await.unwrap();

        assert_eq!(fs::read(&path).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path().join("nested").join("uploads"));

        store.save("a.txt", b"x").await.unwrap();
        assert!(store.root().is_dir());
    }

    #[test]
    fn test_directory_components_are_dropped() {
        let store = UploadStore::new("/srv/uploads");

        assert_eq!(
            store.path_for("../../etc/passwd").unwrap(),
            PathBuf::from("/srv/uploads/passwd")
        );
        assert!(store.path_for("..").is_err());
        assert!(store.path_for("").is_err());
    }
}
