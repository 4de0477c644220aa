use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Keyed media storage.
///
/// Keys are relative, `/`-separated paths under the store's root, e.g.
/// `solo-leveling/cover/cover.jpg`.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Create the directory at `key` and all missing ancestors.
    ///
    /// Creating a directory that already exists is not an error.
    async fn ensure_dir(&self, key: &str) -> Result<(), StorageError>;

    /// Copy everything from `reader` into the file at `key`, replacing any
    /// previous content. Returns the on-disk location of the file.
    async fn write_stream(&self, key: &str, reader: BoxReader) -> Result<PathBuf, StorageError>;

    /// Store bytes at `key`.
    async fn write(&self, key: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.write_stream(key, reader).await
    }

    /// Open the file at `key` as a streaming async reader.
    async fn open(&self, key: &str) -> Result<BoxReader, StorageError>;

    /// Read all bytes of the file at `key`.
    async fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.open(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Check whether a file or directory exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Recursively delete the directory at `key`.
    ///
    /// Returns `true` if the directory was deleted, `false` if it did not exist.
    async fn remove_dir_all(&self, key: &str) -> Result<bool, StorageError>;

    /// The on-disk location `key` maps to.
    fn resolve(&self, key: &str) -> PathBuf;
}
