use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::traits::{BoxReader, MediaStore};

const TEMP_DIR: &str = ".tmp";

/// Filesystem-backed media store rooted at a single directory.
///
/// Writes land in `{base_path}/.tmp` first and are renamed into place, so a
/// failed copy never leaves a truncated file at the target key.
pub struct FilesystemMediaStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemMediaStore {
    /// Create a new filesystem media store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(TEMP_DIR)).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Validate `key` and compute its filesystem path.
    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(TEMP_DIR)
            .join(uuid::Uuid::new_v4().to_string())
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = |reason| {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    };

    if key.is_empty() {
        return invalid("key is empty");
    }
    if key.contains('\0') || key.contains('\\') {
        return invalid("key contains a forbidden character");
    }
    if key.starts_with('/') {
        return invalid("key must be relative");
    }
    for segment in key.split('/') {
        if segment.is_empty() {
            return invalid("key contains an empty segment");
        }
        if segment.starts_with('.') {
            return invalid("key segments must not start with '.'");
        }
    }
    Ok(())
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn ensure_dir(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&path).await?;
        Ok(())
    }

    async fn write_stream(
        &self,
        key: &str,
        mut reader: BoxReader,
    ) -> Result<PathBuf, StorageError> {
        let target = self.key_path(key)?;
        let temp_path = self.temp_path();
        let mut total_bytes: u64 = 0;

        let mut buf = vec![0u8; 64 * 1024]; // 64KB read buffer
        let mut temp_file = fs::File::create(&temp_path).await?;

        let copied: Result<(), StorageError> = async {
            loop {
                let n = reader.read(&mut buf).await?;
                if n == 0 {
                    break;
                }

                total_bytes += n as u64;
                if total_bytes > self.max_size {
                    return Err(StorageError::SizeLimitExceeded {
                        actual: total_bytes,
                        limit: self.max_size,
                    });
                }

                temp_file.write_all(&buf[..n]).await?;
            }
            temp_file.flush().await?;
            Ok(())
        }
        .await;
        drop(temp_file);

        if let Err(e) = copied {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &target).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(key, bytes = total_bytes, "Stored media file");
        Ok(target)
    }

    async fn open(&self, key: &str) -> Result<BoxReader, StorageError> {
        let path = self.key_path(key)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.key_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn remove_dir_all(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.key_path(key)?;
        match fs::remove_dir_all(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}
