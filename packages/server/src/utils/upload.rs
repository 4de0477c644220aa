use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use common::storage::BoxReader;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;

/// A multipart file field buffered to a temp file.
///
/// Multipart fields arrive in client order, so image parts are spooled until
/// the rest of the form has been read. The temp file is removed on drop.
#[derive(Debug)]
pub struct SpooledUpload {
    path: PathBuf,
    size: u64,
}

impl SpooledUpload {
    /// Stream `field` into a temp file under `dir`, failing once it exceeds
    /// `max_size` bytes.
    pub async fn from_field(
        mut field: Field<'_>,
        dir: &Path,
        max_size: u64,
    ) -> Result<Self, AppError> {
        let mut spooled = Self {
            path: dir.join(format!("comics-upload-{}", Uuid::new_v4())),
            size: 0,
        };

        let mut temp_file = tokio::fs::File::create(&spooled.path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            spooled.size += chunk.len() as u64;
            if spooled.size > max_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File exceeds maximum size of {max_size} bytes"
                )));
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;

        Ok(spooled)
    }

    /// Number of bytes received.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Reopen the spooled bytes for reading.
    pub async fn open(&self) -> Result<BoxReader, AppError> {
        let file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;
        Ok(Box::new(file))
    }
}

impl Drop for SpooledUpload {
    fn drop(&mut self) {
        let path = std::mem::take(&mut self.path);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_temp_file(&path));
            }
            Err(_) => remove_temp_file(&path),
        }
    }
}

fn remove_temp_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove temp upload"),
    }
}
