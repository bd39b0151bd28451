//! Report photos on local disk
//!
//! Files are written under a generated name and served back from
//! `UPLOADS_ROUTE` by the static file service.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::AppError;
use crate::shared::constants::UPLOADS_ROUTE;
use crate::shared::validation::FILE_EXTENSION_REGEX;

/// A photo that has been written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub file_name: String,
    /// Public URL path, e.g. `/uploads/<file_name>`
    pub url: String,
}

pub struct PhotoStorage {
    dir: PathBuf,
}

impl PhotoStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it doesn't exist
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create upload directory '{}': {}",
                self.dir.display(),
                e
            ))
        })?;

        info!("Photo uploads stored in '{}'", self.dir.display());
        Ok(())
    }

    /// Random 32-hex-char name. Only a short alphanumeric extension of the
    /// client's file name survives, lower-cased.
    pub fn generate_file_name(original_name: Option<&str>) -> String {
        let token = Uuid::new_v4().simple().to_string();

        let extension = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| FILE_EXTENSION_REGEX.is_match(ext))
            .map(str::to_lowercase);

        match extension {
            Some(ext) => format!("{}.{}", token, ext),
            None => token,
        }
    }

    pub async fn store(
        &self,
        original_name: Option<&str>,
        data: &[u8],
    ) -> Result<StoredPhoto, AppError> {
        let file_name = Self::generate_file_name(original_name);
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, data).await.map_err(|e| {
            AppError::Internal(format!("Failed to write photo '{}': {}", file_name, e))
        })?;

        debug!("Stored photo '{}' ({} bytes)", file_name, data.len());

        Ok(StoredPhoto {
            url: format!("{}/{}", UPLOADS_ROUTE, file_name),
            file_name,
        })
    }

    /// Best-effort removal, used when the report referencing the photo
    /// could not be saved
    pub async fn remove(&self, file_name: &str) {
        if let Err(e) = tokio::fs::remove_file(self.dir.join(file_name)).await {
            warn!("Failed to remove photo '{}': {}", file_name, e);
        }
    }
}
