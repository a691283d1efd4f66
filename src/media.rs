// ABOUTME: Uploaded image handling: base64 data URI decoding and file storage
// ABOUTME: Stores recipe images and avatars under the media root and builds their URLs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! # Media Storage
//!
//! Images arrive inline as `data:image/<type>;base64,<payload>` strings.
//! They are decoded, written under the media root with a random file name,
//! and referenced from the database by their path relative to that root.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::constants::endpoints::MEDIA_PREFIX;
use crate::errors::{AppError, AppResult};

/// Separator between the media type and the payload
const BASE64_MARKER: &str = ";base64,";

/// Decoded `data:` URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Media type, e.g. `image/png`
    pub mime_type: String,
    /// File extension derived from the media subtype
    pub extension: String,
    /// Decoded payload
    pub bytes: Vec<u8>,
}

impl DataUri {
    /// Parse a base64 image data URI
    ///
    /// `field` names the request field in error messages.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a non-empty base64 image
    pub fn parse(value: &str, field: &str) -> AppResult<Self> {
        let invalid = |reason: &str| {
            AppError::invalid_format(format!("Invalid {field}: {reason}")).with_field(field)
        };

        let rest = value
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| invalid("expected a data URI"))?;
        let (mime_type, payload) = rest
            .split_once(BASE64_MARKER)
            .ok_or_else(|| invalid("expected base64 encoded data"))?;

        let subtype = mime_type
            .strip_prefix("image/")
            .ok_or_else(|| invalid("only images are accepted"))?;
        let extension = subtype
            .split(['+', ';'])
            .next()
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .ok_or_else(|| invalid("unknown image type"))?
            .to_ascii_lowercase();

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| invalid(&format!("bad base64 payload ({e})")))?;
        if bytes.is_empty() {
            return Err(invalid("image is empty"));
        }

        Ok(Self {
            mime_type: mime_type.to_owned(),
            extension,
            bytes,
        })
    }
}

/// Subdirectories of the media root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaDir {
    /// Recipe images
    RecipeImages,
    /// User avatars
    Avatars,
}

impl MediaDir {
    /// Path relative to the media root
    #[must_use]
    pub const fn relative_path(&self) -> &'static str {
        match self {
            Self::RecipeImages => "recipes/images",
            Self::Avatars => "users/avatars",
        }
    }
}

/// File storage rooted at the configured media directory
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    /// Create storage writing under `root` and linking from `base_url`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Media root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an image and return its relative path
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory or file cannot be written
    pub async fn save(&self, dir: MediaDir, image: &DataUri) -> AppResult<String> {
        let relative = format!(
            "{}/{}.{}",
            dir.relative_path(),
            Uuid::new_v4().simple(),
            image.extension
        );
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&target, &image.bytes)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write {relative}: {e}")))?;

        debug!(path = %relative, bytes = image.bytes.len(), "Stored media file");
        Ok(relative)
    }

    /// Remove a stored file; a missing file is not an error
    ///
    /// Failures are logged rather than returned since the database row is
    /// already gone by the time files are cleaned up.
    pub async fn delete(&self, relative: &str) {
        let Some(target) = self.resolve(relative) else {
            warn!(path = %relative, "Refusing to delete path outside the media root");
            return;
        };

        match fs::remove_file(&target).await {
            Ok(()) => debug!(path = %relative, "Deleted media file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %relative, error = %e, "Failed to delete media file"),
        }
    }

    /// Absolute URL of a stored file
    #[must_use]
    pub fn url(&self, relative: &str) -> String {
        format!("{}{MEDIA_PREFIX}/{relative}", self.base_url)
    }

    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        path.components()
            .all(|component| matches!(component, Component::Normal(_)))
            .then(|| self.root.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent GIF
    const GIF: &str = "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

    #[test]
    fn test_parse_data_uri() {
        let image = DataUri::parse(GIF, "image").unwrap();
        assert_eq!(image.mime_type, "image/gif");
        assert_eq!(image.extension, "gif");
        assert!(image.bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_parse_svg_extension() {
        let image = DataUri::parse("data:image/svg+xml;base64,PHN2Zy8+", "avatar").unwrap();
        assert_eq!(image.extension, "svg");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "hello",
            "data:image/png,plain",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png;base64,!!!",
            "data:image/png;base64,",
        ] {
            let error = DataUri::parse(bad, "avatar").unwrap_err();
            assert_eq!(error.context.field.as_deref(), Some("avatar"), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path(), "http://testserver");
        let image = DataUri::parse(GIF, "image").unwrap();

        let relative = storage.save(MediaDir::RecipeImages, &image).await.unwrap();
        assert!(relative.starts_with("recipes/images/"));
        assert!(relative.ends_with(".gif"));
        assert!(dir.path().join(&relative).exists());
        assert_eq!(
            storage.url(&relative),
            format!("http://testserver/media/{relative}")
        );

        storage.delete(&relative).await;
        assert!(!dir.path().join(&relative).exists());
        storage.delete(&relative).await;
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let storage = MediaStorage::new("/srv/media", "http://testserver");
        assert!(storage.resolve("../etc/passwd").is_none());
        assert!(storage.resolve("/etc/passwd").is_none());
        assert!(storage.resolve("users/avatars/a.png").is_some());
    }
}
