//! On-disk lifecycle of a beer's image.
//!
//! Images are stored under `<root>/uploads/beers/<id>/<filename>`. The
//! database only ever holds the relative part (`uploads/beers/<id>/<filename>`);
//! the absolute URL is built per request from the host the caller used, see
//! [`public_url`] and [`strip_host`].
//!
//! The per-item directories are not locked. Two concurrent attaches for the
//! same beer race on both the old-file removal and the new write; the last
//! writer's file remains.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::types::DbId;

/// Directory, relative to the upload root, holding one sub-directory per beer.
pub const BEER_UPLOAD_DIR: &str = "uploads/beers";

/// Image-store error type.
#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("Invalid image: {0}")]
    Validation(String),

    #[error("Filesystem error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImageStoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A file received from the caller.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied filename; only its last path component is used.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Result of a successful attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedImage {
    /// Path persisted in the `image` column.
    pub relative_path: String,
    /// Externally addressable URL for the host the request came in on.
    pub url: String,
}

/// Storage backend for beer images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `upload` as the image of beer `beer_id`.
    ///
    /// `current` is the image recorded for the beer so far (empty, a relative
    /// path, or a URL written with some host prefix). A non-empty `current`
    /// is removed first; if that removal fails the new file is not written.
    async fn attach(
        &self,
        beer_id: DbId,
        current: &str,
        host: &str,
        upload: ImageUpload,
    ) -> Result<AttachedImage, ImageStoreError>;
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Keep only the final component of a client-supplied filename.
pub fn sanitize_file_name(raw: &str) -> Result<String, ImageStoreError> {
    let name = raw.rsplit(&['/', '\\'][..]).next().unwrap_or("").trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(ImageStoreError::Validation(format!(
            "unusable file name '{raw}'"
        )));
    }
    Ok(name.to_string())
}

/// Directory of a beer's images, relative to the upload root.
pub fn beer_dir(beer_id: DbId) -> String {
    format!("{BEER_UPLOAD_DIR}/{beer_id}")
}

/// `<host>/<relative>`; an empty image stays empty.
pub fn public_url(host: &str, image: &str) -> String {
    if image.is_empty() || has_scheme(image) {
        return image.to_string();
    }
    format!(
        "{}/{}",
        host.trim_end_matches('/'),
        image.trim_start_matches('/')
    )
}

/// Recover the relative path from a stored image value.
///
/// Removes a leading `host` when it ends at a path boundary. A URL carrying
/// some other host (including the same name on another port) has its
/// `scheme://authority` dropped instead, so images attached through one
/// host name can still be cleaned up through another.
pub fn strip_host(host: &str, image: &str) -> String {
    let host = host.trim_end_matches('/');
    let own_prefix = image
        .strip_prefix(host)
        .filter(|rest| !host.is_empty() && (rest.is_empty() || rest.starts_with('/')));
    let stripped = if let Some(rest) = own_prefix {
        rest.to_string()
    } else if let Some((_, rest)) = image.split_once("://") {
        rest.find('/').map(|i| rest[i..].to_string()).unwrap_or_default()
    } else {
        image.to_string()
    };
    stripped.trim_start_matches('/').to_string()
}

fn has_scheme(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

// ---------------------------------------------------------------------------
// LocalImageStore
// ---------------------------------------------------------------------------

/// [`ImageStore`] writing to a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory served publicly under `/uploads`.
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    /// Resolve a stored relative path under the root.
    ///
    /// Absolute paths and `..` segments are rejected so a tampered `image`
    /// column cannot point outside the upload tree.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, ImageStoreError> {
        let path = Path::new(relative);
        let clean = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if relative.is_empty() || !clean {
            return Err(ImageStoreError::Validation(format!(
                "image path '{relative}' is outside the upload directory"
            )));
        }
        Ok(self.root.join(path))
    }

    async fn remove_previous(&self, relative: &str) -> Result<(), ImageStoreError> {
        let path = self.resolve(relative)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed previous beer image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Previous beer image already missing");
                Ok(())
            }
            Err(e) => Err(ImageStoreError::io(&path, e)),
        }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn attach(
        &self,
        beer_id: DbId,
        current: &str,
        host: &str,
        upload: ImageUpload,
    ) -> Result<AttachedImage, ImageStoreError> {
        let file_name = sanitize_file_name(&upload.file_name)?;

        if !current.is_empty() {
            let previous = strip_host(host, current);
            self.remove_previous(&previous).await?;
        }

        let dir_relative = beer_dir(beer_id);
        let dir = self.root.join(&dir_relative);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ImageStoreError::io(&dir, e))?;

        let file_path = dir.join(&file_name);
        tokio::fs::write(&file_path, &upload.bytes)
            .await
            .map_err(|e| ImageStoreError::io(&file_path, e))?;

        let relative_path = format!("{dir_relative}/{file_name}");
        tracing::debug!(beer_id, path = %relative_path, bytes = upload.bytes.len(), "Stored beer image");

        Ok(AttachedImage {
            url: public_url(host, &relative_path),
            relative_path,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
