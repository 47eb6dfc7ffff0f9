//! Asset (blob) storage for uploaded artwork videos and review screenshots.
//!
//! Blobs are written before the database row that references them. When the
//! database write fails the caller deletes the blob again through
//! [`AssetStore::delete`]; there is no background garbage collection.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine as _;
use tokio::io::AsyncWriteExt;

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::workflow::ReviewType;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Video container extensions accepted for artwork uploads.
pub const ARTWORK_VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv"];

/// Timestamp format embedded in stored file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Fallback stem when sanitising leaves nothing usable.
const FALLBACK_STEM: &str = "artwork";

/// Upper bound on suffixed retries when a stored name is already taken.
const MAX_NAME_ATTEMPTS: u32 = 100;

// ---------------------------------------------------------------------------
// Asset kinds
// ---------------------------------------------------------------------------

/// The two kinds of blob the pipeline stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    ArtworkVideo,
    Screenshot,
}

impl AssetKind {
    /// Directory (and public URL segment) holding this kind of blob.
    pub fn dir_name(self) -> &'static str {
        match self {
            AssetKind::ArtworkVideo => "uploads",
            AssetKind::Screenshot => "screenshots",
        }
    }

    /// Public path under which a stored file is served.
    pub fn public_path(self, file_name: &str) -> String {
        format!("/{}/{file_name}", self.dir_name())
    }
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Reduce an uploaded file name to a safe ASCII name.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; whitespace becomes `_`;
/// everything else is dropped. Leading dots and underscores are stripped so
/// the result can never be a hidden file or a path component like `..`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let mapped: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    mapped.trim_start_matches(['.', '_']).to_string()
}

/// Lowercased extension of a file name, if any.
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Validate an artwork upload's file name and build its stored name:
/// `{sanitised stem}_{YYYYmmdd_HHMMSS}.{ext}`.
pub fn artwork_file_name(original: &str, now: Timestamp) -> Result<String, CoreError> {
    let ext = file_extension(original)
        .filter(|ext| ARTWORK_VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Unsupported video file '{original}'. Supported formats: {}",
                ARTWORK_VIDEO_EXTENSIONS.join(", ")
            ))
        })?;

    let sanitized = sanitize_file_name(original);
    let stem = sanitized
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(FALLBACK_STEM);

    Ok(format!(
        "{stem}_{}.{ext}",
        now.format(FILE_TIMESTAMP_FORMAT)
    ))
}

/// Stored name for a review screenshot:
/// `screenshot_{project}_{type}_{YYYYmmdd_HHMMSS}.{ext}`.
pub fn screenshot_file_name(
    project_id: &str,
    review_type: ReviewType,
    image: ImageFormat,
    now: Timestamp,
) -> String {
    format!(
        "screenshot_{}_{}_{}.{}",
        sanitize_file_name(project_id),
        review_type.as_str(),
        now.format(FILE_TIMESTAMP_FORMAT),
        image.extension()
    )
}

// ---------------------------------------------------------------------------
// Screenshot payloads
// ---------------------------------------------------------------------------

/// Image formats accepted for screenshots, detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Webp => "webp",
        }
    }

    /// Detect the format from the first bytes of the payload.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
        if bytes.starts_with(PNG) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }
}

/// Decode a screenshot payload sent as base64, optionally wrapped in a
/// `data:image/...;base64,` URL, and check it is a supported image.
pub fn decode_screenshot(data: &str) -> Result<(Vec<u8>, ImageFormat), CoreError> {
    let trimmed = data.trim();
    let encoded = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or_else(|| CoreError::Validation("Malformed data URL".to_string()))?,
        None => trimmed,
    };

    if encoded.is_empty() {
        return Err(CoreError::Validation(
            "Screenshot data must not be empty".to_string(),
        ));
    }

    let bytes = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| CoreError::Validation(format!("Screenshot data is not valid base64: {e}")))?;

    let format = ImageFormat::detect(&bytes).ok_or_else(|| {
        CoreError::Validation("Unsupported screenshot format; expected PNG, JPEG or WebP".into())
    })?;

    Ok((bytes, format))
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Blob storage used by the upload paths.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `bytes` under `file_name`, returning the public path of the
    /// stored blob. If the name is taken a numbered suffix is added.
    async fn put(&self, kind: AssetKind, file_name: &str, bytes: &[u8])
        -> Result<String, CoreError>;

    /// Delete a blob by the public path returned from [`put`](Self::put).
    /// Deleting a blob that no longer exists is not an error.
    async fn delete(&self, public_path: &str) -> Result<(), CoreError>;
}

/// Stores blobs on the local filesystem under `{root}/uploads` and
/// `{root}/screenshots`.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding blobs of `kind`.
    pub fn dir(&self, kind: AssetKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Map a public path back to a file inside the store.
    fn resolve(&self, public_path: &str) -> Result<PathBuf, CoreError> {
        let trimmed = public_path.trim_start_matches('/');
        let (dir, name) = trimmed
            .split_once('/')
            .ok_or_else(|| CoreError::Validation(format!("Invalid asset path '{public_path}'")))?;

        let kind = [AssetKind::ArtworkVideo, AssetKind::Screenshot]
            .into_iter()
            .find(|k| k.dir_name() == dir)
            .ok_or_else(|| CoreError::Validation(format!("Invalid asset path '{public_path}'")))?;

        if name.is_empty() || sanitize_file_name(name) != name {
            return Err(CoreError::Validation(format!(
                "Invalid asset path '{public_path}'"
            )));
        }

        Ok(self.dir(kind).join(name))
    }
}

/// Candidate name for the `attempt`-th try: the name itself, then `stem_1.ext`, ...
fn numbered_name(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{attempt}.{ext}"),
        None => format!("{file_name}_{attempt}"),
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn put(
        &self,
        kind: AssetKind,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, CoreError> {
        let file_name = sanitize_file_name(file_name);
        if file_name.is_empty() {
            return Err(CoreError::Validation(
                "Asset file name must not be empty".to_string(),
            ));
        }

        let dir = self.dir(kind);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Storage(format!("create {}: {e}", dir.display())))?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = numbered_name(&file_name, attempt);
            let path = dir.join(&candidate);
            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(CoreError::Storage(format!("open {}: {e}", path.display())));
                }
            };

            let written = async {
                file.write_all(bytes).await?;
                file.sync_all().await
            }
            .await;

            if let Err(e) = written {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(CoreError::Storage(format!("write {}: {e}", path.display())));
            }

            tracing::debug!(path = %path.display(), size = bytes.len(), "Stored asset");
            return Ok(kind.public_path(&candidate));
        }

        Err(CoreError::Conflict(format!(
            "Could not find a free name for asset '{file_name}'"
        )))
    }

    async fn delete(&self, public_path: &str) -> Result<(), CoreError> {
        let path = self.resolve(public_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Storage(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }
}
