//! Uploaded listing images.
//!
//! Images arrive as raw bytes with a declared content type. Only a small
//! allow-list of raster formats is accepted. Stored images are addressed by a
//! public path of the form `/uploads/<file name>`.

use std::fmt;
use std::path::Path;

use uuid::Uuid;

use super::Error;
use super::validation::{FieldName, unsupported_media_type_error};

/// Public URL prefix under which stored images are served.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Placeholder shown when a listing has no image.
pub const DEFAULT_IMAGE_PATH: &str = "/default-avatar.png";

const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Whether `content_type` is one of the accepted image formats.
///
/// Parameters such as `; charset=` are ignored and the comparison is
/// case-insensitive.
pub fn is_allowed_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_CONTENT_TYPES.contains(&essence.as_str())
}

/// Image payload taken from a multipart form.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("original_name", &self.original_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Reject images whose content type is not allow-listed.
    pub fn ensure_allowed(&self, field: FieldName) -> Result<(), Error> {
        if is_allowed_content_type(&self.content_type) {
            Ok(())
        } else {
            Err(unsupported_media_type_error(field, &self.content_type))
        }
    }
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `-`. Names that would be empty or dot-only become `image`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name.trim())
        .file_name()
        .map(|part| part.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '-',
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        "image".to_owned()
    } else {
        cleaned
    }
}

/// Name under which an image is stored in the upload directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredFileName(String);

impl StoredFileName {
    /// Generate a collision-resistant name: `<uuid>-<sanitized original>`.
    pub fn generate(original_name: &str) -> Self {
        Self(format!("{}-{}", Uuid::new_v4(), sanitize_file_name(original_name)))
    }

    /// Accept an existing name if it is a single safe path component.
    pub fn parse(raw: &str) -> Option<Self> {
        let safe = !raw.is_empty()
            && !raw.starts_with('.')
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        safe.then(|| Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public path for this file.
    pub fn public_path(&self) -> ImagePath {
        ImagePath(format!("{UPLOADS_PREFIX}{}", self.0))
    }
}

impl fmt::Display for StoredFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public path of a stored image, e.g. `/uploads/<file name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePath(String);

impl ImagePath {
    /// Wrap a persisted path without validation.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name in the upload directory, when the path points there.
    pub fn file_name(&self) -> Option<StoredFileName> {
        self.0
            .strip_prefix(UPLOADS_PREFIX)
            .and_then(StoredFileName::parse)
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ImagePath> for String {
    fn from(value: ImagePath) -> Self {
        value.0
    }
}
