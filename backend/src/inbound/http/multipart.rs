//! Multipart form reader for listing forms.
//!
//! Collects the fields named by a [`FormFields`] schema into [`FormParts`]
//! while enforcing size limits as bytes arrive. Parts outside the schema and
//! repeated names are drained without being kept, and every byte read counts
//! against a per-request total. A part counts as a file when its
//! content-disposition carries a `filename`; browsers send an empty filename
//! with no bytes when the file input was left blank, and such parts are
//! treated as absent.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt as _;
use tracing::debug;

use crate::domain::{Error, ImageUpload};

/// Size limits applied while reading a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Largest accepted file part.
    pub max_file_bytes: usize,
    /// Largest accepted text field.
    pub max_text_bytes: usize,
    /// Largest accepted request body, counting every part.
    pub max_total_bytes: usize,
}

impl UploadLimits {
    pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
    pub const DEFAULT_MAX_TEXT_BYTES: usize = 64 * 1024;
    /// Room left for text fields and part overhead on top of one file.
    pub const TEXT_ALLOWANCE_BYTES: usize = 256 * 1024;

    pub fn new(max_file_bytes: usize) -> Self {
        Self {
            max_file_bytes,
            max_text_bytes: Self::DEFAULT_MAX_TEXT_BYTES,
            max_total_bytes: max_file_bytes.saturating_add(Self::TEXT_ALLOWANCE_BYTES),
        }
    }

    #[must_use]
    pub fn with_max_total_bytes(mut self, max_total_bytes: usize) -> Self {
        self.max_total_bytes = max_total_bytes;
        self
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_FILE_BYTES)
    }
}

/// Names of the parts a form accepts.
#[derive(Debug, Clone, Copy)]
pub struct FormFields {
    pub texts: &'static [&'static str],
    pub files: &'static [&'static str],
}

impl FormFields {
    fn is_text(&self, name: &str) -> bool {
        self.texts.contains(&name)
    }

    fn is_file(&self, name: &str) -> bool {
        self.files.contains(&name)
    }
}

/// Text fields and files read from a multipart form.
#[derive(Debug, Default)]
pub struct FormParts {
    texts: HashMap<String, String>,
    files: HashMap<String, ImageUpload>,
}

impl FormParts {
    /// Take a text field. The first occurrence of a repeated name wins.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.texts.remove(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }
}

fn malformed(err: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

fn too_large(what: &str, limit: usize) -> Error {
    Error::payload_too_large(format!("{what} exceeds the {limit} byte limit"))
}

/// Bytes still allowed for the rest of the request.
struct Budget {
    limit: usize,
    remaining: usize,
}

impl Budget {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    fn spend(&mut self, len: usize) -> Result<(), Error> {
        self.remaining = self
            .remaining
            .checked_sub(len)
            .ok_or_else(|| too_large("request body", self.limit))?;
        Ok(())
    }
}

async fn read_limited(
    field: &mut Field,
    limit: usize,
    name: &str,
    budget: &mut Budget,
) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        budget.spend(chunk.len())?;
        if buf.len() + chunk.len() > limit {
            return Err(too_large(name, limit));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

async fn drain(field: &mut Field, name: &str, budget: &mut Budget) -> Result<(), Error> {
    let mut len = 0_usize;
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        budget.spend(chunk.len())?;
        len += chunk.len();
    }
    debug!(field = %name, len, "unexpected part skipped");
    Ok(())
}

/// Read the parts named by `fields` from `payload` into memory.
///
/// # Errors
///
/// `payload_too_large` when a part or the whole body exceeds its limit;
/// `invalid_request` when the body is not valid multipart or a text field is
/// not UTF-8.
pub async fn read_form(
    mut payload: Multipart,
    fields: FormFields,
    limits: UploadLimits,
) -> Result<FormParts, Error> {
    let mut parts = FormParts::default();
    let mut budget = Budget::new(limits.max_total_bytes);

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let disposition = field.content_disposition().cloned();
        let name = disposition
            .as_ref()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_owned();
        let file_name = disposition
            .as_ref()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);

        match file_name {
            Some(original_name)
                if fields.is_file(&name) && !parts.files.contains_key(&name) =>
            {
                let content_type = field
                    .content_type()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_owned());
                let bytes =
                    read_limited(&mut field, limits.max_file_bytes, &name, &mut budget).await?;
                if original_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                debug!(field = %name, len = bytes.len(), %content_type, "file part read");
                parts.files.insert(
                    name,
                    ImageUpload {
                        original_name,
                        content_type,
                        bytes,
                    },
                );
            }
            None if fields.is_text(&name) && !parts.texts.contains_key(&name) => {
                let bytes =
                    read_limited(&mut field, limits.max_text_bytes, &name, &mut budget).await?;
                let text = String::from_utf8(bytes)
                    .map_err(|_| Error::invalid_request(format!("{name} must be UTF-8 text")))?;
                parts.texts.insert(name, text);
            }
            _ => drain(&mut field, &name, &mut budget).await?,
        }
    }

    Ok(parts)
}
