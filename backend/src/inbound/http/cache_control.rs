//! Shared cache-control policies for HTTP handlers.

/// Stored uploads never change under a given name.
pub const PUBLIC_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the cache-control header tuple for served uploads.
pub const fn immutable_upload_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_IMMUTABLE)
}
