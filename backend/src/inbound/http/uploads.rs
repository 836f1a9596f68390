//! Serves stored listing images.
//!
//! ```text
//! GET /uploads/{filename}
//! ```

use actix_web::{HttpResponse, get, http::header::ContentType, mime, web};

use crate::domain::{Error, StoredFileName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::immutable_upload_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

fn upload_not_found(name: &str) -> Error {
    Error::not_found(format!("upload {name} not found"))
}

fn content_type_for(name: &StoredFileName) -> ContentType {
    let extension = name
        .as_str()
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => ContentType::png(),
        Some("jpg" | "jpeg") => ContentType::jpeg(),
        Some("gif") => ContentType(mime::IMAGE_GIF),
        _ => ContentType::octet_stream(),
    }
}

/// Stream a stored image back to the caller.
#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    params(("filename" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "No such upload", body = ErrorSchema)
    ),
    tags = ["uploads"],
    operation_id = "getUpload"
)]
#[get("/uploads/{filename}")]
pub async fn get_upload(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let name = StoredFileName::parse(&raw).ok_or_else(|| upload_not_found(&raw))?;
    let bytes = state
        .images
        .read(&name)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, file = %name, "reading upload failed");
            Error::internal("failed to read upload")
        })?
        .ok_or_else(|| upload_not_found(&raw))?;
    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&name))
        .insert_header(immutable_upload_header())
        .body(bytes))
}
