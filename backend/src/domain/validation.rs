//! Field validation helpers shared by the listing and comment services.
//!
//! Every helper returns an [`Error`] with [`ErrorCode::InvalidRequest`] and a
//! `details` object of the form `{field, code, value?}` so clients can point
//! at the offending input.
//!
//! [`ErrorCode::InvalidRequest`]: super::ErrorCode::InvalidRequest

use serde_json::json;
use uuid::Uuid;

use super::Error;

/// Machine-readable reason attached to a field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorCode {
    MissingField,
    InvalidUuid,
    InvalidPrice,
    UnsupportedMediaType,
}

impl FieldErrorCode {
    /// Wire representation used in error details.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidPrice => "invalid_price",
            Self::UnsupportedMediaType => "unsupported_media_type",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldName(&'static str);

impl FieldName {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: FieldErrorCode, message: String, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "code": code.as_str(), "value": value }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

/// One or more required fields were absent or blank.
///
/// A single field yields `{field, code}`; several yield `{fields, code}`.
pub fn missing_fields_error(fields: &[FieldName]) -> Error {
    if let [single] = fields {
        let name = single.as_str();
        return field_error(
            *single,
            FieldErrorCode::MissingField,
            format!("missing required field: {name}"),
            None,
        );
    }
    let names: Vec<&str> = fields.iter().map(|field| field.as_str()).collect();
    Error::invalid_request(format!("missing required fields: {}", names.join(", ")))
        .with_details(json!({
            "fields": names,
            "code": FieldErrorCode::MissingField.as_str(),
        }))
}

pub fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    field_error(
        field,
        FieldErrorCode::InvalidUuid,
        format!("{name} must be a valid UUID"),
        Some(value),
    )
}

pub fn invalid_price_error(value: &str) -> Error {
    field_error(
        FieldName::new("price"),
        FieldErrorCode::InvalidPrice,
        "please provide a valid price greater than zero".to_owned(),
        Some(value),
    )
}

pub fn unsupported_media_type_error(field: FieldName, content_type: &str) -> Error {
    field_error(
        field,
        FieldErrorCode::UnsupportedMediaType,
        "only JPEG, PNG and GIF images are allowed".to_owned(),
        Some(content_type),
    )
}

/// Parse a UUID, reporting the field name on failure.
pub fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

/// Return the trimmed value when it is present and non-blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}
