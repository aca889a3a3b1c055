use thiserror::Error;

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOC_CONTENT_TYPE: &str = "application/msword";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const ALLOWED_CONTENT_TYPES: &[&str] =
    &[PDF_CONTENT_TYPE, DOC_CONTENT_TYPE, DOCX_CONTENT_TYPE];

/// Largest accepted upload, inclusive (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10_485_760;

pub const INVALID_TYPE_MESSAGE: &str = "Please upload a PDF or Word document";
pub const FILE_TOO_LARGE_MESSAGE: &str = "File size must be less than 10MB";
pub const EMPTY_FILE_MESSAGE: &str = "The selected file is empty";

#[derive(Debug, Error, PartialEq)]
pub enum UploadRejection {
    #[error("{}", INVALID_TYPE_MESSAGE)]
    UnsupportedType(String),

    #[error("{}", FILE_TOO_LARGE_MESSAGE)]
    TooLarge(usize),

    #[error("{}", EMPTY_FILE_MESSAGE)]
    Empty,
}

impl From<UploadRejection> for AppError {
    fn from(rejection: UploadRejection) -> Self {
        AppError::Validation(rejection.to_string())
    }
}

/// Checks an upload before anything is stored or sent upstream.
/// The type is checked first, so a disallowed type is rejected at any size.
pub fn validate_upload(content_type: &str, size: usize) -> Result<(), UploadRejection> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&essence.as_str()) {
        return Err(UploadRejection::UnsupportedType(content_type.to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge(size));
    }
    if size == 0 {
        return Err(UploadRejection::Empty);
    }
    Ok(())
}
