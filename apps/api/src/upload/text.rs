use bytes::Bytes;
use tracing::{debug, warn};

use crate::upload::validation::PDF_CONTENT_TYPE;

/// Extracts plain text from an uploaded resume.
///
/// PDFs go through `pdf-extract` on the blocking pool. Word documents, and
/// PDFs that yield no text, are decoded as lossy UTF-8.
pub async fn extract_text(content_type: &str, bytes: Bytes) -> String {
    if content_type.to_ascii_lowercase().starts_with(PDF_CONTENT_TYPE) {
        let pdf = bytes.clone();
        match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf)).await
        {
            Ok(Ok(text)) if !text.trim().is_empty() => return text,
            Ok(Ok(_)) => debug!("PDF has no text layer, decoding raw bytes"),
            Ok(Err(e)) => debug!("PDF text extraction failed ({e}), decoding raw bytes"),
            // pdf-extract panics on some malformed documents
            Err(e) => warn!("PDF text extraction aborted ({e}), decoding raw bytes"),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
