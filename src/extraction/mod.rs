//! Text extraction for uploaded documents.
//!
//! Supports plain text (`.txt`) and PDF (`.pdf`) uploads. Any other suffix
//! yields an empty string rather than an error, so unsupported files still
//! flow through the triage pipeline with no extracted text.

use lopdf::Document;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Extract the textual content of an uploaded file.
///
/// Suffix matching is literal and case-sensitive (`.TXT` is not `.txt`).
/// Only a UTF-8 decode failure on a `.txt` file is an error; a PDF that
/// cannot be parsed degrades to an empty string.
pub fn extract_text(filename: &str, content: &[u8]) -> Result<String, ExtractionError> {
    if filename.ends_with(".txt") {
        return Ok(String::from_utf8(content.to_vec())?);
    }

    if filename.ends_with(".pdf") {
        return Ok(extract_pdf_text(content));
    }

    Ok(String::new())
}

/// Concatenate the extracted text of every page, in page order.
///
/// A page whose extraction fails or yields nothing contributes an empty
/// segment.
fn extract_pdf_text(content: &[u8]) -> String {
    let doc = match Document::load_mem(content) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "Failed to parse PDF, returning empty text");
            return String::new();
        }
    };

    let mut text = String::new();
    for (page_number, _) in doc.get_pages() {
        match doc.extract_text(&[page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                warn!(page = page_number, error = %e, "Skipping unextractable PDF page");
            }
        }
    }
    text
}
