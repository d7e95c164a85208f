//! PDF text extraction via pdf-extract

use std::panic;

use pdf_extract::extract_text_from_mem;

use crate::ExtractionError;

/// Extract the raw (unnormalized) text of every page.
///
/// pdf-extract can panic on some malformed inputs; a panic is reported as
/// a corrupt document rather than unwinding into the caller.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Corrupt("empty file".to_string()));
    }

    let outcome = panic::catch_unwind(|| extract_text_from_mem(bytes));

    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(classify_error(&e.to_string())),
        Err(_) => Err(ExtractionError::Corrupt(
            "PDF parser aborted on malformed content".to_string(),
        )),
    }
}

fn classify_error(message: &str) -> ExtractionError {
    let lower = message.to_lowercase();
    if lower.contains("encrypt") || lower.contains("password") {
        ExtractionError::Encrypted
    } else {
        ExtractionError::Corrupt(message.to_string())
    }
}
