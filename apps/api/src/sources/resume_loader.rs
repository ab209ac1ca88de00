//! Resume text extraction. `.pdf` files go through `pdf-extract`; anything else
//! is read as UTF-8 text.

use std::panic;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResumeLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Resume is not valid UTF-8 text")]
    NotUtf8,
}

fn is_pdf(name: &Path) -> bool {
    name.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn extract_pdf<F>(extract: F) -> Result<String, ResumeLoadError>
where
    F: FnOnce() -> Result<String, pdf_extract::OutputError> + panic::UnwindSafe,
{
    // pdf-extract panics on some malformed files.
    match panic::catch_unwind(extract) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ResumeLoadError::Pdf(e.to_string())),
        Err(_) => Err(ResumeLoadError::Pdf("malformed PDF".to_string())),
    }
}

/// Extracts the resume text at `path`.
pub fn try_load(path: &Path) -> Result<String, ResumeLoadError> {
    let text = if is_pdf(path) {
        if !path.exists() {
            return Err(ResumeLoadError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )));
        }
        extract_pdf(|| pdf_extract::extract_text(path))?
    } else {
        std::fs::read_to_string(path)?
    };
    debug!(path = %path.display(), chars = text.len(), "Loaded resume");
    Ok(text)
}

/// Extracts text from an uploaded resume; the file name picks the format.
pub fn load_bytes(file_name: &str, bytes: &[u8]) -> Result<String, ResumeLoadError> {
    if is_pdf(Path::new(file_name)) {
        extract_pdf(|| pdf_extract::extract_text_from_mem(bytes))
    } else {
        String::from_utf8(bytes.to_vec()).map_err(|_| ResumeLoadError::NotUtf8)
    }
}
