//! Text Extraction
//!
//! Turns an uploaded document into plain text. The strategy is picked from
//! the declared filename's suffix:
//! - `.pdf`  - page texts concatenated in page order
//! - `.docx` - body paragraphs joined by newlines
//! - anything else - lenient UTF-8 (or rejected, depending on [`ExtensionPolicy`])

pub mod docx;
pub mod pdf;
pub mod plain;

use tracing::{debug, info};

use crate::types::{AppError, AppResult};

/// Extensions accepted under [`ExtensionPolicy::Reject`] besides pdf/docx.
const PLAIN_TEXT_EXTENSIONS: [&str; 2] = [".txt", ".md"];

/// What to do with a filename whose suffix is not a known document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtensionPolicy {
    /// Decode the bytes as UTF-8 text, whatever the extension.
    #[default]
    TreatAsText,
    /// Refuse anything that is not pdf, docx, txt or md.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Pick the extraction strategy for `filename`. Suffix matching is
    /// case-sensitive.
    pub fn from_filename(filename: &str, policy: ExtensionPolicy) -> AppResult<Self> {
        if filename.ends_with(".pdf") {
            return Ok(DocumentKind::Pdf);
        }
        if filename.ends_with(".docx") {
            return Ok(DocumentKind::Docx);
        }

        match policy {
            ExtensionPolicy::TreatAsText => Ok(DocumentKind::PlainText),
            ExtensionPolicy::Reject => {
                if PLAIN_TEXT_EXTENSIONS.iter().any(|ext| filename.ends_with(ext)) {
                    Ok(DocumentKind::PlainText)
                } else {
                    Err(AppError::UnsupportedFileType(filename.to_string()))
                }
            }
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Docx => write!(f, "docx"),
            DocumentKind::PlainText => write!(f, "plain"),
        }
    }
}

/// Extract the text of an already-classified document.
pub fn extract_kind(kind: DocumentKind, bytes: &[u8]) -> AppResult<String> {
    match kind {
        DocumentKind::Pdf => pdf::extract_text(bytes),
        DocumentKind::Docx => docx::extract_text(bytes),
        DocumentKind::PlainText => Ok(plain::decode_lossy(bytes)),
    }
}

/// Extract text from `bytes`, choosing the strategy from `filename`.
pub fn extract(bytes: &[u8], filename: &str, policy: ExtensionPolicy) -> AppResult<String> {
    let kind = DocumentKind::from_filename(filename, policy)?;
    debug!(filename, kind = %kind, bytes = bytes.len(), "Extracting text");

    let text = extract_kind(kind, bytes)?;
    info!(filename, kind = %kind, chars = text.chars().count(), "Text extracted");
    Ok(text)
}

/// Run [`extract`] on the blocking pool; PDF and DOCX parsing are CPU bound.
pub async fn extract_blocking(
    bytes: bytes::Bytes,
    filename: String,
    policy: ExtensionPolicy,
) -> AppResult<String> {
    tokio::task::spawn_blocking(move || extract(&bytes, &filename, policy))
        .await
        .map_err(|e| AppError::Internal(format!("extraction task failed: {}", e)))?
}
