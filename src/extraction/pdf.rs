use lopdf::Document;
use tracing::debug;

use crate::types::{AppError, AppResult};

/// Extract the text of every page, in page order.
///
/// A page whose text cannot be decoded contributes an empty string; only a
/// document that cannot be loaded at all is an error.
pub fn extract_text(bytes: &[u8]) -> AppResult<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("failed to parse PDF: {}", e)))?;

    // get_pages is keyed by page number, so iteration is already in page order
    let pages = doc.get_pages().into_keys().map(|page_num| {
        match doc.extract_text(&[page_num]) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(page = page_num, error = %e, "No extractable text on page");
                None
            }
        }
    });

    Ok(concat_pages(pages))
}

pub fn concat_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    pages.into_iter().map(Option::unwrap_or_default).collect()
}
