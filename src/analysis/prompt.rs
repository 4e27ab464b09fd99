/// Characters of document text forwarded to the model.
pub const MAX_EXCERPT_CHARS: usize = 4000;

/// First [`MAX_EXCERPT_CHARS`] characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(MAX_EXCERPT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn build_analysis_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following document text and provide:
1. A brief summary (2-3 sentences)
2. Key clauses or important points (list 3-5 items)
3. Potential risks or concerns (list 2-4 items)
4. Recommended next steps (list 2-4 items)

Document text:
{}

Please provide a clear, structured analysis."#,
        excerpt(text)
    )
}
