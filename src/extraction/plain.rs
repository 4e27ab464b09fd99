/// Decode `bytes` as UTF-8, dropping invalid sequences instead of replacing
/// them with U+FFFD.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
