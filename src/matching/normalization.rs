// Comparison alphabet shared by quotes and book texts.
// Output is only ever used for distance scoring, never written back to storage.

/// Punctuation that survives normalization alongside ASCII letters, digits and space
pub const ALLOWED_PUNCTUATION: &[char] = &[',', '.', '?', '!', ';', ':', '\'', '"', '-'];

/// Map a single char into the comparison alphabet
#[inline]
fn normalize_char(ch: char) -> char {
    if ch.is_ascii_alphanumeric() || ch == ' ' || ALLOWED_PUNCTUATION.contains(&ch) {
        ch.to_ascii_lowercase()
    } else {
        ' '
    }
}

/// Lower-case ASCII letters and replace every char outside the allowed set with a space.
///
/// The result has exactly one ASCII char per input char, so char offsets into the
/// normalized text are valid char offsets into the original.
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_text_into(text, &mut result);
    result
}

/// Normalize into supplied buffer to avoid allocation
pub fn normalize_text_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());
    buffer.extend(text.chars().map(normalize_char));
}
