use super::boundary::{find_sentence_boundary, Direction};
use super::matcher::Match;

/// Byte offset of the `char_index`-th char of `text`, or `text.len()` past the end
fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Char span `[left, right)` of the sentence-aligned context around `m`.
///
/// The raw window extends `margin` chars on each side of the match, clamped to
/// the text, then the left edge snaps toward the start and the right edge toward
/// the end to the nearest sentence terminator.
pub fn context_span(normalized_book: &str, m: &Match, margin: usize) -> (usize, usize) {
    let len = normalized_book.len();
    let raw_start = m.start.saturating_sub(margin).min(len);
    let raw_end = m.end.saturating_add(margin).min(len);

    let left = find_sentence_boundary(normalized_book, raw_start, Direction::TowardStart);
    let right = find_sentence_boundary(normalized_book, raw_end, Direction::TowardEnd);
    (left, right.max(left))
}

/// Extract the context for `m` from the original, non-normalized book text.
///
/// `normalized_book` must be `normalize_text(book_text)`; boundaries are located
/// on it and the resulting char span is read back from `book_text`.
pub fn extract_context(book_text: &str, normalized_book: &str, m: &Match, margin: usize) -> String {
    let (left, right) = context_span(normalized_book, m, margin);
    let start_byte = char_to_byte(book_text, left);
    let end_byte = char_to_byte(book_text, right);
    book_text[start_byte..end_byte].to_string()
}
