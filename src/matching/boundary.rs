/// Chars that terminate a sentence
pub const SENTENCE_TERMINATORS: &[u8] = b".!?";

/// Scan direction for [`find_sentence_boundary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TowardStart,
    TowardEnd,
}

/// Find the nearest sentence boundary from `index` (inclusive) in the given direction.
///
/// `text` is normalized (ASCII) text, so byte positions equal char positions.
/// Scanning toward the end returns the position just after the terminator, or
/// `text.len()` when none is found. Scanning toward the start returns the
/// position of the terminator itself, or `0` when none is found. The returned
/// pair of edges therefore forms a half-open `[left, right)` span.
pub fn find_sentence_boundary(text: &str, index: usize, direction: Direction) -> usize {
    let bytes = text.as_bytes();
    match direction {
        Direction::TowardEnd => bytes
            .iter()
            .enumerate()
            .skip(index)
            .find(|(_, b)| SENTENCE_TERMINATORS.contains(*b))
            .map(|(pos, _)| pos + 1)
            .unwrap_or(bytes.len()),
        Direction::TowardStart => {
            if bytes.is_empty() {
                return 0;
            }
            let start = index.min(bytes.len() - 1);
            bytes[..=start]
                .iter()
                .rposition(|b| SENTENCE_TERMINATORS.contains(b))
                .unwrap_or(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "hello world. this is a test. bye.";

    #[test]
    fn test_toward_end_returns_position_after_terminator() {
        // "hello world." ends at index 11
        assert_eq!(find_sentence_boundary(TEXT, 0, Direction::TowardEnd), 12);
        assert_eq!(find_sentence_boundary(TEXT, 11, Direction::TowardEnd), 12);
        assert_eq!(find_sentence_boundary(TEXT, 15, Direction::TowardEnd), 28);
    }

    #[test]
    fn test_toward_start_returns_terminator_position() {
        assert_eq!(find_sentence_boundary(TEXT, 20, Direction::TowardStart), 11);
        assert_eq!(find_sentence_boundary(TEXT, 11, Direction::TowardStart), 11);
        assert_eq!(find_sentence_boundary(TEXT, 30, Direction::TowardStart), 27);
    }

    #[test]
    fn test_runs_off_either_end() {
        let text = "no terminators here";
        assert_eq!(find_sentence_boundary(text, 3, Direction::TowardEnd), text.len());
        assert_eq!(find_sentence_boundary(text, 10, Direction::TowardStart), 0);
    }

    #[test]
    fn test_index_past_end_is_clamped() {
        assert_eq!(find_sentence_boundary(TEXT, TEXT.len(), Direction::TowardEnd), TEXT.len());
        assert_eq!(find_sentence_boundary(TEXT, TEXT.len() + 50, Direction::TowardEnd), TEXT.len());
        assert_eq!(find_sentence_boundary(TEXT, TEXT.len(), Direction::TowardStart), TEXT.len() - 1);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(find_sentence_boundary("", 0, Direction::TowardEnd), 0);
        assert_eq!(find_sentence_boundary("", 0, Direction::TowardStart), 0);
    }

    #[test]
    fn test_all_terminators_recognized() {
        assert_eq!(find_sentence_boundary("wait! what? yes.", 0, Direction::TowardEnd), 5);
        assert_eq!(find_sentence_boundary("wait! what? yes.", 6, Direction::TowardEnd), 11);
        assert_eq!(find_sentence_boundary("wait! what? yes.", 14, Direction::TowardStart), 10);
    }
}
