//! Word-bounded phrase search over lower-cased command text.

/// Byte offset of the first occurrence of `phrase` in `text` that starts
/// and ends on word boundaries.
pub(crate) fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = text[from..].find(phrase) {
        let start = from + pos;
        let end = start + phrase.len();
        let before_ok = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = text[end..].chars().next().is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(start);
        }
        from = start + text[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

pub(crate) fn contains_phrase(text: &str, phrase: &str) -> bool {
    find_phrase(text, phrase).is_some()
}

/// Byte offset just past the last word-bounded occurrence of `phrase`
/// that ends at or before `limit`.
pub(crate) fn last_phrase_end_before(text: &str, phrase: &str, limit: usize) -> Option<usize> {
    let mut from = 0;
    let mut last = None;
    while from <= limit {
        let Some(start) = find_phrase(&text[from..], phrase).map(|p| from + p) else {
            break;
        };
        let end = start + phrase.len();
        if end > limit {
            break;
        }
        last = Some(end);
        from = end;
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_phrase_word_bounded() {
        assert_eq!(find_phrase("go to next page", "next"), Some(6));
        assert_eq!(find_phrase("context menu", "next"), None);
        assert_eq!(find_phrase("nextdoor next", "next"), Some(9));
        assert_eq!(find_phrase("discover shoes", "over"), None);
        assert_eq!(find_phrase("search for red shoes", "search for"), Some(0));
    }

    #[test]
    fn test_find_phrase_punctuation_boundary() {
        assert_eq!(find_phrase("next, please", "next"), Some(0));
        assert_eq!(find_phrase("under $100", "under"), Some(0));
    }

    #[test]
    fn test_last_phrase_end_before() {
        let text = "under 50 or under 100";
        assert_eq!(last_phrase_end_before(text, "under", 9), Some(5));
        assert_eq!(last_phrase_end_before(text, "under", text.len()), Some(17));
        assert_eq!(last_phrase_end_before(text, "over", text.len()), None);
    }
}
