/// Lowercases and collapses runs of whitespace into single spaces.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits into lowercase alphanumeric tokens. Apostrophes are dropped so
/// "can't" and "cant" produce the same token.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(['\'', '’'], "")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Word-boundary aware phrase search on already-normalized text.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    find_phrase(haystack, phrase).is_some()
}

/// Byte offset of the first word-bounded occurrence of `phrase`.
pub fn find_phrase(haystack: &str, phrase: &str) -> Option<usize> {
    phrase_offsets(haystack, phrase).into_iter().next()
}

/// Byte offsets of every word-bounded occurrence of `phrase`, in order.
pub fn phrase_offsets(haystack: &str, phrase: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    if phrase.is_empty() {
        return offsets;
    }
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(phrase) {
        let start = from + pos;
        let end = start + phrase.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            offsets.push(start);
        }
        from = start + phrase.chars().next().map_or(1, char::len_utf8);
    }
    offsets
}

/// Returns the phrases from `phrases` that occur in `haystack`.
pub fn matched<'a>(haystack: &str, phrases: &[&'a str]) -> Vec<&'a str> {
    phrases
        .iter()
        .copied()
        .filter(|p| contains_phrase(haystack, p))
        .collect()
}

pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The last `max` characters of `text`.
pub fn tail_chars(text: &str, max: usize) -> &str {
    let skip = text.chars().count().saturating_sub(max);
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Bad\tHEADACHE \n today "), "bad headache today");
    }

    #[test]
    fn test_tokenize_drops_punctuation_and_apostrophes() {
        assert_eq!(tokenize("I can't breathe, help!"), vec!["i", "cant", "breathe", "help"]);
    }

    #[test]
    fn test_contains_phrase_respects_word_boundaries() {
        assert!(contains_phrase("i have a headache", "headache"));
        assert!(!contains_phrase("the fevers broke", "fever"));
        assert!(contains_phrase("fever, cough", "fever"));
        assert!(contains_phrase("chest pain again", "chest pain"));
        assert!(!contains_phrase("rash", ""));
    }

    #[test]
    fn test_contains_phrase_skips_embedded_hits_then_finds_later_one() {
        assert!(contains_phrase("coughing and a cough", "cough"));
    }

    #[test]
    fn test_phrase_offsets_lists_every_bounded_hit() {
        let text = "stiff neck and a stiffneck then stiff neck";
        assert_eq!(phrase_offsets(text, "stiff neck"), vec![0, 32]);
        assert!(phrase_offsets(text, "").is_empty());
    }

    #[test]
    fn test_truncate_chars_is_utf8_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[test]
    fn test_tail_chars_keeps_the_end() {
        assert_eq!(tail_chars("héllo", 3), "llo");
        assert_eq!(tail_chars("hi", 10), "hi");
    }
}
