//! Whitespace tokenization and term validation.

/// Split text on single-space boundaries.
///
/// Empty segments produced by leading, trailing, or consecutive spaces
/// are preserved; callers that need non-empty terms filter them.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ')
}

/// A valid word contains no ASCII control characters.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| (c as u32) < 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_single_spaces() {
        let words: Vec<&str> = split_words("curly cat curly tail").collect();
        assert_eq!(words, vec!["curly", "cat", "curly", "tail"]);
    }

    #[test]
    fn preserves_empty_segments() {
        let words: Vec<&str> = split_words(" a  b ").collect();
        assert_eq!(words, vec!["", "a", "", "b", ""]);
    }

    #[test]
    fn rejects_control_characters() {
        assert!(is_valid_word("cat"));
        assert!(is_valid_word(""));
        assert!(is_valid_word("naïve"));
        assert!(!is_valid_word("ca\u{1}t"));
        assert!(!is_valid_word("tab\tbed"));
    }
}
