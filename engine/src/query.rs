//! Query parsing: free text into deduplicated plus/minus word sets.

use std::collections::BTreeSet;

use crate::error::SearchError;
use crate::tokenizer::{is_valid_word, split_words};

/// A parsed query. Word order is irrelevant to scoring; sets deduplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

struct QueryWord<'a> {
    word: &'a str,
    is_minus: bool,
    is_stop: bool,
}

fn parse_query_word<'a>(
    token: &'a str,
    stop_words: &BTreeSet<String>,
) -> Result<QueryWord<'a>, SearchError> {
    if token.is_empty() {
        return Err(SearchError::EmptyQueryWord);
    }
    let (word, is_minus) = match token.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (token, false),
    };
    if word.is_empty() || word.starts_with('-') || !is_valid_word(word) {
        return Err(SearchError::MalformedQueryWord(token.to_string()));
    }
    Ok(QueryWord {
        word,
        is_minus,
        is_stop: stop_words.contains(word),
    })
}

/// Parse raw query text against a stop-word set.
///
/// Stop-word tokens are dropped entirely, minus or not. Empty tokens,
/// a bare `-`, a `--` prefix, and control characters are contract errors.
pub fn parse_query(text: &str, stop_words: &BTreeSet<String>) -> Result<Query, SearchError> {
    let mut query = Query::default();
    for token in split_words(text) {
        let query_word = parse_query_word(token, stop_words)?;
        if query_word.is_stop {
            continue;
        }
        if query_word.is_minus {
            query.minus_words.insert(query_word.word.to_string());
        } else {
            query.plus_words.insert(query_word.word.to_string());
        }
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_words() -> BTreeSet<String> {
        ["and", "with"].iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn routes_plus_and_minus_words() {
        let query = parse_query("curly -dog curly", &stop_words()).unwrap();
        assert_eq!(query.plus_words.len(), 1);
        assert!(query.plus_words.contains("curly"));
        assert!(query.minus_words.contains("dog"));
    }

    #[test]
    fn drops_stop_words_entirely() {
        let query = parse_query("cat and -with dog", &stop_words()).unwrap();
        assert!(query.plus_words.contains("cat"));
        assert!(query.plus_words.contains("dog"));
        assert!(query.minus_words.is_empty());
    }

    #[test]
    fn rejects_malformed_tokens() {
        let stop = stop_words();
        assert_eq!(parse_query("cat  dog", &stop), Err(SearchError::EmptyQueryWord));
        assert_eq!(
            parse_query("cat -", &stop),
            Err(SearchError::MalformedQueryWord("-".to_string()))
        );
        assert_eq!(
            parse_query("--cat", &stop),
            Err(SearchError::MalformedQueryWord("--cat".to_string()))
        );
        assert!(matches!(
            parse_query("ca\u{2}t", &stop),
            Err(SearchError::MalformedQueryWord(_))
        ));
    }
}
