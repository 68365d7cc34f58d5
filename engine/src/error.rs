//! Error types for the search engine.

use crate::document::DocId;
use thiserror::Error;

/// Errors surfaced by the engine's public operations.
///
/// Everything except `DocumentNotFound` is a caller contract violation;
/// mutating operations fail before touching any index structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Document id is negative
    #[error("invalid document id {0}")]
    InvalidDocumentId(DocId),
    /// Document id is already indexed
    #[error("document id {0} is already indexed")]
    DuplicateDocumentId(DocId),
    /// A word in document text or the stop-word list contains a control character
    #[error("word {0:?} contains a control character")]
    InvalidWord(String),
    /// A query token is empty (consecutive separators in the query)
    #[error("query word is empty")]
    EmptyQueryWord,
    /// A query token is a bare `-`, starts with `--`, or contains a control character
    #[error("query word {0:?} is malformed")]
    MalformedQueryWord(String),
    /// Match or removal referenced an id absent from the index
    #[error("unknown document id {0}")]
    DocumentNotFound(DocId),
}
