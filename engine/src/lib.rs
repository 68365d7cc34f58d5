//! In-process TF-IDF full-text search engine.
//!
//! Documents are short whitespace-delimited texts indexed under
//! caller-assigned ids. Queries are free text with plus/minus term
//! semantics: plus words score documents by tf-idf, minus words exclude
//! them outright. Lookups, matching, and removal all come in a
//! sequential flavor and a rayon-parallel `par_` flavor with identical
//! output ordering.

pub mod concurrent_map;
pub mod document;
pub mod error;
pub mod query;
pub mod server;
pub mod tokenizer;

pub use concurrent_map::ConcurrentMap;
pub use document::{DocId, Document, DocumentStatus};
pub use error::SearchError;
pub use server::{SearchServer, MAX_RESULT_DOCUMENT_COUNT};
