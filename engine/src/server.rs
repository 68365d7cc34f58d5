//! The search server: index store, scorer/ranker, and lifecycle ops.

use lazy_static::lazy_static;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::concurrent_map::ConcurrentMap;
use crate::document::{DocId, Document, DocumentStatus};
use crate::error::SearchError;
use crate::query::{parse_query, Query};
use crate::tokenizer::{is_valid_word, split_words};

/// Ranked result lists are capped at this many documents.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevance differences below this are ties, broken by rating.
const RELEVANCE_EPSILON: f64 = 1e-6;

/// Stripe count for the parallel scoring accumulator.
const RELEVANCE_BUCKET_COUNT: usize = 8;

lazy_static! {
    static ref EMPTY_WORD_FREQS: BTreeMap<String, f64> = BTreeMap::new();
}

struct DocumentData {
    rating: i32,
    status: DocumentStatus,
}

/// An in-memory TF-IDF index over whitespace-tokenized documents.
///
/// Mutation takes `&mut self`, so a writer is always exclusive; the
/// read paths (`find_*`, `match_*`, `word_frequencies`) take `&self` and
/// may be called from many threads at once. The `par_` variants fan
/// their term-level work out over the rayon pool and produce output
/// identical to their sequential counterparts.
pub struct SearchServer {
    stop_words: BTreeSet<String>,
    word_to_document_freqs: HashMap<String, BTreeMap<DocId, f64>>,
    document_to_word_freqs: HashMap<DocId, BTreeMap<String, f64>>,
    documents: HashMap<DocId, DocumentData>,
    document_ids: BTreeSet<DocId>,
}

impl SearchServer {
    /// Build a server from an explicit stop-word collection.
    ///
    /// Empty entries are ignored; a stop-word containing control
    /// characters fails with [`SearchError::InvalidWord`].
    pub fn new<I, S>(stop_words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique = BTreeSet::new();
        for word in stop_words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            unique.insert(word.to_string());
        }
        Ok(Self {
            stop_words: unique,
            word_to_document_freqs: HashMap::new(),
            document_to_word_freqs: HashMap::new(),
            documents: HashMap::new(),
            document_ids: BTreeSet::new(),
        })
    }

    /// Build a server from free stop-word text, split on spaces.
    pub fn from_stop_words_text(text: &str) -> Result<Self, SearchError> {
        Self::new(split_words(text))
    }

    /// Index a document under a caller-assigned id.
    ///
    /// Fails on a negative or duplicate id and on any word containing a
    /// control character; nothing is written on failure. Stop-words and
    /// empty segments are excluded from both the postings and the
    /// frequency denominator.
    pub fn add_document(
        &mut self,
        document_id: DocId,
        document: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<(), SearchError> {
        if document_id < 0 {
            return Err(SearchError::InvalidDocumentId(document_id));
        }
        if self.documents.contains_key(&document_id) {
            return Err(SearchError::DuplicateDocumentId(document_id));
        }
        let words = self.split_into_words_no_stop(document)?;

        let inv_word_count = 1.0 / words.len() as f64;
        let word_freqs = self.document_to_word_freqs.entry(document_id).or_default();
        for &word in &words {
            *word_freqs.entry(word.to_string()).or_insert(0.0) += inv_word_count;
        }
        for &word in &words {
            *self
                .word_to_document_freqs
                .entry(word.to_string())
                .or_default()
                .entry(document_id)
                .or_insert(0.0) += inv_word_count;
        }
        self.documents.insert(
            document_id,
            DocumentData {
                rating: compute_average_rating(ratings),
                status,
            },
        );
        self.document_ids.insert(document_id);
        tracing::debug!(document_id, words = words.len(), "indexed document");
        Ok(())
    }

    /// Drop a document from every index structure.
    ///
    /// Fails with [`SearchError::DocumentNotFound`] for an unknown id;
    /// callers that want opportunistic removal check membership first.
    pub fn remove_document(&mut self, document_id: DocId) -> Result<(), SearchError> {
        let words = self
            .document_to_word_freqs
            .remove(&document_id)
            .ok_or(SearchError::DocumentNotFound(document_id))?;
        for word in words.keys() {
            if let Some(postings) = self.word_to_document_freqs.get_mut(word) {
                postings.remove(&document_id);
                if postings.is_empty() {
                    self.word_to_document_freqs.remove(word);
                }
            }
        }
        self.documents.remove(&document_id);
        self.document_ids.remove(&document_id);
        tracing::debug!(document_id, "removed document");
        Ok(())
    }

    /// [`SearchServer::remove_document`] with the inverted-index cleanup
    /// fanned out over the rayon pool.
    pub fn par_remove_document(&mut self, document_id: DocId) -> Result<(), SearchError> {
        let words = self
            .document_to_word_freqs
            .remove(&document_id)
            .ok_or(SearchError::DocumentNotFound(document_id))?;
        self.word_to_document_freqs
            .par_iter_mut()
            .for_each(|(word, postings)| {
                if words.contains_key(word.as_str()) {
                    postings.remove(&document_id);
                }
            });
        self.word_to_document_freqs
            .retain(|_, postings| !postings.is_empty());
        self.documents.remove(&document_id);
        self.document_ids.remove(&document_id);
        tracing::debug!(document_id, "removed document");
        Ok(())
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.document_ids.iter().copied()
    }

    /// Term frequencies of one document; an empty map for unknown ids.
    pub fn word_frequencies(&self, document_id: DocId) -> &BTreeMap<String, f64> {
        self.document_to_word_freqs
            .get(&document_id)
            .unwrap_or(&EMPTY_WORD_FREQS)
    }

    /// Top documents for a query, keeping only `Actual` documents.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_with_status(raw_query, DocumentStatus::Actual)
    }

    /// Top documents for a query, keeping only documents with `status`.
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_with(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Top documents for a query under a caller-supplied predicate.
    ///
    /// Results are sorted by relevance descending; relevances within
    /// 1e-6 of each other tie and are broken by rating descending. At
    /// most [`MAX_RESULT_DOCUMENT_COUNT`] documents are returned.
    pub fn find_top_documents_with<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents(&query, predicate);
        sort_and_truncate(&mut matched);
        Ok(matched)
    }

    /// Parallel [`SearchServer::find_top_documents`].
    pub fn par_find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        self.par_find_top_documents_with_status(raw_query, DocumentStatus::Actual)
    }

    /// Parallel [`SearchServer::find_top_documents_with_status`].
    pub fn par_find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        self.par_find_top_documents_with(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Parallel [`SearchServer::find_top_documents_with`]. Ordering is
    /// identical to the sequential path for the same index and query.
    pub fn par_find_top_documents_with<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let mut matched = self.par_find_all_documents(&query, predicate);
        sort_and_truncate(&mut matched);
        Ok(matched)
    }

    /// Which of the query's plus-words occur in a document.
    ///
    /// Fails for an unknown id. A minus-word occurring in the document
    /// forces an empty word list; the status is returned either way.
    pub fn match_document(
        &self,
        raw_query: &str,
        document_id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus), SearchError> {
        let data = self
            .documents
            .get(&document_id)
            .ok_or(SearchError::DocumentNotFound(document_id))?;
        let query = parse_query(raw_query, &self.stop_words)?;

        let mut matched_words = Vec::new();
        for word in &query.plus_words {
            if self.word_has_document(word, document_id) {
                matched_words.push(word.clone());
            }
        }
        for word in &query.minus_words {
            if self.word_has_document(word, document_id) {
                matched_words.clear();
                break;
            }
        }
        Ok((matched_words, data.status))
    }

    /// Parallel [`SearchServer::match_document`].
    pub fn par_match_document(
        &self,
        raw_query: &str,
        document_id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus), SearchError> {
        let data = self
            .documents
            .get(&document_id)
            .ok_or(SearchError::DocumentNotFound(document_id))?;
        let query = parse_query(raw_query, &self.stop_words)?;

        let excluded = query
            .minus_words
            .par_iter()
            .any(|word| self.word_has_document(word, document_id));
        if excluded {
            return Ok((Vec::new(), data.status));
        }
        let mut matched_words: Vec<String> = query
            .plus_words
            .par_iter()
            .filter(|word| self.word_has_document(word.as_str(), document_id))
            .cloned()
            .collect();
        matched_words.sort_unstable();
        Ok((matched_words, data.status))
    }

    fn word_has_document(&self, word: &str, document_id: DocId) -> bool {
        self.word_to_document_freqs
            .get(word)
            .map_or(false, |postings| postings.contains_key(&document_id))
    }

    fn split_into_words_no_stop<'a>(&self, text: &'a str) -> Result<Vec<&'a str>, SearchError> {
        let mut words = Vec::new();
        for word in split_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            if word.is_empty() || self.stop_words.contains(word) {
                continue;
            }
            words.push(word);
        }
        Ok(words)
    }

    fn inverse_document_freq(&self, postings: &BTreeMap<DocId, f64>) -> f64 {
        (self.document_count() as f64 / postings.len() as f64).ln()
    }

    fn find_all_documents<P>(&self, query: &Query, predicate: P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut document_to_relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.word_to_document_freqs.get(word) else {
                continue;
            };
            let inverse_document_freq = self.inverse_document_freq(postings);
            for (&document_id, &term_freq) in postings {
                if let Some(data) = self.documents.get(&document_id) {
                    if predicate(document_id, data.status, data.rating) {
                        *document_to_relevance.entry(document_id).or_insert(0.0) +=
                            term_freq * inverse_document_freq;
                    }
                }
            }
        }
        for word in &query.minus_words {
            if let Some(postings) = self.word_to_document_freqs.get(word) {
                for document_id in postings.keys() {
                    document_to_relevance.remove(document_id);
                }
            }
        }
        self.collect_matches(document_to_relevance)
    }

    fn par_find_all_documents<P>(&self, query: &Query, predicate: P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let document_to_relevance: ConcurrentMap<f64> =
            ConcurrentMap::new(RELEVANCE_BUCKET_COUNT);
        // Plus-words stay sequential: each document's relevance then sums
        // in sorted word order, exactly as the sequential path does, so
        // the two paths agree bit-for-bit despite float non-associativity.
        for word in &query.plus_words {
            let Some(postings) = self.word_to_document_freqs.get(word) else {
                continue;
            };
            let inverse_document_freq = self.inverse_document_freq(postings);
            postings.par_iter().for_each(|(&document_id, &term_freq)| {
                if let Some(data) = self.documents.get(&document_id) {
                    if predicate(document_id, data.status, data.rating) {
                        *document_to_relevance.access(document_id) +=
                            term_freq * inverse_document_freq;
                    }
                }
            });
        }
        for word in &query.minus_words {
            if let Some(postings) = self.word_to_document_freqs.get(word) {
                postings.par_iter().for_each(|(&document_id, _)| {
                    document_to_relevance.erase(document_id);
                });
            }
        }
        self.collect_matches(document_to_relevance.build_snapshot())
    }

    fn collect_matches(&self, document_to_relevance: BTreeMap<DocId, f64>) -> Vec<Document> {
        document_to_relevance
            .into_iter()
            .filter_map(|(document_id, relevance)| {
                self.documents.get(&document_id).map(|data| Document {
                    id: document_id,
                    relevance,
                    rating: data.rating,
                })
            })
            .collect()
    }
}

fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i32 = ratings.iter().sum();
    sum / ratings.len() as i32
}

/// Relevance descending, rating descending within a 1e-6 relevance tie.
/// The sort is stable, so full ties keep ascending-id order from the
/// accumulator.
fn sort_and_truncate(documents: &mut Vec<Document>) {
    documents.sort_by(|lhs, rhs| {
        if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
            rhs.rating.cmp(&lhs.rating)
        } else {
            rhs.relevance
                .partial_cmp(&lhs.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    });
    documents.truncate(MAX_RESULT_DOCUMENT_COUNT);
}
