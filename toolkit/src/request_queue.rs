//! Trailing-window statistics over search requests.

use std::collections::VecDeque;

use engine::{DocId, Document, DocumentStatus, SearchError, SearchServer};

/// One logical tick per request; the window spans a "day" of ticks.
const TICKS_IN_DAY: u64 = 1440;

struct QueryResult {
    tick: u64,
    is_empty: bool,
}

/// Wraps `find_top_documents` calls and counts how many requests in the
/// trailing window came back empty.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<QueryResult>,
    current_tick: u64,
    no_result_count: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self {
            server,
            requests: VecDeque::new(),
            current_tick: 0,
            no_result_count: 0,
        }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        let documents = self.server.find_top_documents(raw_query)?;
        Ok(self.record(documents))
    }

    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        let documents = self.server.find_top_documents_with_status(raw_query, status)?;
        Ok(self.record(documents))
    }

    pub fn add_find_request_with<P>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let documents = self.server.find_top_documents_with(raw_query, predicate)?;
        Ok(self.record(documents))
    }

    /// Empty-result requests within the trailing window.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_count
    }

    fn record(&mut self, documents: Vec<Document>) -> Vec<Document> {
        self.current_tick += 1;
        while let Some(front) = self.requests.front() {
            if self.current_tick - front.tick < TICKS_IN_DAY {
                break;
            }
            if front.is_empty {
                self.no_result_count -= 1;
            }
            self.requests.pop_front();
        }
        let is_empty = documents.is_empty();
        if is_empty {
            self.no_result_count += 1;
        }
        self.requests.push_back(QueryResult {
            tick: self.current_tick,
            is_empty,
        });
        documents
    }
}
