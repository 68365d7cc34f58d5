//! Batch query fan-out.

use rayon::prelude::*;

use engine::{Document, SearchError, SearchServer};

/// Run every query through `find_top_documents`, one rayon worker per
/// query, returning one ranked list per query in input order.
pub fn process_queries(
    server: &SearchServer,
    queries: &[String],
) -> Result<Vec<Vec<Document>>, SearchError> {
    queries
        .par_iter()
        .map(|query| server.find_top_documents(query))
        .collect()
}

/// Like [`process_queries`], but concatenated into one flat list, still
/// in query order.
pub fn process_queries_joined(
    server: &SearchServer,
    queries: &[String],
) -> Result<Vec<Document>, SearchError> {
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::DocumentStatus;

    fn server() -> SearchServer {
        let mut server = SearchServer::new(["and", "with"]).unwrap();
        let texts = [
            "funny pet and nasty rat",
            "funny pet with curly hair",
            "funny pet and not very nasty rat",
            "pet with rat and rat and rat",
            "nasty rat with curly hair",
        ];
        for (i, text) in texts.iter().enumerate() {
            server
                .add_document(i as i32 + 1, text, DocumentStatus::Actual, &[1, 2])
                .unwrap();
        }
        server
    }

    #[test]
    fn results_align_with_query_order() {
        let server = server();
        let queries = vec![
            "nasty rat -not".to_string(),
            "not very funny nasty pet".to_string(),
            "curly hair".to_string(),
        ];
        let per_query = process_queries(&server, &queries).unwrap();
        assert_eq!(per_query.len(), 3);
        for (query, results) in queries.iter().zip(&per_query) {
            assert_eq!(results, &server.find_top_documents(query).unwrap());
        }
    }

    #[test]
    fn joined_results_concatenate_in_order() {
        let server = server();
        let queries = vec!["curly hair".to_string(), "nasty rat -not".to_string()];
        let per_query = process_queries(&server, &queries).unwrap();
        let joined = process_queries_joined(&server, &queries).unwrap();
        let flat: Vec<_> = per_query.into_iter().flatten().collect();
        assert_eq!(joined, flat);
    }

    #[test]
    fn empty_query_list_yields_no_results() {
        let server = server();
        assert!(process_queries(&server, &[]).unwrap().is_empty());
        assert!(process_queries_joined(&server, &[]).unwrap().is_empty());
    }
}
