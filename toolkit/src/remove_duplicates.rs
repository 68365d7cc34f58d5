//! Duplicate detection over the engine's introspection surface.

use std::collections::BTreeSet;

use engine::{DocId, SearchError, SearchServer};

/// Remove documents whose term set already occurred under a lower id.
///
/// Walks live ids in ascending order, so the first occurrence of each
/// term set always survives. Returns the removed ids in ascending order.
pub fn remove_duplicates(server: &mut SearchServer) -> Result<Vec<DocId>, SearchError> {
    let mut seen_term_sets: BTreeSet<BTreeSet<String>> = BTreeSet::new();
    let mut duplicate_ids = Vec::new();
    for document_id in server.document_ids() {
        let term_set: BTreeSet<String> = server
            .word_frequencies(document_id)
            .keys()
            .cloned()
            .collect();
        if !seen_term_sets.insert(term_set) {
            duplicate_ids.push(document_id);
        }
    }
    for &document_id in &duplicate_ids {
        tracing::info!(document_id, "found duplicate document");
        server.remove_document(document_id)?;
    }
    Ok(duplicate_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::DocumentStatus;

    #[test]
    fn later_term_set_duplicates_are_removed() {
        let mut server = SearchServer::new(["and", "with"]).unwrap();
        let corpus = [
            (1, "funny pet and nasty rat"),
            (2, "funny pet with curly hair"),
            // duplicate of 2
            (3, "funny pet with curly hair"),
            // same term set as 2, different frequencies
            (4, "funny pet and curly hair"),
            // same term set as 1
            (5, "funny funny pet and nasty nasty rat"),
            (6, "funny pet and not very nasty rat"),
            (7, "very nasty rat and not very funny pet"),
            (8, "pet with rat and rat and rat"),
            (9, "nasty rat with curly hair"),
        ];
        for (id, text) in corpus {
            server
                .add_document(id, text, DocumentStatus::Actual, &[1, 2])
                .unwrap();
        }

        let removed = remove_duplicates(&mut server).unwrap();
        assert_eq!(removed, vec![3, 4, 5, 7]);
        assert_eq!(server.document_count(), 5);
        let live: Vec<DocId> = server.document_ids().collect();
        assert_eq!(live, vec![1, 2, 6, 8, 9]);
    }

    #[test]
    fn distinct_corpora_are_untouched() {
        let mut server = SearchServer::new(["and"]).unwrap();
        server
            .add_document(1, "curly cat", DocumentStatus::Actual, &[])
            .unwrap();
        server
            .add_document(2, "nasty dog", DocumentStatus::Actual, &[])
            .unwrap();
        assert!(remove_duplicates(&mut server).unwrap().is_empty());
        assert_eq!(server.document_count(), 2);
    }
}
