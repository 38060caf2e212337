use crate::record::Record;
use crate::tokenizer::unique_terms;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-term corpus statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermStats {
    pub document_frequency: usize,
    pub inverse_document_frequency: f64,
}

/// Corpus index: term -> document frequency and IDF weight
///
/// Built once over the whole corpus and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    terms: HashMap<String, TermStats>,
    doc_count: usize,
}

/// `ln(N / (df + 1))`; negative once a term is in more than `N/e - 1` records
pub fn inverse_document_frequency(doc_count: usize, document_frequency: usize) -> f64 {
    (doc_count as f64 / (document_frequency + 1) as f64).ln()
}

impl CorpusIndex {
    /// Build the index over a corpus
    pub fn build(records: &[Record]) -> Self {
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();

        for record in records {
            // Repeats within one record count once
            for term in unique_terms(record.text()) {
                *doc_freqs.entry(term).or_insert(0) += 1;
            }
        }

        let doc_count = records.len();
        let terms = doc_freqs
            .into_iter()
            .map(|(term, document_frequency)| {
                let stats = TermStats {
                    document_frequency,
                    inverse_document_frequency: inverse_document_frequency(doc_count, document_frequency),
                };
                (term, stats)
            })
            .collect();

        Self { terms, doc_count }
    }

    pub fn term_stats(&self, term: &str) -> Option<&TermStats> {
        self.terms.get(term)
    }

    /// Number of records containing `term`; 0 if the corpus never uses it
    pub fn document_frequency(&self, term: &str) -> usize {
        self.terms.get(term).map(|s| s.document_frequency).unwrap_or(0)
    }

    /// IDF weight of `term`; unseen terms weigh 0
    pub fn inverse_document_frequency(&self, term: &str) -> f64 {
        self.terms
            .get(term)
            .map(|s| s.inverse_document_frequency)
            .unwrap_or(0.0)
    }

    pub fn total_documents(&self) -> usize {
        self.doc_count
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &TermStats)> {
        self.terms.iter().map(|(t, s)| (t.as_str(), s))
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_documents: self.doc_count,
            total_terms: self.terms.len(),
            avg_docs_per_term: if self.terms.is_empty() {
                0.0
            } else {
                self.terms.values().map(|s| s.document_frequency).sum::<usize>() as f64
                    / self.terms.len() as f64
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub total_terms: usize,
    pub avg_docs_per_term: f64,
}
