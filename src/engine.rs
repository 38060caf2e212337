use crate::index::{CorpusIndex, IndexStats};
use crate::ranking::{rank_records, ScoredRecord};
use crate::record::Record;
use crate::tokenizer::tokenize;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Search options
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Page size; `None` returns every match
    pub limit: Option<usize>,
    pub offset: usize,
    /// Keep the per-term TF-IDF breakdown on each result
    pub explain: bool,
}

/// Search result
#[derive(Debug, Clone)]
pub struct SearchResult<'a> {
    pub results: Vec<ScoredRecord<'a>>,
    /// Number of matching records before pagination
    pub total: usize,
    pub elapsed: Duration,
}

impl SearchResult<'_> {
    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Run a query against a corpus and its index
///
/// A record matches when every query term is one of its tokens. An empty
/// query has no terms, so every record matches.
pub fn search<'a>(
    query: &str,
    index: &CorpusIndex,
    records: &'a [Record],
    options: &SearchOptions,
) -> SearchResult<'a> {
    let start = Instant::now();

    let query_terms = tokenize(query);

    let candidates: Vec<&'a Record> = records
        .iter()
        .filter(|record| {
            let tokens: HashSet<String> = tokenize(record.text()).into_iter().collect();
            query_terms.iter().all(|term| tokens.contains(term))
        })
        .collect();

    let total = candidates.len();
    let ranked = rank_records(&query_terms, candidates, index, options.explain);

    let results: Vec<ScoredRecord<'a>> = match options.limit {
        Some(limit) => ranked.into_iter().skip(options.offset).take(limit).collect(),
        None => ranked.into_iter().skip(options.offset).collect(),
    };

    let elapsed = start.elapsed();
    tracing::debug!(
        query,
        terms = query_terms.len(),
        total,
        returned = results.len(),
        elapsed_us = elapsed.as_micros() as u64,
        "search complete"
    );

    SearchResult {
        results,
        total,
        elapsed,
    }
}

/// Main search engine: a corpus plus the index built over it
pub struct SearchEngine {
    records: Vec<Record>,
    index: CorpusIndex,
}

impl SearchEngine {
    /// Index a corpus
    pub fn new(records: Vec<Record>) -> Self {
        let start = Instant::now();
        let index = CorpusIndex::build(&records);
        tracing::info!(
            records = records.len(),
            terms = index.term_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "corpus indexed"
        );

        Self { records, index }
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> SearchResult<'_> {
        search(query, &self.index, &self.records, options)
    }

    /// Get a record by ID
    pub fn get_record(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}
