use crate::index::CorpusIndex;
use crate::record::Record;
use crate::tokenizer::tokenize;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Share of `tokens` equal to `term`
pub fn term_frequency(term: &str, tokens: &[String]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let count = tokens.iter().filter(|t| t.as_str() == term).count();
    count as f64 / tokens.len() as f64
}

/// TF-IDF weight of every distinct term in `tokens`
pub fn tfidf_scores(tokens: &[String], index: &CorpusIndex) -> HashMap<String, f64> {
    let distinct: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    distinct
        .into_iter()
        .map(|term| {
            let tfidf = term_frequency(term, tokens) * index.inverse_document_frequency(term);
            (term.to_string(), tfidf)
        })
        .collect()
}

/// Sum of the TF-IDF weights of the query terms; repeated query terms count each time
pub fn combined_score(scores: &HashMap<String, f64>, query_terms: &[String]) -> f64 {
    query_terms
        .iter()
        .map(|term| scores.get(term).copied().unwrap_or(0.0))
        .sum()
}

/// Ranked search result
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord<'a> {
    pub record: &'a Record,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BTreeMap<String, f64>>,
}

/// Score candidates and sort them by descending combined score
///
/// Candidates must arrive in corpus order: the sort is stable, so equal
/// scores keep that order.
pub fn rank_records<'a>(
    query_terms: &[String],
    candidates: Vec<&'a Record>,
    index: &CorpusIndex,
    explain: bool,
) -> Vec<ScoredRecord<'a>> {
    let mut scored: Vec<ScoredRecord<'a>> = candidates
        .into_iter()
        .map(|record| {
            let tokens = tokenize(record.text());
            let scores = tfidf_scores(&tokens, index);
            let score = combined_score(&scores, query_terms);
            ScoredRecord {
                record,
                score,
                breakdown: explain.then(|| scores.into_iter().collect()),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    scored
}
