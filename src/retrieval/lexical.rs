//! Okapi BM25 over the clause document store.

use std::collections::{HashMap, HashSet};

use crate::corpus::ClauseRecord;
use crate::text::tokenize;

pub const BM25_K1: f32 = 1.2;
pub const BM25_B: f32 = 0.75;

#[derive(Debug, Clone)]
struct DocTerms {
    term_freqs: HashMap<String, u32>,
    len: usize,
}

/// Sparse lexical index keyed by clause identifier.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    docs: HashMap<String, DocTerms>,
    doc_freqs: HashMap<String, u32>,
    avg_doc_len: f32,
}

impl Bm25Index {
    pub fn build<'a, I>(clauses: I) -> Self
    where
        I: IntoIterator<Item = &'a ClauseRecord>,
    {
        let mut docs = HashMap::new();
        let mut doc_freqs: HashMap<String, u32> = HashMap::new();
        let mut total_len = 0usize;

        for clause in clauses {
            let tokens = tokenize(clause.text());
            let mut term_freqs: HashMap<String, u32> = HashMap::new();
            for token in &tokens {
                *term_freqs.entry(token.clone()).or_insert(0) += 1;
            }
            for term in term_freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            total_len += tokens.len();
            docs.insert(
                clause.id().to_string(),
                DocTerms {
                    term_freqs,
                    len: tokens.len(),
                },
            );
        }

        let avg_doc_len = if docs.is_empty() {
            0.0
        } else {
            total_len as f32 / docs.len() as f32
        };

        Self {
            docs,
            doc_freqs,
            avg_doc_len,
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Distinct query terms, in first-occurrence order.
    pub fn query_terms(query: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        tokenize(query)
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }

    /// BM25 score of one clause against pre-tokenized query terms; 0 for unknown clauses.
    pub fn score(&self, query_terms: &[String], clause_id: &str) -> f32 {
        let Some(doc) = self.docs.get(clause_id) else {
            return 0.0;
        };
        if self.avg_doc_len <= 0.0 {
            return 0.0;
        }

        let n = self.docs.len() as f32;
        let len_norm = 1.0 - BM25_B + BM25_B * doc.len as f32 / self.avg_doc_len;

        query_terms
            .iter()
            .filter_map(|term| {
                let tf = *doc.term_freqs.get(term)? as f32;
                let df = self.doc_freqs.get(term).copied().unwrap_or(0) as f32;
                let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
                Some(idf * tf * (BM25_K1 + 1.0) / (tf + BM25_K1 * len_norm))
            })
            .sum()
    }
}
