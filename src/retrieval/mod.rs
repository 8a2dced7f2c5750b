//! First-stage retrieval: dense similarity, optionally blended with BM25.

pub mod engine;
pub mod lexical;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::{RetrievalMode, Retriever, blend_hybrid};
pub use lexical::{BM25_B, BM25_K1, Bm25Index};
pub use types::{Candidate, sort_candidates};
