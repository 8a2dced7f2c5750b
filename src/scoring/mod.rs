//! Rerank and relevance filtering.
//!
//! [`Reranker`] reorders retrieval candidates by cross-encoder score and caps them at
//! `top_n`; [`RelevanceFilter`] then keeps the subsequence above the configured threshold.
//! The threshold comes from [`Config::min_rerank_score`](crate::config::Config) only.

pub mod filter;
pub mod reranker;
pub mod types;


pub use filter::RelevanceFilter;
pub use reranker::Reranker;
pub use types::RankedCandidate;
