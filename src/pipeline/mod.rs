//! Per-query orchestration.
//!
//! [`QueryPipeline`] owns one instance of each stage and runs them strictly in sequence.
//! Model handles come from an explicit [`Backends`] value rather than global state.

pub mod backends;
pub mod query;
pub mod response;


pub use backends::Backends;
pub use query::QueryPipeline;
pub use response::{NO_RELEVANT_CLAUSES_MESSAGE, QueryOutcome, QueryResponse, RankedRetrieval};
