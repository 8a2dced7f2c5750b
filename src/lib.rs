//! Lawlens library crate (used by the CLI binary and integration tests).
//!
//! Answers questions about statutes from a corpus of individually citable clauses.
//!
//! # Query path
//!
//! 1. [`corpus`] reads clause files and derives stable [`ClauseRecord`] identifiers.
//! 2. [`index`] builds the vector index once and reattaches to it afterwards.
//! 3. [`retrieval`] returns the top-K [`Candidate`]s, dense or hybrid.
//! 4. [`scoring`] reranks with a cross-encoder and drops clauses below the threshold.
//! 5. [`generation`] prompts the LLM with the surviving clauses and strips reasoning traces.
//!
//! [`QueryPipeline`] runs these stages per question; [`evaluation`] drives it over
//! labelled benchmarks.
//!
//! ## Backends
//! - [`BertEncoder`] / [`CrossEncoder`] - candle BERT models, with deterministic stubs
//! - [`GenaiGenerator`] - chat completion via `genai`
//! - [`QdrantStore`] - Qdrant vector store
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod evaluation;
pub mod generation;
pub mod hashing;
pub mod index;
pub mod pipeline;
pub mod retrieval;
pub mod scoring;
pub mod text;
pub mod vectordb;

pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use corpus::{ClauseMetadata, ClauseRecord, IngestionError, SourceDocument, ingest_dir};
pub use embedding::{
    BertEncoder, CrossEncoder, CrossEncoderConfig, EmbeddingError, EncoderConfig,
    RelevanceScorer, RerankerError, TextEmbedder,
};
pub use error::{BackendError, PipelineError, PipelineResult};
pub use evaluation::{
    EndToEndCase, EndToEndEvaluator, EndToEndReport, EvaluationSummary, RecallEvaluator,
    RecallReport, RetrievalCase,
};
pub use generation::{
    ChatPrompt, GenaiGenerator, GenerationError, Generator, GeneratorConfig, ResponseSynthesizer,
};
pub use hashing::{clause_point_id, corpus_fingerprint, hash_to_u64};
pub use index::{IndexConfig, IndexManager, IndexStatus, StorageError};
pub use pipeline::{Backends, QueryOutcome, QueryPipeline, QueryResponse};
pub use retrieval::{Candidate, RetrievalMode, Retriever};
pub use scoring::{RankedCandidate, RelevanceFilter, Reranker};
pub use vectordb::{QdrantStore, VectorDbError, VectorStore};

#[cfg(any(test, feature = "mock"))]
pub use embedding::MockRelevanceScorer;
#[cfg(any(test, feature = "mock"))]
pub use generation::MockGenerator;
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorStore;
