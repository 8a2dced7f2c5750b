//! Statute corpus ingestion.
//!
//! [`load_documents`] validates the raw JSON files; [`extract_clauses`] flattens them into
//! [`ClauseRecord`]s with stable `sourceFile::fullTitle` identifiers.

pub mod error;
pub mod loader;
pub mod record;

#[cfg(test)]
mod tests;

pub use error::{IngestionError, IngestionResult};
pub use loader::{load_documents, parse_documents};
pub use record::{
    CLAUSE_ID_SEPARATOR, ClauseMetadata, ClauseRecord, SourceDocument, clause_id, split_title,
};

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

/// Flattens documents into clause records, one per title key.
///
/// Ordinals follow document order then key order. Duplicate identifiers are fatal.
pub fn extract_clauses(documents: &[SourceDocument]) -> IngestionResult<Vec<ClauseRecord>> {
    let mut seen = HashSet::new();
    let mut clauses = Vec::new();

    for doc in documents {
        for (full_title, text) in doc.clauses() {
            let record =
                ClauseRecord::new(doc.source_file(), full_title, text, clauses.len() as u64);
            if !seen.insert(record.id().to_string()) {
                return Err(IngestionError::DuplicateClause {
                    id: record.id().to_string(),
                });
            }
            clauses.push(record);
        }
    }

    if clauses.is_empty() {
        return Err(IngestionError::EmptyCorpus);
    }

    info!(
        clauses = clauses.len(),
        sample_id = clauses[0].id(),
        "Clause records created"
    );

    Ok(clauses)
}

/// Loads `dir` and extracts its clauses in one step.
pub fn ingest_dir(dir: &Path) -> IngestionResult<Vec<ClauseRecord>> {
    let documents = load_documents(dir)?;
    extract_clauses(&documents)
}
