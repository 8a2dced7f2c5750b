use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{StorageError, StorageResult};
use crate::corpus::ClauseRecord;
use crate::hashing::corpus_fingerprint;

/// File name of the persisted document store inside the persist directory.
pub const DOCSTORE_FILE: &str = "docstore.json";

/// Clause records persisted alongside the vector collection.
///
/// The vector store payload is authoritative for retrieval; this copy feeds the lexical index
/// and lets a restarted process inspect the corpus without scanning the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocStore {
    collection: String,
    fingerprint: String,
    clauses: Vec<ClauseRecord>,
}

impl DocStore {
    pub fn new(collection: &str, clauses: Vec<ClauseRecord>) -> Self {
        let fingerprint = fingerprint_hex(&clauses);

        Self {
            collection: collection.to_string(),
            fingerprint,
            clauses,
        }
    }

    /// Whether the stored fingerprint still matches the clause identifiers.
    pub fn fingerprint_matches(&self) -> bool {
        fingerprint_hex(&self.clauses) == self.fingerprint
    }

    pub fn path(dir: &Path) -> PathBuf {
        dir.join(DOCSTORE_FILE)
    }

    /// Reads the store from `dir`; `Ok(None)` if no store was persisted there.
    pub fn load(dir: &Path) -> StorageResult<Option<Self>> {
        let path = Self::path(dir);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::DocStoreIo { path, source }),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StorageError::DocStoreFormat { path, source })
    }

    /// Deletes a persisted store from `dir`, if any.
    pub fn remove(dir: &Path) -> StorageResult<()> {
        let path = Self::path(dir);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::DocStoreIo { path, source }),
        }
    }

    /// Writes the store to `dir`, replacing any previous file atomically.
    pub fn persist(&self, dir: &Path) -> StorageResult<()> {
        fs::create_dir_all(dir).map_err(|source| StorageError::DocStoreIo {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = Self::path(dir);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(self).map_err(|source| {
            StorageError::DocStoreFormat {
                path: path.clone(),
                source,
            }
        })?;

        fs::write(&tmp, json).map_err(|source| StorageError::DocStoreIo {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::DocStoreIo {
            path: path.clone(),
            source,
        })?;

        Ok(())
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Hex BLAKE3 fingerprint of the clause identifier set.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn clauses(&self) -> &[ClauseRecord] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

fn fingerprint_hex(clauses: &[ClauseRecord]) -> String {
    blake3::Hash::from(corpus_fingerprint(clauses.iter().map(|c| c.id())))
        .to_hex()
        .to_string()
}
