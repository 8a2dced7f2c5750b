//! BLAKE3-derived identifiers.
//!
//! Qdrant only accepts unsigned integers or UUIDs as point ids, while clause identifiers are
//! strings of the form `sourceFile::fullTitle`. [`clause_point_id`] maps one to the other
//! deterministically so re-ingesting the same corpus overwrites rather than duplicates.

use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Collision Probability
///
/// With 64 bits the birthday bound is around 4.3 billion items. A statute corpus has at most
/// tens of thousands of clauses, so a collision is practically impossible; the index still
/// checks for one before building and refuses to continue if it happens.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Vector store point id for a clause identifier.
#[inline]
pub fn clause_point_id(clause_id: &str) -> u64 {
    hash_to_u64(clause_id.as_bytes())
}

/// Order-independent fingerprint of a set of clause identifiers.
///
/// Two ingestions of the same corpus produce the same fingerprint regardless of the order in
/// which files were listed by the filesystem.
pub fn corpus_fingerprint<'a, I>(clause_ids: I) -> [u8; 32]
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids: Vec<&str> = clause_ids.into_iter().collect();
    ids.sort_unstable();

    let mut hasher = Hasher::new();
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update(b"\n");
    }
    *hasher.finalize().as_bytes()
}
