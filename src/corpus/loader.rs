use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use super::error::{IngestionError, IngestionResult};
use super::record::SourceDocument;

const CORPUS_EXTENSION: &str = "json";

/// Loads and validates every `*.json` document in `dir`.
///
/// Files are visited in file-name order so repeated loads are identical. Each file's root
/// must be an array of flat string-to-string objects; each object becomes one
/// [`SourceDocument`] whose clauses keep the keys' order in the file.
pub fn load_documents(dir: &Path) -> IngestionResult<Vec<SourceDocument>> {
    let files = list_corpus_files(dir)?;
    if files.is_empty() {
        return Err(IngestionError::NoDocuments {
            dir: dir.to_path_buf(),
        });
    }

    let mut documents = Vec::new();
    for path in &files {
        let parsed = load_file(path)?;
        debug!(file = %path.display(), records = parsed.len(), "Loaded corpus file");
        documents.extend(parsed);
    }

    info!(
        dir = %dir.display(),
        files = files.len(),
        documents = documents.len(),
        "Corpus loaded"
    );

    Ok(documents)
}

fn list_corpus_files(dir: &Path) -> IngestionResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| IngestionError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestionError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == std::ffi::OsStr::new(CORPUS_EXTENSION))
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn load_file(path: &Path) -> IngestionResult<Vec<SourceDocument>> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let raw = std::fs::read_to_string(path).map_err(|source| IngestionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let root: Value = serde_json::from_str(&raw).map_err(|source| IngestionError::Parse {
        file: file_name.clone(),
        source,
    })?;

    parse_documents(&file_name, root)
}

/// Validates the shape of one parsed file and converts it into documents.
pub fn parse_documents(file_name: &str, root: Value) -> IngestionResult<Vec<SourceDocument>> {
    let Value::Array(records) = root else {
        return Err(IngestionError::InvalidRoot {
            file: file_name.to_string(),
        });
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let Value::Object(map) = record else {
                return Err(IngestionError::InvalidRecord {
                    file: file_name.to_string(),
                    index,
                });
            };

            let clauses = map
                .into_iter()
                .map(|(key, value)| match value {
                    Value::String(text) => Ok((key, text)),
                    _ => Err(IngestionError::NonStringValue {
                        file: file_name.to_string(),
                        key,
                    }),
                })
                .collect::<IngestionResult<Vec<_>>>()?;

            Ok(SourceDocument::new(file_name, clauses))
        })
        .collect()
}
