use serde::{Deserialize, Serialize};

use crate::constants::{LEGAL_ARTICLE_CONTENT_TYPE, UNKNOWN_ARTICLE};

/// Separator between source file name and full title in a clause identifier.
pub const CLAUSE_ID_SEPARATOR: &str = "::";

/// A parsed input record: clause titles mapped to clause text, tagged with its file.
///
/// Only lives for the duration of ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    source_file: String,
    clauses: Vec<(String, String)>,
}

impl SourceDocument {
    /// Creates a document from `(fullTitle, text)` pairs in their source order.
    pub fn new(source_file: impl Into<String>, clauses: Vec<(String, String)>) -> Self {
        Self {
            source_file: source_file.into(),
            clauses,
        }
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    pub fn clauses(&self) -> &[(String, String)] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Citation metadata attached to every clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseMetadata {
    pub law_name: String,
    pub article_label: String,
    pub full_title: String,
    pub source_file: String,
    pub content_type: String,
}

/// An atomic, independently citable clause.
///
/// The identifier is `sourceFile::fullTitle` and is derived, never assigned, so the same
/// corpus always yields the same identifiers. `ordinal` is the ingestion position and is
/// only used to break score ties deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseRecord {
    id: String,
    text: String,
    metadata: ClauseMetadata,
    ordinal: u64,
}

impl ClauseRecord {
    /// Builds a clause from its source file, full title and text.
    pub fn new(source_file: &str, full_title: &str, text: &str, ordinal: u64) -> Self {
        let (law_name, article_label) = split_title(full_title);

        Self {
            id: clause_id(source_file, full_title),
            text: text.to_string(),
            metadata: ClauseMetadata {
                law_name: law_name.to_string(),
                article_label: article_label.to_string(),
                full_title: full_title.to_string(),
                source_file: source_file.to_string(),
                content_type: LEGAL_ARTICLE_CONTENT_TYPE.to_string(),
            },
            ordinal,
        }
    }

    /// Rebuilds a clause from persisted fields (vector store payload).
    pub(crate) fn from_stored(
        id: String,
        text: String,
        metadata: ClauseMetadata,
        ordinal: u64,
    ) -> Self {
        Self {
            id,
            text,
            metadata,
            ordinal,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &ClauseMetadata {
        &self.metadata
    }

    pub fn full_title(&self) -> &str {
        &self.metadata.full_title
    }

    pub fn law_name(&self) -> &str {
        &self.metadata.law_name
    }

    pub fn article_label(&self) -> &str {
        &self.metadata.article_label
    }

    pub fn source_file(&self) -> &str {
        &self.metadata.source_file
    }

    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Returns `true` if a benchmark label refers to this clause.
    ///
    /// Labels may be full identifiers or bare full titles.
    pub fn matches_label(&self, label: &str) -> bool {
        self.id == label || self.metadata.full_title == label
    }
}

/// Builds the stable identifier for a clause.
pub fn clause_id(source_file: &str, full_title: &str) -> String {
    format!("{source_file}{CLAUSE_ID_SEPARATOR}{full_title}")
}

/// Splits a full title into `(lawName, articleLabel)` on the first whitespace.
pub fn split_title(full_title: &str) -> (&str, &str) {
    match full_title.split_once(char::is_whitespace) {
        Some((law, article)) => (law, article),
        None => (full_title, UNKNOWN_ARTICLE),
    }
}
