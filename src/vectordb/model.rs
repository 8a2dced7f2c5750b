use std::collections::HashMap;

use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{ScoredPoint, Value};

use super::VectorDbError;
use crate::corpus::{ClauseMetadata, ClauseRecord};
use crate::hashing::clause_point_id;

const FIELD_CLAUSE_ID: &str = "clause_id";
const FIELD_TEXT: &str = "text";
const FIELD_LAW_NAME: &str = "law_name";
const FIELD_ARTICLE_LABEL: &str = "article_label";
const FIELD_FULL_TITLE: &str = "full_title";
const FIELD_SOURCE_FILE: &str = "source_file";
const FIELD_CONTENT_TYPE: &str = "content_type";
const FIELD_ORDINAL: &str = "ordinal";

/// A clause embedding ready for upsert.
#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub clause: ClauseRecord,
}

impl VectorPoint {
    /// Keys the point by the clause identifier hash.
    pub fn new(clause: ClauseRecord, vector: Vec<f32>) -> Self {
        Self {
            id: clause_point_id(clause.id()),
            vector,
            clause,
        }
    }

    /// Qdrant payload carrying the clause text and every metadata field.
    pub fn payload(&self) -> HashMap<String, Value> {
        clause_payload(&self.clause)
    }
}

/// A stored clause returned by similarity search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub id: u64,
    pub score: f32,
    pub clause: ClauseRecord,
}

impl SearchResult {
    pub fn from_scored_point(point: ScoredPoint) -> Result<Self, VectorDbError> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n,
            _ => {
                return Err(VectorDbError::MalformedPayload {
                    point_id: 0,
                    field: "id",
                });
            }
        };

        let clause = clause_from_payload(id, &point.payload)?;

        Ok(SearchResult {
            id,
            score: point.score,
            clause,
        })
    }
}

pub(crate) fn clause_payload(clause: &ClauseRecord) -> HashMap<String, Value> {
    let meta = clause.metadata();
    let mut payload: HashMap<String, Value> = HashMap::new();
    payload.insert(FIELD_CLAUSE_ID.to_string(), clause.id().into());
    payload.insert(FIELD_TEXT.to_string(), clause.text().into());
    payload.insert(FIELD_LAW_NAME.to_string(), meta.law_name.as_str().into());
    payload.insert(
        FIELD_ARTICLE_LABEL.to_string(),
        meta.article_label.as_str().into(),
    );
    payload.insert(FIELD_FULL_TITLE.to_string(), meta.full_title.as_str().into());
    payload.insert(
        FIELD_SOURCE_FILE.to_string(),
        meta.source_file.as_str().into(),
    );
    payload.insert(
        FIELD_CONTENT_TYPE.to_string(),
        meta.content_type.as_str().into(),
    );
    payload.insert(FIELD_ORDINAL.to_string(), (clause.ordinal() as i64).into());
    payload
}

pub(crate) fn clause_from_payload(
    point_id: u64,
    payload: &HashMap<String, Value>,
) -> Result<ClauseRecord, VectorDbError> {
    let text_field = |field: &'static str| -> Result<String, VectorDbError> {
        payload
            .get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or(VectorDbError::MalformedPayload { point_id, field })
    };

    let ordinal = payload
        .get(FIELD_ORDINAL)
        .and_then(|v| v.as_integer())
        .ok_or(VectorDbError::MalformedPayload {
            point_id,
            field: FIELD_ORDINAL,
        })?;

    let metadata = ClauseMetadata {
        law_name: text_field(FIELD_LAW_NAME)?,
        article_label: text_field(FIELD_ARTICLE_LABEL)?,
        full_title: text_field(FIELD_FULL_TITLE)?,
        source_file: text_field(FIELD_SOURCE_FILE)?,
        content_type: text_field(FIELD_CONTENT_TYPE)?,
    };

    Ok(ClauseRecord::from_stored(
        text_field(FIELD_CLAUSE_ID)?,
        text_field(FIELD_TEXT)?,
        metadata,
        ordinal.max(0) as u64,
    ))
}
