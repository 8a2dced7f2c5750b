use std::path::Path;
use std::sync::Arc;

use super::*;
use crate::corpus::ClauseRecord;
use crate::embedding::{BertEncoder, TextEmbedder};
use crate::error::PipelineError;
use crate::index::{IndexConfig, IndexManager, StorageError};
use crate::vectordb::MockVectorStore;

fn sample_clauses() -> Vec<ClauseRecord> {
    [
        ("劳动法 第三十六条", "国家实行劳动者每日工作时间不超过八小时、平均每周工作时间不超过四十四小时的工时制度。"),
        ("劳动法 第四十四条", "安排劳动者延长工作时间的，支付不低于工资的百分之一百五十的工资报酬。"),
        ("劳动合同法 第十九条", "劳动合同期限三个月以上不满一年的，试用期不得超过一个月。"),
        ("劳动合同法 第二十条", "劳动者在试用期的工资不得低于本单位相同岗位最低档工资的百分之八十。"),
        ("劳动合同法 第四十七条", "经济补偿按劳动者在本单位工作的年限，每满一年支付一个月工资的标准向劳动者支付。"),
        ("劳动法 第七十条", "国家发展社会保险事业，建立社会保险制度，设立社会保险基金。"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (title, text))| ClauseRecord::new("labor.json", title, text, i as u64))
    .collect()
}

fn candidate(ordinal: u64, similarity: f32) -> Candidate {
    let title = format!("劳动法 第{ordinal}条");
    Candidate::new(
        Arc::new(ClauseRecord::new("labor.json", &title, "正文", ordinal)),
        similarity,
    )
}

async fn built_index(dir: &Path) -> Arc<IndexManager<MockVectorStore>> {
    let embedder: Arc<dyn TextEmbedder> = Arc::new(BertEncoder::stub().unwrap());
    let index =
        IndexManager::new(MockVectorStore::new(), embedder, IndexConfig::new("labor", dir)).unwrap();
    index.build_index(sample_clauses()).await.unwrap();
    Arc::new(index)
}

#[test]
fn test_sort_candidates_breaks_ties_by_ordinal() {
    let mut candidates = vec![candidate(3, 0.5), candidate(1, 0.5), candidate(2, 0.9)];
    sort_candidates(&mut candidates);

    let ordinals: Vec<u64> = candidates.iter().map(|c| c.clause().ordinal()).collect();
    assert_eq!(ordinals, vec![2, 1, 3]);
}

#[test]
fn test_sort_candidates_nan_last() {
    let mut candidates = vec![candidate(0, f32::NAN), candidate(1, 0.1)];
    sort_candidates(&mut candidates);
    assert_eq!(candidates[0].clause().ordinal(), 1);
}

#[test]
fn test_bm25_prefers_matching_clause() {
    let clauses = sample_clauses();
    let index = Bm25Index::build(&clauses);
    let terms = Bm25Index::query_terms("试用期工资");

    let probation = index.score(&terms, clauses[3].id());
    let insurance = index.score(&terms, clauses[5].id());
    assert!(probation > insurance);
    assert_eq!(index.len(), clauses.len());
}

#[test]
fn test_bm25_unknown_clause_scores_zero() {
    let index = Bm25Index::build(&sample_clauses());
    let terms = Bm25Index::query_terms("工资");
    assert_eq!(index.score(&terms, "missing::id"), 0.0);
}

#[test]
fn test_bm25_empty_index() {
    let index = Bm25Index::build(std::iter::empty());
    assert!(index.is_empty());
    assert_eq!(index.score(&Bm25Index::query_terms("工资"), "x"), 0.0);
}

#[test]
fn test_query_terms_deduplicated() {
    let terms = Bm25Index::query_terms("工资 工资");
    let unique: std::collections::HashSet<_> = terms.iter().collect();
    assert_eq!(terms.len(), unique.len());
}

#[test]
fn test_blend_alpha_one_keeps_dense_scores() {
    let clauses = sample_clauses();
    let lexical = Bm25Index::build(&clauses);
    let pool: Vec<Candidate> = clauses
        .iter()
        .enumerate()
        .map(|(i, c)| Candidate::new(Arc::new(c.clone()), 0.1 * i as f32))
        .collect();

    let blended = blend_hybrid(pool.clone(), &lexical, "试用期工资", 1.0);
    for (before, after) in pool.iter().zip(&blended) {
        assert_eq!(before.similarity(), after.retrieval_score());
    }
}

#[test]
fn test_blend_alpha_zero_uses_normalized_sparse() {
    let clauses = sample_clauses();
    let lexical = Bm25Index::build(&clauses);
    let pool: Vec<Candidate> = clauses
        .iter()
        .map(|c| Candidate::new(Arc::new(c.clone()), 0.5))
        .collect();

    let blended = blend_hybrid(pool, &lexical, "社会保险基金", 0.0);
    let max = blended
        .iter()
        .map(|c| c.retrieval_score())
        .fold(0.0f32, f32::max);

    assert!((max - 1.0).abs() < 1e-6);
    assert!(blended.iter().all(|c| (0.0..=1.0).contains(&c.retrieval_score())));
    assert_eq!(blended[5].retrieval_score(), max);
    assert!(blended.iter().all(|c| c.similarity() == 0.5));
}

#[test]
fn test_hybrid_alpha_validation() {
    assert!(RetrievalMode::hybrid(0.0).is_ok());
    assert!(RetrievalMode::hybrid(1.0).is_ok());
    assert!(RetrievalMode::hybrid(1.5).is_err());
    assert!(RetrievalMode::hybrid(f32::NAN).is_err());
    assert_eq!(RetrievalMode::Dense.alpha(), 1.0);
}

#[tokio::test]
async fn test_retriever_respects_top_k() {
    let dir = tempfile::tempdir().unwrap();
    let index = built_index(dir.path()).await;

    let retriever = Retriever::new(index, 2, RetrievalMode::Dense).unwrap();
    let results = retriever.retrieve("加班工资").await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].similarity() >= results[1].similarity());
}

#[tokio::test]
async fn test_dense_retrieval_finds_relevant_clause() {
    let dir = tempfile::tempdir().unwrap();
    let index = built_index(dir.path()).await;

    let retriever = Retriever::new(index, 3, RetrievalMode::Dense).unwrap();
    let results = retriever.retrieve("社会保险基金").await.unwrap();

    assert_eq!(results[0].clause().full_title(), "劳动法 第七十条");
}

#[tokio::test]
async fn test_hybrid_alpha_one_matches_dense() {
    let dir = tempfile::tempdir().unwrap();
    let index = built_index(dir.path()).await;

    let dense = Retriever::new(index.clone(), 4, RetrievalMode::Dense).unwrap();
    let hybrid = Retriever::new(index, 4, RetrievalMode::Hybrid { alpha: 1.0 }).unwrap();

    for question in ["试用期工资", "延长工作时间", "经济补偿怎么算", "无关问题"] {
        let a = dense.retrieve(question).await.unwrap();
        let b = hybrid.retrieve(question).await.unwrap();

        let ids_a: Vec<&str> = a.iter().map(|c| c.clause().id()).collect();
        let ids_b: Vec<&str> = b.iter().map(|c| c.clause().id()).collect();
        assert_eq!(ids_a, ids_b, "ordering differs for {question}");
    }
}

#[tokio::test]
async fn test_hybrid_keeps_dense_similarity() {
    let dir = tempfile::tempdir().unwrap();
    let index = built_index(dir.path()).await;

    let dense = Retriever::new(index.clone(), 6, RetrievalMode::Dense).unwrap();
    let hybrid = Retriever::new(index, 6, RetrievalMode::hybrid(0.3).unwrap()).unwrap();

    let dense_results = dense.retrieve("试用期工资").await.unwrap();
    let hybrid_results = hybrid.retrieve("试用期工资").await.unwrap();

    for candidate in &hybrid_results {
        let same = dense_results
            .iter()
            .find(|d| d.clause().id() == candidate.clause().id())
            .unwrap();
        assert_eq!(candidate.similarity(), same.similarity());
    }
    assert!(
        hybrid_results
            .windows(2)
            .all(|w| w[0].retrieval_score() >= w[1].retrieval_score())
    );
    assert!(
        hybrid_results
            .iter()
            .any(|c| c.retrieval_score() != c.similarity())
    );
}

#[tokio::test]
async fn test_retrieval_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let index = built_index(dir.path()).await;
    let retriever = Retriever::new(index, 5, RetrievalMode::hybrid(0.5).unwrap()).unwrap();

    let first = retriever.retrieve("劳动者工资").await.unwrap();
    let second = retriever.retrieve("劳动者工资").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_retriever_rejects_invalid_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let index = built_index(dir.path()).await;

    assert!(matches!(
        Retriever::new(index.clone(), 0, RetrievalMode::Dense),
        Err(PipelineError::InvalidParameter { name: "top_k", .. })
    ));
    assert!(Retriever::new(index, 3, RetrievalMode::Hybrid { alpha: -0.1 }).is_err());
}

#[tokio::test]
async fn test_retrieve_before_init_is_not_ready() {
    let dir = tempfile::tempdir().unwrap();
    let embedder: Arc<dyn TextEmbedder> = Arc::new(BertEncoder::stub().unwrap());
    let index = IndexManager::new(
        MockVectorStore::new(),
        embedder,
        IndexConfig::new("labor", dir.path()),
    )
    .unwrap();

    let retriever = Retriever::new(Arc::new(index), 3, RetrievalMode::Dense).unwrap();
    let err = retriever.retrieve("工资").await.unwrap_err();
    assert!(matches!(err, PipelineError::Storage(StorageError::NotReady)));
}
