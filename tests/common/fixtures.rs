//! Test fixtures for integration tests.

use std::path::Path;
use std::sync::Arc;

use lawlens::config::Config;
use lawlens::generation::MockGenerator;
use lawlens::index::{IndexConfig, IndexManager};
use lawlens::pipeline::{Backends, QueryPipeline};
use lawlens::vectordb::MockVectorStore;

pub const COLLECTION: &str = "labor_test";

pub const LABOR_LAW_FILE: &str = "labor_law.json";

pub const CONTRACT_LAW_FILE: &str = "labor_contract_law.json";

pub const LABOR_LAW_JSON: &str = r#"[
  {
    "中华人民共和国劳动法 第三十六条": "国家实行劳动者每日工作时间不超过八小时、平均每周工作时间不超过四十四小时的工时制度。",
    "中华人民共和国劳动法 第四十四条": "安排劳动者延长工作时间的，支付不低于工资的百分之一百五十的工资报酬。"
  },
  {
    "中华人民共和国劳动法 第七十条": "国家发展社会保险事业，建立社会保险制度，设立社会保险基金。"
  }
]"#;

pub const CONTRACT_LAW_JSON: &str = r#"[
  {
    "中华人民共和国劳动合同法 第十条": "建立劳动关系，应当订立书面劳动合同。",
    "中华人民共和国劳动合同法 第十九条": "劳动合同期限三个月以上不满一年的，试用期不得超过一个月。",
    "中华人民共和国劳动合同法 第二十条": "劳动者在试用期的工资不得低于本单位相同岗位最低档工资的百分之八十。"
  }
]"#;

pub const CORPUS_CLAUSES: usize = 6;

/// Writes the two-file sample corpus into `dir`.
pub fn write_corpus(dir: &Path) {
    std::fs::write(dir.join(LABOR_LAW_FILE), LABOR_LAW_JSON).expect("write labor law");
    std::fs::write(dir.join(CONTRACT_LAW_FILE), CONTRACT_LAW_JSON).expect("write contract law");
}

/// Config rooted in temp directories, with every reranked clause eligible for citation.
pub fn test_config(data_dir: &Path, persist_dir: &Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        persist_dir: persist_dir.to_path_buf(),
        collection_name: COLLECTION.to_string(),
        top_k: 6,
        rerank_top_n: 3,
        min_rerank_score: 0.0,
        eval_concurrency: 2,
        ..Default::default()
    }
}

pub fn index_manager(
    store: Arc<MockVectorStore>,
    backends: &Backends,
    config: &Config,
) -> IndexManager<Arc<MockVectorStore>> {
    let index_config: IndexConfig = config.index_config(backends.embedder.embedding_dim());
    IndexManager::new(store, backends.embedder.clone(), index_config).expect("index manager")
}

/// Corpus on disk, index built on a fresh mock store, pipeline wired from config.
pub struct Harness {
    pub data_dir: tempfile::TempDir,
    pub persist_dir: tempfile::TempDir,
    pub store: Arc<MockVectorStore>,
    pub generator: MockGenerator,
    pub config: Config,
    pub pipeline: Arc<QueryPipeline<Arc<MockVectorStore>>>,
}

impl Harness {
    pub async fn new(generator: MockGenerator) -> Self {
        Self::with_config(generator, |_| {}).await
    }

    pub async fn with_config(generator: MockGenerator, adjust: impl FnOnce(&mut Config)) -> Self {
        let data_dir = tempfile::tempdir().expect("data dir");
        let persist_dir = tempfile::tempdir().expect("persist dir");
        write_corpus(data_dir.path());

        let mut config = test_config(data_dir.path(), persist_dir.path());
        adjust(&mut config);

        let backends = Backends::stub(Arc::new(generator.clone())).expect("stub backends");
        let store = Arc::new(MockVectorStore::new());
        let index = index_manager(store.clone(), &backends, &config);
        index
            .init(|| lawlens::corpus::ingest_dir(&config.data_dir))
            .await
            .expect("index init");

        let pipeline = QueryPipeline::from_config(&config, Arc::new(index), &backends)
            .expect("pipeline");

        Self {
            data_dir,
            persist_dir,
            store,
            generator,
            config,
            pipeline: Arc::new(pipeline),
        }
    }
}
