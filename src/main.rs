//! Lawlens CLI entrypoint.

use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use lawlens::config::Config;
use lawlens::corpus::ingest_dir;
use lawlens::evaluation::{
    EndToEndEvaluator, EvaluationSummary, RecallEvaluator, load_end_to_end_cases,
    load_retrieval_cases,
};
use lawlens::index::{IndexManager, IndexStatus};
use lawlens::pipeline::{Backends, QueryPipeline, QueryResponse};
use lawlens::text::truncate_chars;
use lawlens::vectordb::{QdrantStore, VectorStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const QUIT: &str = "q";
const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Qa,
    Eval,
}

impl Mode {
    fn from_args() -> anyhow::Result<Self> {
        match std::env::args().nth(1).as_deref() {
            None | Some("qa") => Ok(Self::Qa),
            Some("eval") => Ok(Self::Eval),
            Some(other) => anyhow::bail!("unknown mode '{other}', expected 'qa' or 'eval'"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mode = Mode::from_args()?;
    let config = Config::from_env()?;
    config.validate()?;
    if mode == Mode::Eval {
        config.validate_benchmarks()?;
    }

    tracing::info!(
        ?mode,
        collection = %config.collection_name,
        qdrant_url = %config.qdrant_url,
        retrieval_mode = %config.retrieval_mode,
        "Lawlens starting"
    );

    let backends = Backends::from_config(&config)?;

    let store = QdrantStore::new(&config.qdrant_url)?;
    store.health_check().await?;

    let index = IndexManager::new(
        store,
        backends.embedder.clone(),
        config.index_config(backends.embedder.embedding_dim()),
    )?;
    match index.init(|| ingest_dir(&config.data_dir)).await? {
        IndexStatus::Built { clauses } => tracing::info!(clauses, "Index built"),
        IndexStatus::Loaded { clauses } => tracing::info!(clauses, "Existing index loaded"),
    }

    let pipeline = Arc::new(QueryPipeline::from_config(
        &config,
        Arc::new(index),
        &backends,
    )?);

    match mode {
        Mode::Qa => run_qa(&pipeline).await,
        Mode::Eval => run_eval(&config, pipeline).await,
    }
}

async fn run_qa<V: VectorStore>(pipeline: &QueryPipeline<V>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout
            .write_all("\n请输入劳动法相关问题（输入q退出）: ".as_bytes())
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.eq_ignore_ascii_case(QUIT) {
            break;
        }
        if question.is_empty() {
            continue;
        }

        match pipeline.answer(question).await {
            Ok(response) => print_response(&response),
            Err(e) => {
                tracing::warn!(error = %e, "Query failed");
                println!("\n错误：{e}");
            }
        }
    }

    Ok(())
}

fn print_response(response: &QueryResponse) {
    if !response.is_answered() {
        println!("\n{}", response.display_answer());
        return;
    }

    for trace in response.reasoning() {
        println!("\n思考过程：\n{trace}");
    }
    println!("\n智能助手回答：\n{}", response.display_answer());

    println!("\n支持依据：");
    for (i, cited) in response.supporting.iter().enumerate() {
        let clause = cited.clause();
        println!("\n[{}] {}", i + 1, clause.full_title());
        println!("  来源文件：{}", clause.source_file());
        println!("  法律名称：{}", clause.law_name());
        println!("  初始相关度：{:.4}", cited.similarity());
        println!("  重排序得分：{:.4}", cited.rerank_score());
        println!(
            "  条款内容：{}...",
            truncate_chars(clause.text(), PREVIEW_CHARS)
        );
    }

    println!("\n总耗时：{:.2}秒", response.elapsed.as_secs_f64());
}

async fn run_eval<V: VectorStore>(
    config: &Config,
    pipeline: Arc<QueryPipeline<V>>,
) -> anyhow::Result<()> {
    let retrieval_cases = load_retrieval_cases(&config.retrieval_benchmark)?;
    let e2e_cases = load_end_to_end_cases(&config.e2e_benchmark)?;

    let recall = RecallEvaluator::new(pipeline.clone(), config.eval_concurrency)?
        .evaluate(&retrieval_cases)
        .await;
    let end_to_end = EndToEndEvaluator::new(pipeline, config.eval_concurrency)?
        .evaluate(&e2e_cases)
        .await;

    print!("{}", EvaluationSummary { recall, end_to_end });
    Ok(())
}
