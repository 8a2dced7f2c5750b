use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_lawlens_env() {
    let keys: Vec<String> = env::vars()
        .map(|(k, _)| k)
        .filter(|k| k.starts_with("LAWLENS_"))
        .collect();
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in keys {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.data_dir, PathBuf::from("./data"));
    assert_eq!(config.persist_dir, PathBuf::from("./storage"));
    assert_eq!(config.collection_name, "chinese_labor_laws");
    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.top_k, 20);
    assert_eq!(config.rerank_top_n, 5);
    assert_eq!(config.min_rerank_score, 0.4);
    assert_eq!(config.retrieval_mode, RetrievalMode::Dense);
    assert_eq!(config.temperature, 0.3);
    assert!(config.embed_model_path.is_none());
    assert!(config.rerank_model_path.is_none());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_lawlens_env();

    let config = Config::from_env().expect("should parse with defaults");
    assert_eq!(config.top_k, 20);
    assert_eq!(config.retrieval_mode, RetrievalMode::Dense);
    assert!(config.llm_api_base.is_none());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_lawlens_env();

    let config = with_env_vars(
        &[
            ("LAWLENS_TOP_K", "10"),
            ("LAWLENS_RERANK_TOP_N", "3"),
            ("LAWLENS_MIN_RERANK_SCORE", "0.55"),
            ("LAWLENS_COLLECTION", "test_laws"),
            ("LAWLENS_LLM_API_BASE", "http://localhost:23333/v1"),
            ("LAWLENS_LLM_API_KEY", "fake"),
            ("LAWLENS_EVAL_CONCURRENCY", "2"),
        ],
        Config::from_env,
    )
    .unwrap();

    assert_eq!(config.top_k, 10);
    assert_eq!(config.rerank_top_n, 3);
    assert_eq!(config.min_rerank_score, 0.55);
    assert_eq!(config.collection_name, "test_laws");
    assert_eq!(config.llm_api_base.as_deref(), Some("http://localhost:23333/v1"));
    assert_eq!(config.llm_api_key.as_deref(), Some("fake"));
    assert_eq!(config.eval_concurrency, 2);
}

#[test]
#[serial]
fn test_hybrid_mode_from_env() {
    clear_lawlens_env();

    let config = with_env_vars(
        &[
            ("LAWLENS_RETRIEVAL_MODE", "Hybrid"),
            ("LAWLENS_HYBRID_ALPHA", "0.7"),
        ],
        Config::from_env,
    )
    .unwrap();
    assert_eq!(config.retrieval_mode, RetrievalMode::Hybrid { alpha: 0.7 });

    let default_alpha = with_env_vars(&[("LAWLENS_RETRIEVAL_MODE", "hybrid")], Config::from_env)
        .unwrap();
    assert_eq!(
        default_alpha.retrieval_mode,
        RetrievalMode::Hybrid { alpha: 0.5 }
    );
}

#[test]
#[serial]
fn test_invalid_retrieval_mode_rejected() {
    clear_lawlens_env();

    let err = with_env_vars(&[("LAWLENS_RETRIEVAL_MODE", "sparse")], Config::from_env)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            name: "LAWLENS_RETRIEVAL_MODE",
            ..
        }
    ));
}

#[test]
#[serial]
fn test_hybrid_alpha_out_of_range_rejected() {
    clear_lawlens_env();

    let result = with_env_vars(
        &[
            ("LAWLENS_RETRIEVAL_MODE", "hybrid"),
            ("LAWLENS_HYBRID_ALPHA", "1.5"),
        ],
        Config::from_env,
    );
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_unparseable_number_rejected() {
    clear_lawlens_env();

    let err = with_env_vars(&[("LAWLENS_TOP_K", "twenty")], Config::from_env).unwrap_err();
    match err {
        ConfigError::InvalidValue { name, value, .. } => {
            assert_eq!(name, "LAWLENS_TOP_K");
            assert_eq!(value, "twenty");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
#[serial]
fn test_model_paths_from_env() {
    clear_lawlens_env();

    let config = with_env_vars(
        &[
            ("LAWLENS_EMBED_MODEL_PATH", "/models/text2vec"),
            ("LAWLENS_RERANK_MODEL_PATH", "  "),
        ],
        Config::from_env,
    )
    .unwrap();

    assert_eq!(config.embed_model_path, Some(PathBuf::from("/models/text2vec")));
    assert!(config.rerank_model_path.is_none());
}

#[test]
fn test_validate_rerank_top_n_bounds() {
    let too_many = Config {
        top_k: 3,
        rerank_top_n: 5,
        ..Default::default()
    };
    assert!(matches!(
        too_many.validate(),
        Err(ConfigError::OutOfRange {
            name: "rerank_top_n",
            ..
        })
    ));

    let zero = Config {
        rerank_top_n: 0,
        ..Default::default()
    };
    assert!(zero.validate().is_err());
}

#[test]
fn test_validate_zero_top_k() {
    let config = Config {
        top_k: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { name: "top_k", .. })
    ));
}

#[test]
fn test_validate_non_finite_threshold() {
    let config = Config {
        min_rerank_score: f32::NAN,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_zero_eval_concurrency() {
    let config = Config {
        eval_concurrency: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_missing_model_path() {
    let config = Config {
        embed_model_path: Some(PathBuf::from("/nonexistent/encoder")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound {
            name: "embed_model_path",
            ..
        })
    ));
}

#[test]
fn test_validate_model_path_must_be_dir() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = Config {
        rerank_model_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_persist_dir_is_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = Config {
        persist_dir: file.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_benchmarks() {
    let dir = tempfile::tempdir().unwrap();
    let retrieval = dir.path().join("retrieval.json");
    std::fs::write(&retrieval, "[]").unwrap();

    let missing = Config {
        retrieval_benchmark: retrieval.clone(),
        e2e_benchmark: dir.path().join("missing.json"),
        ..Default::default()
    };
    assert!(matches!(
        missing.validate_benchmarks(),
        Err(ConfigError::PathNotFound {
            name: "e2e_benchmark",
            ..
        })
    ));

    let directory = Config {
        retrieval_benchmark: retrieval,
        e2e_benchmark: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(
        directory.validate_benchmarks(),
        Err(ConfigError::NotAFile { .. })
    ));
}

#[test]
fn test_derived_backend_configs() {
    let config = Config {
        llm_model: "qwen".to_string(),
        temperature: 0.1,
        ..Default::default()
    };

    assert!(config.encoder_config().testing_stub);
    assert!(config.reranker_config().model_path.is_none());
    assert_eq!(config.generator_config().model, "qwen");
    assert_eq!(config.generator_config().temperature, 0.1);

    let index = config.index_config(384);
    assert_eq!(index.embedding_dim, 384);
    assert_eq!(index.collection_name, "chinese_labor_laws");
}
