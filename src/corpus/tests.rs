use super::*;
use serde_json::json;
use std::collections::HashSet;
use std::fs;

fn write_corpus(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, content) in files {
        fs::write(dir.path().join(name), content).expect("write corpus file");
    }
    dir
}

#[test]
fn test_single_clause_identifier_and_metadata() {
    let dir = write_corpus(&[("labor.json", r#"[{"劳动法 第十条": "国家鼓励劳动者就业。"}]"#)]);

    let clauses = ingest_dir(dir.path()).expect("should ingest");

    assert_eq!(clauses.len(), 1);
    let clause = &clauses[0];
    assert_eq!(clause.id(), "labor.json::劳动法 第十条");
    assert_eq!(clause.law_name(), "劳动法");
    assert_eq!(clause.article_label(), "第十条");
    assert_eq!(clause.full_title(), "劳动法 第十条");
    assert_eq!(clause.source_file(), "labor.json");
    assert_eq!(clause.metadata().content_type, "legal_article");
    assert_eq!(clause.text(), "国家鼓励劳动者就业。");
}

#[test]
fn test_title_without_whitespace_gets_unknown_article() {
    let (law, article) = split_title("劳动合同法");
    assert_eq!(law, "劳动合同法");
    assert_eq!(article, "unknown");
}

#[test]
fn test_title_splits_on_first_whitespace_only() {
    let (law, article) = split_title("劳动合同法 第三十九条 第一款");
    assert_eq!(law, "劳动合同法");
    assert_eq!(article, "第三十九条 第一款");
}

#[test]
fn test_identifiers_are_deterministic_across_runs() {
    let dir = write_corpus(&[
        (
            "b_contract.json",
            r#"[{"劳动合同法 第十九条": "试用期", "劳动合同法 第二十条": "工资"}]"#,
        ),
        ("a_labor.json", r#"[{"劳动法 第三十六条": "工时"}, {"劳动法 第四十四条": "加班"}]"#),
    ]);

    let first: HashSet<String> = ingest_dir(dir.path())
        .unwrap()
        .iter()
        .map(|c| c.id().to_string())
        .collect();
    let second: HashSet<String> = ingest_dir(dir.path())
        .unwrap()
        .iter()
        .map(|c| c.id().to_string())
        .collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn test_ordinals_follow_file_name_order() {
    let dir = write_corpus(&[
        ("b.json", r#"[{"乙法 第一条": "b"}]"#),
        ("a.json", r#"[{"甲法 第一条": "a"}]"#),
    ]);

    let clauses = ingest_dir(dir.path()).unwrap();
    assert_eq!(clauses[0].source_file(), "a.json");
    assert_eq!(clauses[0].ordinal(), 0);
    assert_eq!(clauses[1].source_file(), "b.json");
    assert_eq!(clauses[1].ordinal(), 1);
}

#[test]
fn test_ordinals_follow_key_order_within_record() {
    let dir = write_corpus(&[(
        "labor.json",
        r#"[{"Z法 第一条": "first", "A法 第二条": "second"}, {"M法 第三条": "third"}]"#,
    )]);

    let clauses = ingest_dir(dir.path()).unwrap();
    let order: Vec<(&str, u64)> = clauses
        .iter()
        .map(|c| (c.full_title(), c.ordinal()))
        .collect();
    assert_eq!(
        order,
        vec![("Z法 第一条", 0), ("A法 第二条", 1), ("M法 第三条", 2)]
    );
}

#[test]
fn test_non_json_files_are_ignored() {
    let dir = write_corpus(&[
        ("notes.txt", "not a corpus file"),
        ("labor.json", r#"[{"劳动法 第一条": "text"}]"#),
    ]);

    let docs = load_documents(dir.path()).unwrap();
    assert_eq!(docs.len(), 1);
}

#[test]
fn test_empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_documents(dir.path()).unwrap_err();
    assert!(matches!(err, IngestionError::NoDocuments { .. }));
}

#[test]
fn test_missing_directory_fails_with_io() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent");
    let err = load_documents(&missing).unwrap_err();
    assert!(matches!(err, IngestionError::Io { .. }));
}

#[test]
fn test_non_array_root_names_file() {
    let dir = write_corpus(&[("bad.json", r#"{"劳动法 第一条": "text"}"#)]);
    let err = load_documents(dir.path()).unwrap_err();
    match err {
        IngestionError::InvalidRoot { file } => assert_eq!(file, "bad.json"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_non_object_record_rejected() {
    let err = parse_documents("bad.json", json!([{"a b": "ok"}, "oops"])).unwrap_err();
    match err {
        IngestionError::InvalidRecord { file, index } => {
            assert_eq!(file, "bad.json");
            assert_eq!(index, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_non_string_value_rejected() {
    let err = parse_documents("bad.json", json!([{"劳动法 第一条": 42}])).unwrap_err();
    match err {
        IngestionError::NonStringValue { file, key } => {
            assert_eq!(file, "bad.json");
            assert_eq!(key, "劳动法 第一条");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_json_is_parse_error() {
    let dir = write_corpus(&[("broken.json", "[{")]);
    let err = load_documents(dir.path()).unwrap_err();
    assert!(matches!(err, IngestionError::Parse { ref file, .. } if file == "broken.json"));
}

#[test]
fn test_bad_file_is_not_skipped() {
    let dir = write_corpus(&[
        ("a.json", r#"[{"劳动法 第一条": "ok"}]"#),
        ("b.json", r#"[{"劳动法 第二条": ["not", "a", "string"]}]"#),
    ]);
    assert!(ingest_dir(dir.path()).is_err());
}

#[test]
fn test_duplicate_identifier_is_fatal() {
    let docs = vec![
        SourceDocument::new("a.json", vec![("劳动法 第一条".into(), "x".into())]),
        SourceDocument::new("a.json", vec![("劳动法 第一条".into(), "y".into())]),
    ];
    let err = extract_clauses(&docs).unwrap_err();
    assert!(matches!(err, IngestionError::DuplicateClause { ref id } if id == "a.json::劳动法 第一条"));
}

#[test]
fn test_same_title_in_different_files_is_allowed() {
    let docs = vec![
        SourceDocument::new("a.json", vec![("劳动法 第一条".into(), "x".into())]),
        SourceDocument::new("b.json", vec![("劳动法 第一条".into(), "y".into())]),
    ];
    let clauses = extract_clauses(&docs).unwrap();
    assert_eq!(clauses.len(), 2);
}

#[test]
fn test_empty_records_yield_empty_corpus_error() {
    let docs = vec![SourceDocument::new("a.json", vec![])];
    assert!(matches!(
        extract_clauses(&docs),
        Err(IngestionError::EmptyCorpus)
    ));
}

#[test]
fn test_matches_label_accepts_id_or_title() {
    let clause = ClauseRecord::new("labor.json", "劳动法 第十条", "text", 0);
    assert!(clause.matches_label("labor.json::劳动法 第十条"));
    assert!(clause.matches_label("劳动法 第十条"));
    assert!(!clause.matches_label("劳动法 第十一条"));
}
