//! Benchmark evaluation over JSON benchmark files.

mod common;

use common::fixtures::Harness;
use lawlens::evaluation::{
    EndToEndEvaluator, EvaluationSummary, RecallEvaluator, load_end_to_end_cases,
    load_retrieval_cases,
};
use lawlens::generation::MockGenerator;

const RETRIEVAL_BENCHMARK: &str = r#"[
  {"question": "试用期最长多久？", "relevant_ids": ["中华人民共和国劳动合同法 第十九条"]},
  {"question": "没有标注的问题", "relevant_ids": []},
  {"question": "加班工资怎么算？",
   "relevant_ids": ["labor_law.json::中华人民共和国劳动法 第四十四条", "不存在的条款"]}
]"#;

const E2E_BENCHMARK: &str = r#"[
  {"question": "案例一 试用期", "standard_answer": {"条款": ["中华人民共和国劳动合同法 第十九条"], "标准结论": "一个月"}},
  {"question": "案例二 加班工资", "standard_answer": {"条款": ["中华人民共和国劳动法 第四十四条"]}},
  {"question": "案例三 失败", "standard_answer": {"条款": ["中华人民共和国劳动法 第三十六条"]}},
  {"question": "案例四 社会保险", "standard_answer": {"required_clauses": ["中华人民共和国劳动法 第七十条"]}},
  {"question": "案例五 书面合同", "standard_answer": {"clauses": ["中华人民共和国劳动合同法 第十条"]}}
]"#;

#[tokio::test]
async fn test_recall_evaluation_from_file() {
    let harness = Harness::new(MockGenerator::constant("答")).await;
    let path = harness.data_dir.path().join("retrieval_benchmark.txt");
    std::fs::write(&path, RETRIEVAL_BENCHMARK).unwrap();

    let cases = load_retrieval_cases(&path).unwrap();
    let report = RecallEvaluator::new(harness.pipeline.clone(), 2)
        .unwrap()
        .evaluate(&cases)
        .await;

    assert_eq!(report.total(), 3);
    assert!(report.failures.is_empty());
    assert_eq!(report.cases[1].recall, 0.0);
    assert!(report.cases[2].recall <= 0.5);
    for case in &report.cases {
        assert!((0.0..=1.0).contains(&case.recall));
        assert!(case.reranked_titles.len() <= harness.config.rerank_top_n);
        assert_eq!(case.initial_titles.len(), harness.config.top_k);
    }
    assert!((0.0..=1.0).contains(&report.mean_recall()));
}

#[tokio::test]
async fn test_end_to_end_one_failure_in_five() {
    let harness = Harness::new(MockGenerator::constant("答").failing_when("案例三")).await;
    let path = harness.data_dir.path().join("e2e_benchmark.txt");
    std::fs::write(&path, E2E_BENCHMARK).unwrap();

    let cases = load_end_to_end_cases(&path).unwrap();
    let report = EndToEndEvaluator::new(harness.pipeline.clone(), 2)
        .unwrap()
        .evaluate(&cases)
        .await;

    assert_eq!(report.success_count(), 4);
    assert_eq!(report.total(), 5);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 3);
    assert_eq!(report.failures[0].question, "案例三 失败");

    let questions: Vec<&str> = report.cases.iter().map(|c| c.question.as_str()).collect();
    assert_eq!(
        questions,
        ["案例一 试用期", "案例二 加班工资", "案例四 社会保险", "案例五 书面合同"]
    );

    let expected_mean =
        report.cases.iter().map(|c| c.clause_score).sum::<f64>() / 4.0;
    assert!((report.mean_hit_rate() - expected_mean).abs() < 1e-12);

    let summary = EvaluationSummary {
        recall: Default::default(),
        end_to_end: report,
    };
    let printed = summary.to_string();
    assert!(printed.contains("有效评估案例：4/5"));
    assert!(printed.contains("案例3：案例三 失败 评估失败"));
}
