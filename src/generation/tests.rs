use std::sync::Arc;

use super::*;
use crate::corpus::ClauseRecord;
use crate::retrieval::Candidate;
use crate::scoring::RankedCandidate;

fn ranked(title: &str, text: &str, ordinal: u64) -> RankedCandidate {
    RankedCandidate::new(
        Candidate::new(
            Arc::new(ClauseRecord::new("labor.json", title, text, ordinal)),
            0.8,
        ),
        0.9,
    )
}

fn cited() -> Vec<RankedCandidate> {
    vec![
        ranked("劳动法 第四十四条", "安排劳动者延长工作时间的，支付不低于工资的百分之一百五十的工资报酬。", 0),
        ranked("劳动法 第三十六条", "劳动者每日工作时间不超过八小时。", 1),
    ]
}

#[test]
fn test_split_no_markers() {
    let split = split_reasoning("  依据劳动法第四十四条，应支付加班费。 ");
    assert_eq!(split.answer, "依据劳动法第四十四条，应支付加班费。");
    assert!(split.reasoning.is_empty());
}

#[test]
fn test_split_single_block() {
    let split = split_reasoning("<think>先找条文</think>\n答案在此");
    assert_eq!(split.answer, "答案在此");
    assert_eq!(split.reasoning, vec!["先找条文"]);
}

#[test]
fn test_split_multiple_blocks_multiline() {
    let raw = "<think>第一步\n检索</think>部分一<think>\n第二步\n</think>部分二";
    let split = split_reasoning(raw);

    assert_eq!(split.answer, "部分一部分二");
    assert_eq!(split.reasoning, vec!["第一步\n检索", "第二步"]);
}

#[test]
fn test_split_is_non_greedy() {
    let split = split_reasoning("<think>a</think>middle<think>b</think>");
    assert_eq!(split.answer, "middle");
    assert_eq!(split.reasoning.len(), 2);
}

#[test]
fn test_split_unclosed_opener() {
    let split = split_reasoning("答案<think>未完成的推理");
    assert_eq!(split.answer, "答案");
    assert_eq!(split.reasoning, vec!["未完成的推理"]);
}

#[test]
fn test_split_stray_closer() {
    let split = split_reasoning("模型先推理一番</think>\n\n最终答案");
    assert_eq!(split.answer, "最终答案");
    assert_eq!(split.reasoning, vec!["模型先推理一番"]);
}

#[test]
fn test_split_answer_never_contains_markers() {
    for raw in [
        "<think><think>x</think>y",
        "</think></think>z",
        "a<think>b</think>c<think>d",
        "<think></think>",
    ] {
        let split = split_reasoning(raw);
        assert!(!split.answer.contains(THINK_OPEN), "{raw}");
        assert!(!split.answer.contains(THINK_CLOSE), "{raw}");
    }
}

#[test]
fn test_split_empty_block_yields_no_trace() {
    let split = split_reasoning("<think>  </think>答案");
    assert!(split.reasoning.is_empty());
    assert_eq!(split.answer, "答案");
}

#[test]
fn test_prompt_lists_clauses_with_citation_keys() {
    let prompt = ChatPrompt::build("加班费怎么算？", &cited());

    assert!(prompt.system.starts_with(SYSTEM_INSTRUCTIONS));
    assert!(prompt.system.contains("可用法律条文（共2条）"));
    assert!(prompt.system.contains("[劳动法 第四十四条] 安排劳动者延长工作时间"));
    assert!(prompt.system.contains("[劳动法 第三十六条] 劳动者每日工作时间"));
    assert_eq!(prompt.user, "问题：加班费怎么算？");

    let first = prompt.system.find("第四十四条").unwrap();
    let second = prompt.system.find("第三十六条").unwrap();
    assert!(first < second);
}

#[test]
fn test_prompt_chatml_rendering() {
    let chatml = ChatPrompt::build("q", &cited()).to_chatml();
    assert!(chatml.starts_with("<|im_start|>system\n"));
    assert!(chatml.contains("<|im_start|>user\n问题：q<|im_end|>"));
    assert!(chatml.ends_with("<|im_start|>assistant\n"));
}

#[tokio::test]
async fn test_synthesize_splits_reasoning() {
    let generator = MockGenerator::constant("<think>查找第四十四条</think>应支付百分之一百五十的工资。");
    let synthesizer = ResponseSynthesizer::new(Arc::new(generator.clone()));

    let result = synthesizer.synthesize("加班费", &cited()).await.unwrap();

    assert_eq!(result.answer, "应支付百分之一百五十的工资。");
    assert_eq!(result.reasoning, vec!["查找第四十四条"]);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_synthesize_passes_prompt_to_generator() {
    let generator = MockGenerator::from_fn(|prompt| prompt.user.clone());
    let synthesizer = ResponseSynthesizer::new(Arc::new(generator));

    let result = synthesizer.synthesize("试用期", &cited()).await.unwrap();
    assert_eq!(result.answer, "问题：试用期");
}

#[tokio::test]
async fn test_synthesize_empty_context_skips_backend() {
    let generator = MockGenerator::constant("unused");
    let synthesizer = ResponseSynthesizer::new(Arc::new(generator.clone()));

    let err = synthesizer.synthesize("q", &[]).await.unwrap_err();
    assert!(matches!(err, GenerationError::EmptyContext));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_synthesize_backend_failure_surfaces() {
    let generator = MockGenerator::constant("ok").failing_when("坏问题");
    let synthesizer = ResponseSynthesizer::new(Arc::new(generator));

    assert!(synthesizer.synthesize("好问题", &cited()).await.is_ok());
    let err = synthesizer.synthesize("坏问题", &cited()).await.unwrap_err();
    assert!(matches!(err, GenerationError::RequestFailed { .. }));
}

#[test]
fn test_generator_config_validation() {
    assert!(GeneratorConfig::default().validate().is_ok());

    let blank = GeneratorConfig {
        model: " ".to_string(),
        ..Default::default()
    };
    assert!(blank.validate().is_err());

    let hot = GeneratorConfig {
        temperature: 5.0,
        ..Default::default()
    };
    assert!(hot.validate().is_err());
}

#[test]
fn test_genai_generator_constructs_with_custom_endpoint() {
    let config = GeneratorConfig {
        api_base: Some("http://localhost:23333/v1/".to_string()),
        api_key: Some("fake".to_string()),
        ..Default::default()
    };
    let generator = GenaiGenerator::new(config).unwrap();
    assert_eq!(generator.config().model, DEFAULT_LLM_MODEL);
}
