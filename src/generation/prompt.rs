use std::fmt::Write;

use crate::scoring::RankedCandidate;

/// Fixed instructions constraining the model to law-grounded, cited answers.
pub const SYSTEM_INSTRUCTIONS: &str = "您是中国劳动法领域专业助手，必须严格遵循以下规则：\n\
1.仅使用提供的法律条文回答问题\n\
2.若问题与劳动法无关或超出知识库范围，明确告知无法回答\n\
3.引用条文时标注出处";

/// A two-message chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

impl ChatPrompt {
    /// Builds the prompt from the cited clauses and the question.
    ///
    /// Each clause is rendered as `[fullTitle] text`, in the order given.
    pub fn build(question: &str, clauses: &[RankedCandidate]) -> Self {
        let mut context = String::new();
        for (i, ranked) in clauses.iter().enumerate() {
            if i > 0 {
                context.push('\n');
            }
            let clause = ranked.clause();
            let _ = write!(context, "[{}] {}", clause.full_title(), clause.text());
        }

        let system = format!(
            "{SYSTEM_INSTRUCTIONS}\n\n可用法律条文（共{}条）：\n{context}",
            clauses.len()
        );

        Self {
            system,
            user: format!("问题：{question}"),
        }
    }

    /// Renders the prompt as a single ChatML document ending at the assistant turn.
    pub fn to_chatml(&self) -> String {
        format!(
            "<|im_start|>system\n{}\n<|im_end|>\n<|im_start|>user\n{}<|im_end|>\n<|im_start|>assistant\n",
            self.system, self.user
        )
    }
}
