use std::fmt;

/// Recall diagnostics for one retrieval case.
#[derive(Debug, Clone, PartialEq)]
pub struct RecallCase {
    pub question: String,
    /// Full titles from the retrieval stage, best first.
    pub initial_titles: Vec<String>,
    /// Full titles after reranking, best first.
    pub reranked_titles: Vec<String>,
    pub targets: Vec<String>,
    pub recall: f64,
}

/// Clause hit diagnostics for one end-to-end case.
#[derive(Debug, Clone, PartialEq)]
pub struct EndToEndCaseResult {
    pub question: String,
    pub hit_clauses: Vec<String>,
    pub missed_clauses: Vec<String>,
    pub clause_score: f64,
    /// Whether any clause cleared the threshold and an answer was generated.
    pub answered: bool,
}

/// A case that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    /// 1-based position in the benchmark file.
    pub index: usize,
    pub question: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecallReport {
    pub cases: Vec<RecallCase>,
    pub failures: Vec<CaseFailure>,
}

impl RecallReport {
    pub fn total(&self) -> usize {
        self.cases.len() + self.failures.len()
    }

    /// Mean recall over evaluated cases; 0.0 when none were.
    pub fn mean_recall(&self) -> f64 {
        mean(self.cases.iter().map(|c| c.recall))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndToEndReport {
    pub cases: Vec<EndToEndCaseResult>,
    pub failures: Vec<CaseFailure>,
}

impl EndToEndReport {
    pub fn total(&self) -> usize {
        self.cases.len() + self.failures.len()
    }

    pub fn success_count(&self) -> usize {
        self.cases.len()
    }

    /// Mean clause hit-rate over successful cases only; 0.0 when none succeeded.
    pub fn mean_hit_rate(&self) -> f64 {
        mean(self.cases.iter().map(|c| c.clause_score))
    }
}

/// Both evaluations of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    pub recall: RecallReport,
    pub end_to_end: EndToEndReport,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

struct Percent(f64);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

fn write_failures(f: &mut fmt::Formatter<'_>, failures: &[CaseFailure]) -> fmt::Result {
    for failure in failures {
        writeln!(
            f,
            "案例{}：{} 评估失败（{}）",
            failure.index, failure.question, failure.error
        )?;
    }
    Ok(())
}

impl fmt::Display for RecallCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "问题：{}", self.question)?;
        writeln!(f, "初始检索结果：{:?}", self.initial_titles)?;
        writeln!(f, "重排序后结果：{:?}", self.reranked_titles)?;
        writeln!(f, "目标条款：{:?}", self.targets)?;
        writeln!(f, "召回率：{}", Percent(self.recall))
    }
}

impl fmt::Display for EndToEndCaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "问题：{}", self.question)?;
        writeln!(f, "命中条款：{:?}", self.hit_clauses)?;
        writeln!(f, "缺失条款：{:?}", self.missed_clauses)?;
        writeln!(f, "条款命中率：{}", Percent(self.clause_score))
    }
}

impl fmt::Display for RecallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            writeln!(f, "{case}")?;
        }
        write_failures(f, &self.failures)?;
        writeln!(f, "有效评估案例：{}/{}", self.cases.len(), self.total())?;
        writeln!(f, "平均召回率：{}", Percent(self.mean_recall()))
    }
}

impl fmt::Display for EndToEndReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            writeln!(f, "{case}")?;
        }
        writeln!(f, "有效评估案例：{}/{}", self.success_count(), self.total())?;
        writeln!(f, "平均条款命中率：{}", Percent(self.mean_hit_rate()))?;
        write_failures(f, &self.failures)
    }
}

impl fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== 召回率评估 ===")?;
        writeln!(f, "{}", self.recall)?;
        writeln!(f, "=== 端到端评估 ===")?;
        writeln!(f, "{}", self.end_to_end)?;
        writeln!(f, "=== 最终评估报告 ===")?;
        writeln!(f, "重排序召回率：{}", Percent(self.recall.mean_recall()))?;
        writeln!(
            f,
            "端到端条款命中率：{}",
            Percent(self.end_to_end.mean_hit_rate())
        )
    }
}
