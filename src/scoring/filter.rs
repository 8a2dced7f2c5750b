use super::types::RankedCandidate;

/// Drops ranked candidates whose rerank score does not strictly exceed `min_score`.
///
/// Order-preserving and side-effect free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceFilter {
    min_score: f32,
}

impl RelevanceFilter {
    pub fn new(min_score: f32) -> Self {
        Self { min_score }
    }

    pub fn min_score(&self) -> f32 {
        self.min_score
    }

    pub fn apply(&self, ranked: &[RankedCandidate]) -> Vec<RankedCandidate> {
        ranked
            .iter()
            .filter(|r| r.exceeds_threshold(self.min_score))
            .cloned()
            .collect()
    }
}
