//! Grounded answer synthesis.
//!
//! [`ResponseSynthesizer`] renders the cited clauses into a [`ChatPrompt`], calls a
//! [`Generator`] exactly once and separates reasoning traces from the final answer.

pub mod error;
pub mod generator;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prompt;
pub mod reasoning;
pub mod synthesizer;

#[cfg(test)]
mod tests;

pub use error::GenerationError;
pub use generator::{DEFAULT_LLM_MODEL, GenaiGenerator, Generator, GeneratorConfig};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerator;
pub use prompt::{ChatPrompt, SYSTEM_INSTRUCTIONS};
pub use reasoning::{ReasonedText, THINK_CLOSE, THINK_OPEN, split_reasoning};
pub use synthesizer::{ResponseSynthesizer, SynthesizedAnswer};
