use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the generation backend and the response synthesizer.
pub enum GenerationError {
    /// Synthesis was invoked without any supporting clause.
    #[error("no clauses supplied to the synthesizer")]
    EmptyContext,

    /// The backend request failed.
    #[error("generation request to '{model}' failed: {reason}")]
    RequestFailed {
        /// Model name.
        model: String,
        /// Error message.
        reason: String,
    },

    /// The backend answered without any text.
    #[error("model '{model}' returned an empty response")]
    EmptyResponse {
        /// Model name.
        model: String,
    },

    /// Invalid generator configuration.
    #[error("invalid generator configuration: {reason}")]
    InvalidConfig {
        /// Error message.
        reason: String,
    },
}
