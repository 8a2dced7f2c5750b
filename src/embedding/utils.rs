use std::io;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

/// Files a BERT-family model directory must contain.
pub const REQUIRED_MODEL_FILES: [&str; 3] = ["config.json", "model.safetensors", "tokenizer.json"];

/// Returns the first required file missing from `model_dir`, if any.
pub fn missing_model_file(model_dir: &Path) -> Option<&'static str> {
    REQUIRED_MODEL_FILES
        .into_iter()
        .find(|name| !model_dir.join(name).exists())
}

/// Loads `tokenizer.json` from a model directory with truncation at `max_len` tokens.
///
/// Both the sentence encoder and the cross-encoder have fixed position-embedding tables, so
/// inputs are always truncated rather than rejected.
pub fn load_truncating_tokenizer(model_dir: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer =
        Tokenizer::from_file(model_dir.join("tokenizer.json")).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}
