use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;
use std::sync::Arc;

/// Checkpoints from different toolchains nest the encoder under different prefixes.
const ENCODER_PREFIXES: [&str; 2] = ["bert", "roberta"];

fn open_checkpoint(model_dir: &Path, device: &Device) -> Result<(Config, VarBuilder<'static>)> {
    let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
    let config: Config = serde_json::from_str(&config_content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

    let weights_path = model_dir.join("model.safetensors");
    let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

    Ok((config, vb))
}

fn load_encoder(vb: &VarBuilder, config: &Config) -> Result<BertModel> {
    for prefix in ENCODER_PREFIXES {
        if vb.contains_tensor(&format!("{prefix}.embeddings.word_embeddings.weight")) {
            return BertModel::load(vb.pp(prefix), config);
        }
    }
    BertModel::load(vb.clone(), config)
}

/// Sentence encoder: BERT last hidden state, mean-pooled over non-padding tokens.
#[derive(Clone)]
pub struct BertSentenceModel {
    bert: Arc<BertModel>,
    hidden_size: usize,
}

impl BertSentenceModel {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let (config, vb) = open_checkpoint(model_dir.as_ref(), device)?;
        let bert = load_encoder(&vb, &config)?;

        Ok(Self {
            bert: Arc::new(bert),
            hidden_size: config.hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Returns the pooled `[batch, hidden]` sentence representation.
    pub fn forward_pooled(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, Some(attention_mask))?;

        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9f32, f32::MAX)?;
        summed.broadcast_div(&counts)
    }
}

struct CrossEncoderHead {
    bert: BertModel,
    classifier: Linear,
}

/// Sequence-pair classifier with a single relevance logit (cross-encoder reranker).
#[derive(Clone)]
pub struct BertClassifier(Arc<CrossEncoderHead>);

impl BertClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let (config, vb) = open_checkpoint(model_dir.as_ref(), device)?;
        let bert = load_encoder(&vb, &config)?;
        let classifier = candle_nn::linear(config.hidden_size, 1, vb.pp("classifier"))?;

        Ok(Self(Arc::new(CrossEncoderHead { bert, classifier })))
    }

    /// Returns raw `[batch, 1]` logits computed from the CLS token.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .0
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        self.0.classifier.forward(&cls_token)
    }
}
