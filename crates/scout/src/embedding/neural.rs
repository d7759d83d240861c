//! ONNX sentence-transformer embedder (all-MiniLM-L6-v2).
//!
//! Model and tokenizer files are fetched from the HuggingFace hub on
//! first use and cached by hf-hub. The session is initialized lazily so
//! store handles can be constructed without paying the model load.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hf_hub::api::tokio::Api;
use ndarray::Array2;
use std::collections::HashMap;
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use ort::{
  execution_providers::{CPUExecutionProvider, ExecutionProviderDispatch},
  session::Session,
  value::Value,
};

use super::{mean_pool, normalize, Embedder, EMBEDDING_DIM};

const MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";
const TOKENIZER_FILE: &str = "tokenizer.json";
const MODEL_FILE: &str = "onnx/model.onnx";

// MiniLM accepts 512 positions; longer topics are unusual enough to
// warrant a warning rather than a hard failure.
const MAX_SEQUENCE_LENGTH: usize = 512;

/// Lazily initialized ONNX embedding model.
pub struct NeuralEmbedder {
  model: Mutex<Option<MiniLmModel>>,
}

impl NeuralEmbedder {
  pub fn new() -> Self {
    Self { model: Mutex::new(None) }
  }
}

impl Default for NeuralEmbedder {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Embedder for NeuralEmbedder {
  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    let mut guard = self.model.lock().await;

    if guard.is_none() {
      herald::info!("initializing embedding model...");
      *guard = Some(MiniLmModel::load().await?);
    }

    let model = guard.as_mut().ok_or_else(|| anyhow!("embedding model not initialized"))?;
    model.embed(text)
  }

  fn dimension(&self) -> usize {
    EMBEDDING_DIM
  }
}

struct MiniLmModel {
  session: Session,
  tokenizer: Tokenizer,
}

impl MiniLmModel {
  /// Download (or reuse the hub cache for) the model files and build
  /// the ONNX session.
  async fn load() -> Result<Self> {
    let api = Api::new().map_err(|e| anyhow!("HF hub API initialization failed: {}", e))?;
    let repo = api.model(MODEL_REPO.to_string());

    let tokenizer_file = repo
      .get(TOKENIZER_FILE)
      .await
      .map_err(|e| anyhow!("failed to download tokenizer: {}", e))?;
    let model_file =
      repo.get(MODEL_FILE).await.map_err(|e| anyhow!("failed to download ONNX model: {}", e))?;

    let tokenizer =
      Tokenizer::from_file(tokenizer_file).map_err(|e| anyhow!("failed to load tokenizer: {}", e))?;

    let providers: Vec<ExecutionProviderDispatch> = vec![CPUExecutionProvider::default().into()];
    let session =
      Session::builder()?.with_execution_providers(providers)?.commit_from_file(model_file)?;

    Ok(Self { session, tokenizer })
  }

  fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
    let encoding =
      self.tokenizer.encode(text, true).map_err(|e| anyhow!("tokenization failed: {}", e))?;

    let token_count = encoding.get_ids().len();
    if token_count > MAX_SEQUENCE_LENGTH {
      herald::warn!(&format!("topic tokenized to {token_count} tokens, beyond the model limit"));
    }

    let input = Self::prepare_inputs(
      encoding.get_ids(),
      encoding.get_attention_mask(),
      encoding.get_type_ids(),
      &self.input_names(),
    )?;

    let output = self.session.run(input)?;
    let tensor = output
      .get("last_hidden_state")
      .or_else(|| output.get("0"))
      .ok_or_else(|| anyhow!("no hidden-state output found on the model"))?;

    let (shape, data) = tensor.try_extract_tensor::<f32>()?;
    let pooled = mean_pool(shape.as_ref(), data)?;
    Ok(normalize(pooled))
  }

  fn input_names(&self) -> Vec<String> {
    self.session.inputs.iter().map(|input| input.name.to_string()).collect()
  }

  /// Assemble the input tensor map, feeding token type ids only when
  /// the exported graph declares them.
  fn prepare_inputs(
    ids: &[u32],
    attention_mask: &[u32],
    type_ids: &[u32],
    model_input_names: &[String],
  ) -> Result<HashMap<String, Value>> {
    let mut input = HashMap::new();
    input.insert("input_ids".to_string(), Self::to_tensor(ids)?);
    input.insert("attention_mask".to_string(), Self::to_tensor(attention_mask)?);

    if model_input_names.iter().any(|name| name == "token_type_ids") {
      input.insert("token_type_ids".to_string(), Self::to_tensor(type_ids)?);
    }

    Ok(input)
  }

  fn to_tensor(values: &[u32]) -> Result<Value> {
    let as_i64: Vec<i64> = values.iter().map(|&x| i64::from(x)).collect();
    let array: Array2<i64> = Array2::from_shape_vec((1, values.len()), as_i64)?;
    let tensor: Value = Value::from_array(array)?.into();
    Ok(tensor)
  }
}
