//! Question answering model configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extractive QA model configuration
///
/// The model is an ONNX export of a SQuAD-style span prediction model
/// together with its HuggingFace `tokenizer.json`:
///
/// ```toml
/// [model]
/// model_name = "roberta-base-squad2"
/// model_dir = ".pageqa/models"
/// ```
///
/// resolves to `.pageqa/models/roberta-base-squad2/{model.onnx,tokenizer.json}`
/// unless `model_path` / `tokenizer_path` are set explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name, also the directory name under `model_dir`
    pub model_name: String,
    /// Directory holding downloaded models
    pub model_dir: PathBuf,
    /// Path to the ONNX model file (optional)
    pub model_path: Option<PathBuf>,
    /// Path to the tokenizer file (optional)
    pub tokenizer_path: Option<PathBuf>,
    /// Maximum (question, context) pair length in tokens
    pub max_sequence_length: usize,
    /// Number of threads for inference
    pub num_threads: usize,
}

fn default_num_threads() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
        .min(8)
}

impl ModelConfig {
    /// Resolve model paths from the model directory if not explicitly set.
    pub fn resolve_paths(&mut self) {
        if self.model_path.is_some() && self.tokenizer_path.is_some() {
            return;
        }

        let model_dir = self.model_dir.join(&self.model_name);
        let model_file = model_dir.join("model.onnx");
        let tokenizer_file = model_dir.join("tokenizer.json");

        if model_file.exists() && self.model_path.is_none() {
            self.model_path = Some(model_file);
        }
        if tokenizer_file.exists() && self.tokenizer_path.is_none() {
            self.tokenizer_path = Some(tokenizer_file);
        }
    }

    /// Model file path, if resolved
    pub fn model_file(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Tokenizer file path, if resolved
    pub fn tokenizer_file(&self) -> Option<&Path> {
        self.tokenizer_path.as_deref()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: "roberta-base-squad2".to_string(),
            model_dir: PathBuf::from(".pageqa/models"),
            model_path: None,
            tokenizer_path: None,
            max_sequence_length: 512,
            num_threads: default_num_threads(),
        }
    }
}
