//! ONNX Runtime span model
//!
//! Runs a SQuAD-style extractive QA export (e.g. roberta-base-squad2) and
//! returns its start/end logits for a single encoded pair.

use std::fmt;
use std::path::Path;

use ndarray::Axis;
use ort::{execution_providers::CPUExecutionProvider, session::Session, value::Tensor};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::traits::{PairEncoding, QaError, QaResult, SpanLogits, SpanModel};

/// Extractive QA model backed by an ONNX session
pub struct OnnxSpanModel {
    session: Mutex<Session>,
    name: String,
    /// BERT-style exports take segment ids, RoBERTa exports do not
    uses_token_type_ids: bool,
}

impl fmt::Debug for OnnxSpanModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxSpanModel")
            .field("name", &self.name)
            .field("uses_token_type_ids", &self.uses_token_type_ids)
            .finish()
    }
}

impl OnnxSpanModel {
    /// Load the model file
    pub fn from_file(
        model_path: impl AsRef<Path>,
        name: impl Into<String>,
        num_threads: usize,
    ) -> QaResult<Self> {
        let model_path = model_path.as_ref();
        let name = name.into();
        info!("Loading QA model {} from {}", name, model_path.display());

        let session = Session::builder()
            .and_then(|b| b.with_execution_providers([CPUExecutionProvider::default().build()]))
            .and_then(|b| b.with_intra_threads(num_threads))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| QaError::ModelNotFound(format!("Failed to load QA model: {}", e)))?;

        let uses_token_type_ids = session.inputs.iter().any(|i| i.name == "token_type_ids");
        debug!(
            "QA model inputs: {:?}",
            session.inputs.iter().map(|i| i.name.as_str()).collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            name,
            uses_token_type_ids,
        })
    }
}

fn inference_error(e: impl fmt::Display) -> QaError {
    QaError::Inference(e.to_string())
}

/// Row 0 of a `[1, seq_len]` logits tensor
fn first_row(shape: &[usize], data: &[f32]) -> QaResult<Vec<f32>> {
    let view = ndarray::ArrayViewD::from_shape(shape, data).map_err(inference_error)?;
    if view.ndim() < 2 {
        return Ok(view.iter().copied().collect());
    }
    Ok(view.index_axis(Axis(0), 0).iter().copied().collect())
}

impl SpanModel for OnnxSpanModel {
    fn predict(&self, encoding: &PairEncoding) -> QaResult<SpanLogits> {
        if encoding.is_empty() {
            return Ok(SpanLogits::default());
        }

        let shape = [1, encoding.len()];
        let to_i64 = |v: &[u32]| v.iter().map(|&x| x as i64).collect::<Vec<i64>>();
        let input_ids = Tensor::from_array((shape, to_i64(&encoding.ids))).map_err(inference_error)?;
        let attention_mask =
            Tensor::from_array((shape, to_i64(&encoding.attention_mask))).map_err(inference_error)?;

        // Copy outputs out while the session is locked
        let outputs: Vec<(String, Vec<usize>, Vec<f32>)> = {
            let mut session = self.session.lock();
            let outputs = if self.uses_token_type_ids {
                let token_type_ids =
                    Tensor::from_array((shape, to_i64(&encoding.type_ids))).map_err(inference_error)?;
                session.run(ort::inputs![
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask,
                    "token_type_ids" => token_type_ids,
                ])
            } else {
                session.run(ort::inputs![
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask,
                ])
            }
            .map_err(inference_error)?;

            let mut copied = Vec::new();
            for (name, value) in outputs.iter() {
                let arr = value.try_extract_array::<f32>().map_err(inference_error)?;
                copied.push((name.to_string(), arr.shape().to_vec(), arr.iter().copied().collect()));
            }
            copied
        };

        let by_name = |wanted: &str| outputs.iter().position(|(name, _, _)| name == wanted);
        let (start_idx, end_idx) = match (by_name("start_logits"), by_name("end_logits")) {
            (Some(s), Some(e)) => (s, e),
            _ if outputs.len() >= 2 => (0, 1),
            _ => {
                return Err(QaError::Inference(format!(
                    "expected start and end logits, model returned {} outputs",
                    outputs.len()
                )))
            }
        };

        let (_, start_shape, start_data) = &outputs[start_idx];
        let (_, end_shape, end_data) = &outputs[end_idx];
        Ok(SpanLogits {
            start: first_row(start_shape, start_data)?,
            end: first_row(end_shape, end_data)?,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_row_of_batch() {
        let data = [0.5_f32, -1.0, 2.0];
        assert_eq!(first_row(&[1, 3], &data).unwrap(), vec![0.5, -1.0, 2.0]);
        assert_eq!(first_row(&[3], &data).unwrap(), vec![0.5, -1.0, 2.0]);
        assert!(first_row(&[2, 2], &data).is_err());
    }
}
