//! Answer engine: windowed inference and best-span selection

use std::sync::Arc;

use tracing::{debug, error, trace};

use super::answer::Answer;
use super::scorer::{clean_answer, is_valid_span_text, normalize_question, ranked_candidates};
use super::traits::{QaError, QaResult, QaTokenizer, SpanModel};
use crate::chunking::TokenChunker;
use crate::config::{AnsweringConfig, ModelConfig};
use crate::util::truncate_str;

/// Best valid span seen so far
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSpan {
    pub text: String,
    pub score: f32,
    /// Offset of the window the span came from
    pub window_offset: usize,
}

/// Extractive question answering over a long context
#[derive(Debug, Clone)]
pub struct QaEngine {
    tokenizer: Arc<dyn QaTokenizer>,
    model: Arc<dyn SpanModel>,
    chunker: TokenChunker,
    config: AnsweringConfig,
}

impl QaEngine {
    pub fn new(
        tokenizer: Arc<dyn QaTokenizer>,
        model: Arc<dyn SpanModel>,
        config: AnsweringConfig,
    ) -> Self {
        Self {
            tokenizer,
            model,
            chunker: TokenChunker::from_config(&config),
            config,
        }
    }

    /// Load the tokenizer and ONNX model named by the config
    #[cfg(feature = "onnx")]
    pub fn from_config(model: &ModelConfig, answering: &AnsweringConfig) -> QaResult<Self> {
        use super::onnx::OnnxSpanModel;
        use super::tokenizer::HfTokenizer;

        let model_path = model.model_file().ok_or_else(|| {
            QaError::ModelNotFound(format!(
                "no model.onnx for '{}' under {}",
                model.model_name,
                model.model_dir.display()
            ))
        })?;
        let tokenizer_path = model.tokenizer_file().ok_or_else(|| {
            QaError::ModelNotFound(format!(
                "no tokenizer.json for '{}' under {}",
                model.model_name,
                model.model_dir.display()
            ))
        })?;

        let tokenizer = HfTokenizer::from_file(tokenizer_path, model.max_sequence_length)?;
        let span_model = OnnxSpanModel::from_file(model_path, &model.model_name, model.num_threads)?;
        tracing::info!("QA model {} loaded", model.model_name);

        Ok(Self::new(
            Arc::new(tokenizer),
            Arc::new(span_model),
            answering.clone(),
        ))
    }

    #[cfg(not(feature = "onnx"))]
    pub fn from_config(model: &ModelConfig, _answering: &AnsweringConfig) -> QaResult<Self> {
        Err(QaError::Config(format!(
            "cannot load '{}': built without the `onnx` feature",
            model.model_name
        )))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Answer `question` from `context`. Never fails: tokenizer and model
    /// errors become [`Answer::Failed`].
    pub fn best_answer(&self, question: &str, context: &str) -> Answer {
        let context = context.trim();
        if context.is_empty() {
            return Answer::NoContext;
        }
        let Some(question) = normalize_question(question) else {
            return Answer::InvalidQuestion;
        };

        match self.find_best_span(&question, context) {
            Ok(Some(best)) if best.score > self.config.score_threshold => {
                debug!(
                    score = best.score,
                    window = best.window_offset,
                    "Best span: {}",
                    truncate_str(&best.text, 200)
                );
                clean_answer(&best.text).map_or(Answer::NotFound, Answer::Found)
            }
            Ok(best) => {
                debug!(
                    score = ?best.map(|b| b.score),
                    "No span above threshold {}",
                    self.config.score_threshold
                );
                Answer::NotFound
            }
            Err(e) => {
                error!("Error answering question '{}': {}", question, e);
                Answer::Failed(e.to_string())
            }
        }
    }

    /// Highest-scoring valid span across all context windows.
    ///
    /// Only spans whose decoded text passes [`is_valid_span_text`] can raise
    /// the running maximum, so the returned score always belongs to the
    /// returned text.
    pub fn find_best_span(&self, question: &str, context: &str) -> QaResult<Option<ScoredSpan>> {
        let ids = self.tokenizer.encode_context(context)?;
        let chunks = self.chunker.chunk(&ids);
        debug!("Answering over {} tokens in {} windows", ids.len(), chunks.len());

        let mut best: Option<ScoredSpan> = None;
        for chunk in chunks.iter().filter(|c| c.len() >= self.config.min_chunk_tokens) {
            trace!(start = chunk.offset, end = chunk.end(), "Scoring window");
            let window_text = self.tokenizer.decode(&chunk.ids)?;
            let encoding = self.tokenizer.encode_pair(question, &window_text)?;
            let logits = self.model.predict(&encoding)?;
            if logits.start.len() != logits.end.len() {
                return Err(QaError::Inference(format!(
                    "start/end logits differ in length ({} vs {})",
                    logits.start.len(),
                    logits.end.len()
                )));
            }

            let floor = best.as_ref().map_or(f32::NEG_INFINITY, |b| b.score);
            let candidates = ranked_candidates(
                &logits,
                encoding.len(),
                self.config.max_answer_tokens,
                floor,
            );

            for candidate in candidates {
                let text = self
                    .tokenizer
                    .decode(&encoding.ids[candidate.start..=candidate.end])?;
                if is_valid_span_text(&text) {
                    best = Some(ScoredSpan {
                        text,
                        score: candidate.score,
                        window_offset: chunk.offset,
                    });
                    break;
                }
            }
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qa::traits::{PairEncoding, SpanLogits};
    use parking_lot::Mutex;
    use std::collections::HashMap;

    const CLS: u32 = 0;
    const SEP: u32 = 1;

    /// Whitespace tokenizer with a vocabulary that grows on demand
    #[derive(Debug, Default)]
    struct WordTokenizer {
        vocab: Mutex<(HashMap<String, u32>, Vec<String>)>,
    }

    impl WordTokenizer {
        fn id(&self, word: &str) -> u32 {
            let mut guard = self.vocab.lock();
            let (ids, words) = &mut *guard;
            if let Some(&id) = ids.get(word) {
                return id;
            }
            let id = words.len() as u32 + 2;
            ids.insert(word.to_string(), id);
            words.push(word.to_string());
            id
        }

        fn ids(&self, text: &str) -> Vec<u32> {
            text.split_whitespace().map(|w| self.id(w)).collect()
        }
    }

    impl QaTokenizer for WordTokenizer {
        fn encode_context(&self, text: &str) -> QaResult<Vec<u32>> {
            let mut ids = vec![CLS];
            ids.extend(self.ids(text));
            ids.push(SEP);
            Ok(ids)
        }

        fn encode_pair(&self, question: &str, context: &str) -> QaResult<PairEncoding> {
            let mut ids = vec![CLS];
            ids.extend(self.ids(question));
            ids.push(SEP);
            ids.extend(self.ids(context));
            ids.push(SEP);
            let n = ids.len();
            Ok(PairEncoding {
                ids,
                attention_mask: vec![1; n],
                type_ids: vec![0; n],
            })
        }

        fn decode(&self, ids: &[u32]) -> QaResult<String> {
            let guard = self.vocab.lock();
            Ok(ids
                .iter()
                .filter(|&&id| id > SEP)
                .map(|&id| guard.1[(id - 2) as usize].as_str())
                .collect::<Vec<_>>()
                .join(" "))
        }
    }

    /// Scores a target phrase high and an optional single-word decoy higher
    #[derive(Debug)]
    struct PhraseModel {
        tokenizer: Arc<WordTokenizer>,
        target: &'static str,
        decoy: Option<&'static str>,
        fail: bool,
    }

    impl PhraseModel {
        fn new(tokenizer: Arc<WordTokenizer>, target: &'static str) -> Self {
            Self {
                tokenizer,
                target,
                decoy: None,
                fail: false,
            }
        }
    }

    impl SpanModel for PhraseModel {
        fn predict(&self, encoding: &PairEncoding) -> QaResult<SpanLogits> {
            if self.fail {
                return Err(QaError::Inference("model exploded".to_string()));
            }
            let n = encoding.len();
            let mut start = vec![-1.0; n];
            let mut end = vec![-1.0; n];

            let target = self.tokenizer.ids(self.target);
            if let Some(pos) = encoding.ids.windows(target.len()).position(|w| w == target) {
                start[pos] = 5.0;
                end[pos + target.len() - 1] = 5.0;
            }
            if let Some(decoy) = self.decoy {
                let id = self.tokenizer.id(decoy);
                if let Some(pos) = encoding.ids.iter().position(|&x| x == id) {
                    start[pos] = 8.0;
                    end[pos] = 8.0;
                }
            }
            Ok(SpanLogits { start, end })
        }

        fn name(&self) -> &str {
            "phrase"
        }
    }

    fn filler(prefix: &str, n: usize) -> String {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect::<Vec<_>>().join(" ")
    }

    fn engine_with(model: PhraseModel, tokenizer: Arc<WordTokenizer>, config: AnsweringConfig) -> QaEngine {
        QaEngine::new(tokenizer, Arc::new(model), config)
    }

    fn paris_context() -> String {
        format!(
            "{} The capital of France is Paris and it is famous for the Eiffel Tower. {}",
            filler("pre", 20),
            filler("post", 20)
        )
    }

    #[test]
    fn test_empty_context_and_bad_question() {
        let tokenizer = Arc::new(WordTokenizer::default());
        let engine = engine_with(
            PhraseModel::new(tokenizer.clone(), "Paris"),
            tokenizer,
            AnsweringConfig::default(),
        );
        assert_eq!(engine.best_answer("What is it?", ""), Answer::NoContext);
        assert_eq!(engine.best_answer("What is it?", "  \n "), Answer::NoContext);
        assert_eq!(engine.best_answer(" ? ", &paris_context()), Answer::InvalidQuestion);
    }

    #[test]
    fn test_finds_target_phrase() {
        let tokenizer = Arc::new(WordTokenizer::default());
        let engine = engine_with(
            PhraseModel::new(tokenizer.clone(), "France is Paris"),
            tokenizer,
            AnsweringConfig::default(),
        );
        let answer = engine.best_answer("What is the capital of France", &paris_context());
        assert_eq!(answer, Answer::Found("France is Paris".to_string()));
    }

    #[test]
    fn test_question_mark_is_optional() {
        let tokenizer = Arc::new(WordTokenizer::default());
        let engine = engine_with(
            PhraseModel::new(tokenizer.clone(), "Eiffel Tower."),
            tokenizer,
            AnsweringConfig::default(),
        );
        let context = paris_context();
        assert_eq!(
            engine.best_answer("what", &context),
            engine.best_answer("what?", &context)
        );
    }

    #[test]
    fn test_invalid_high_scoring_span_does_not_block_valid_one() {
        let tokenizer = Arc::new(WordTokenizer::default());
        let mut model = PhraseModel::new(tokenizer.clone(), "the Eiffel Tower.");
        // Single word, scores 16 but fails span validation
        model.decoy = Some("pre3");
        let config = AnsweringConfig {
            max_answer_tokens: 5,
            ..Default::default()
        };
        let engine = engine_with(model, tokenizer, config);

        let best = engine
            .find_best_span("What is famous?", &paris_context())
            .unwrap()
            .unwrap();
        assert_eq!(best.text, "the Eiffel Tower.");
        assert!((best.score - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_low_scores_are_not_answers() {
        let tokenizer = Arc::new(WordTokenizer::default());
        let engine = engine_with(
            PhraseModel::new(tokenizer.clone(), "not in the context at all"),
            tokenizer,
            AnsweringConfig::default(),
        );
        assert_eq!(
            engine.best_answer("What is the capital?", &paris_context()),
            Answer::NotFound
        );
    }

    #[test]
    fn test_model_errors_become_failed_answers() {
        let tokenizer = Arc::new(WordTokenizer::default());
        let mut model = PhraseModel::new(tokenizer.clone(), "Paris");
        model.fail = true;
        let engine = engine_with(model, tokenizer, AnsweringConfig::default());
        let answer = engine.best_answer("What is the capital?", &paris_context());
        assert_eq!(
            answer.to_string(),
            "An error occurred while processing your question: Inference failed: model exploded"
        );
    }

    #[test]
    fn test_answer_found_in_later_window() {
        let tokenizer = Arc::new(WordTokenizer::default());
        let engine = engine_with(
            PhraseModel::new(tokenizer.clone(), "deep ocean trench"),
            tokenizer,
            AnsweringConfig {
                chunk_size: 40,
                stride: 10,
                ..Default::default()
            },
        );
        let context = format!("{} the deep ocean trench {}", filler("a", 100), filler("b", 10));
        let best = engine
            .find_best_span("Where is it?", &context)
            .unwrap()
            .unwrap();
        assert_eq!(best.text, "deep ocean trench");
        assert!(best.window_offset > 0);
    }

    /// Same logit at every position
    #[derive(Debug)]
    struct FlatModel(f32);

    impl SpanModel for FlatModel {
        fn predict(&self, encoding: &PairEncoding) -> QaResult<SpanLogits> {
            Ok(SpanLogits {
                start: vec![self.0; encoding.len()],
                end: vec![self.0; encoding.len()],
            })
        }

        fn name(&self) -> &str {
            "flat"
        }
    }

    #[test]
    fn test_short_paris_context() {
        let tokenizer = Arc::new(WordTokenizer::default());
        let engine = engine_with(
            PhraseModel::new(tokenizer.clone(), "Paris is the capital of France."),
            tokenizer,
            AnsweringConfig::default(),
        );
        let context = "Paris is the capital of France. It has a population of over two million.";
        assert_eq!(
            engine.best_answer("What is the capital of France?", context),
            Answer::Found("Paris is the capital of France.".to_string())
        );
    }

    #[test]
    fn test_score_must_exceed_threshold() {
        let context = paris_context();

        // -0.5 + -0.5 sits exactly on the -1.0 threshold
        let tokenizer = Arc::new(WordTokenizer::default());
        let engine = QaEngine::new(
            tokenizer,
            Arc::new(FlatModel(-0.5)),
            AnsweringConfig::default(),
        );
        let best = engine.find_best_span("Where?", &context).unwrap().unwrap();
        assert_eq!(best.score, -1.0);
        assert_eq!(engine.best_answer("Where?", &context), Answer::NotFound);

        let tokenizer = Arc::new(WordTokenizer::default());
        let engine = QaEngine::new(
            tokenizer,
            Arc::new(FlatModel(-0.25)),
            AnsweringConfig::default(),
        );
        assert!(engine.best_answer("Where?", &context).is_found());
    }

    #[test]
    fn test_tiny_context_has_no_windows_to_score() {
        let tokenizer = Arc::new(WordTokenizer::default());
        let engine = engine_with(
            PhraseModel::new(tokenizer.clone(), "short text"),
            tokenizer,
            AnsweringConfig::default(),
        );
        // Five words plus two special tokens is under the ten-token minimum
        assert_eq!(
            engine.best_answer("What?", "some short text right here"),
            Answer::NotFound
        );
    }
}
