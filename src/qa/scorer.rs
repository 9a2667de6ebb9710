//! Span search over start/end logits

use super::traits::SpanLogits;

/// Special-token markers removed from answers
const SPECIAL_MARKERS: &[&str] = &["[CLS]", "[SEP]", "[PAD]", "<s>", "</s>", "<pad>"];

/// A candidate answer span within one encoded pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanCandidate {
    /// First token (inclusive)
    pub start: usize,
    /// Last token (inclusive)
    pub end: usize,
    /// `start_logits[start] + end_logits[end]`
    pub score: f32,
}

/// All spans scoring strictly above `floor`, best first.
///
/// Spans start anywhere and end within `max_answer_tokens` positions of
/// their start. Equal scores keep scan order (earlier start, then shorter).
pub fn ranked_candidates(
    logits: &SpanLogits,
    seq_len: usize,
    max_answer_tokens: usize,
    floor: f32,
) -> Vec<SpanCandidate> {
    let len = seq_len.min(logits.start.len()).min(logits.end.len());
    let mut candidates = Vec::new();

    for start in 0..len {
        let upper = (start + max_answer_tokens).min(len);
        for end in start..upper {
            let score = logits.start[start] + logits.end[end];
            if score > floor {
                candidates.push(SpanCandidate { start, end, score });
            }
        }
    }

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

/// A decoded span is usable if it has at least two words and ten characters
pub fn is_valid_span_text(text: &str) -> bool {
    text.split_whitespace().count() >= 2 && text.chars().count() >= 10
}

/// Strip special-token markers and collapse whitespace. Returns `None` if
/// what is left is under five characters or two words.
pub fn clean_answer(text: &str) -> Option<String> {
    let mut cleaned = text.to_string();
    for marker in SPECIAL_MARKERS {
        cleaned = cleaned.replace(marker, " ");
    }
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.chars().count() < 5 || cleaned.split_whitespace().count() < 2 {
        None
    } else {
        Some(cleaned)
    }
}

/// Trim and terminate a question with `?`. `None` if it is shorter than two
/// characters.
pub fn normalize_question(question: &str) -> Option<String> {
    let question = question.trim();
    if question.chars().count() < 2 {
        return None;
    }
    if question.ends_with('?') {
        Some(question.to_string())
    } else {
        Some(format!("{}?", question))
    }
}
