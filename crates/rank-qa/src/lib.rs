//! NeuralQA (C6): an extractive reader re-reads the top passages a
//! retriever already ranked and emits answer spans with a
//! retrieval-aware confidence score.
//!
//! The reader itself is an external capability (the reference model is
//! `deepset/roberta-base-squad2`); this crate only ranks and filters its
//! per-passage outputs and builds the context window and synthesized
//! summary around them.

mod error;

pub use error::QaError;

use std::collections::HashSet;

/// A single extractive-QA call: given a question and one passage,
/// returns the best answer span and the model's confidence in it.
pub trait Reader: Send + Sync {
    fn read(&self, question: &str, context: &str) -> Result<ReaderOutput, QaError>;
}

/// Raw output of one [`Reader::read`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOutput {
    pub answer_text: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Character offset of the answer's first character in `context`.
    pub start_char: usize,
    /// Character offset one past the answer's last character.
    pub end_char: usize,
}

/// A richer reader capability exposing the full start/end position
/// distribution over a passage's tokens, used by
/// [`NeuralQA::extract_multiple_spans_per_passage`] to enumerate several
/// candidate spans instead of just the single best one.
pub trait SpanReader: Send + Sync {
    fn span_distribution(&self, question: &str, passage: &str) -> Result<SpanDistribution, QaError>;
}

/// Per-token start/end probabilities and the byte span (valid `str`
/// slice boundaries) each token covers in the original passage, plus how
/// many leading tokens belong to the question (so answer spans can be
/// restricted to the passage portion).
#[derive(Debug, Clone, PartialEq)]
pub struct SpanDistribution {
    pub token_char_spans: Vec<(usize, usize)>,
    pub start_probs: Vec<f32>,
    pub end_probs: Vec<f32>,
    pub question_token_count: usize,
}

/// A ranked extractive answer span, §3's `AnswerSpan`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSpan {
    pub answer_text: String,
    /// Reader confidence in `[0, 1]`.
    pub confidence: f32,
    /// The retrieval score the passage carried into QA (1.0 if none
    /// was supplied).
    pub retrieval_score: f32,
    /// `confidence * (1 + retrieval_score)`.
    pub combined_score: f32,
    pub start_pos: usize,
    pub end_pos: usize,
    pub passage_index: usize,
    pub context_window: String,
}

/// A single candidate span from [`NeuralQA::extract_multiple_spans_per_passage`].
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSpan {
    pub answer_text: String,
    /// `softmax(start) * softmax(end)`.
    pub confidence: f32,
    pub start_token: usize,
    pub end_token: usize,
}

/// Synthesized QA context for a downstream generative stage.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedContext {
    pub question: String,
    pub ranked_answers: Vec<AnswerSpan>,
    pub top_answer: Option<String>,
    pub mean_confidence: f32,
    pub count: usize,
    pub context_summary: String,
}

/// Configuration for [`NeuralQA`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QaConfig {
    /// Minimum reader confidence for a span to survive filtering.
    pub confidence_threshold: f32,
    /// Maximum answer length, in characters for [`NeuralQA::extract_spans`]
    /// and in tokens for [`NeuralQA::extract_multiple_spans_per_passage`].
    pub max_answer_length: usize,
    /// How many spans [`NeuralQA::extract_spans`] returns at most.
    pub top_k_answers: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.1,
            max_answer_length: 512,
            top_k_answers: 3,
        }
    }
}

const CONTEXT_WINDOW_RADIUS: usize = 100;

/// Extractive QA re-reader.
pub struct NeuralQA {
    reader: Box<dyn Reader>,
    config: QaConfig,
}

impl NeuralQA {
    pub fn new(reader: Box<dyn Reader>, config: QaConfig) -> Self {
        Self { reader, config }
    }

    pub fn config(&self) -> QaConfig {
        self.config
    }

    pub fn update_confidence_threshold(&mut self, threshold: f32) {
        self.config.confidence_threshold = threshold;
    }

    /// Re-reads every passage for `question`, filters spans by
    /// confidence and non-emptiness, ranks by
    /// `combined_score = confidence * (1 + retrieval_score)` descending,
    /// and caps the result to `top_k_answers`.
    ///
    /// A reader error on an individual passage is logged and the
    /// passage is skipped; it never fails the batch. An empty passage
    /// list returns an empty span list, not an error.
    pub fn extract_spans(
        &self,
        question: &str,
        passages: &[String],
        passage_scores: Option<&[f32]>,
    ) -> Vec<AnswerSpan> {
        let mut spans = Vec::new();

        for (i, passage) in passages.iter().enumerate() {
            let output = match self.reader.read(question, passage) {
                Ok(output) => output,
                Err(err) => {
                    log::warn!("reader failed on passage {i}: {err}");
                    continue;
                }
            };

            let answer_text = output.answer_text.trim().to_string();
            if answer_text.is_empty() || output.confidence < self.config.confidence_threshold {
                continue;
            }

            let retrieval_score = passage_scores
                .and_then(|scores| scores.get(i))
                .copied()
                .unwrap_or(1.0);
            let combined_score = output.confidence * (1.0 + retrieval_score);

            spans.push(AnswerSpan {
                answer_text,
                confidence: output.confidence,
                retrieval_score,
                combined_score,
                start_pos: output.start_char,
                end_pos: output.end_char,
                passage_index: i,
                context_window: context_window(passage, output.start_char, output.end_char),
            });
        }

        spans.sort_by(|a, b| match b.combined_score.partial_cmp(&a.combined_score) {
            Some(ord) => ord.then_with(|| a.passage_index.cmp(&b.passage_index)),
            None => a.passage_index.cmp(&b.passage_index),
        });
        spans.truncate(self.config.top_k_answers);
        spans
    }

    /// Enumerates multiple candidate spans from a single passage using a
    /// richer [`SpanReader`] capability: takes the top-20 start and
    /// top-20 end token positions, forms every valid `(start, end)` pair
    /// (start before end, start past the question tokens, span no
    /// longer than `max_answer_length` tokens), scores each as
    /// `softmax(start) * softmax(end)`, deduplicates by lowercased
    /// answer text, sorts by confidence descending, and caps to
    /// `max_spans`.
    pub fn extract_multiple_spans_per_passage(
        &self,
        question: &str,
        passage: &str,
        max_spans: usize,
        reader: &dyn SpanReader,
    ) -> Result<Vec<MultiSpan>, QaError> {
        let dist = reader.span_distribution(question, passage)?;
        let top_starts = top_indices(&dist.start_probs, 20);
        let top_ends = top_indices(&dist.end_probs, 20);

        let mut candidates = Vec::new();
        for &start in &top_starts {
            for &end in &top_ends {
                if start < dist.question_token_count {
                    continue;
                }
                if start >= end {
                    continue;
                }
                if end - start > self.config.max_answer_length {
                    continue;
                }
                let confidence = dist.start_probs[start] * dist.end_probs[end];
                if confidence < self.config.confidence_threshold {
                    continue;
                }
                let (char_start, _) = dist.token_char_spans[start];
                let (_, char_end) = dist.token_char_spans[end];
                let answer_text = passage[char_start..char_end].trim().to_string();
                if answer_text.is_empty() {
                    continue;
                }
                candidates.push(MultiSpan {
                    answer_text,
                    confidence,
                    start_token: start,
                    end_token: end,
                });
            }
        }

        candidates.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal));

        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for candidate in candidates {
            let key = candidate.answer_text.to_lowercase();
            if seen.insert(key) {
                unique.push(candidate);
                if unique.len() >= max_spans {
                    break;
                }
            }
        }
        Ok(unique)
    }

    /// Builds a one-sentence overview of the top answer and the mean
    /// confidence, for a downstream generative stage.
    pub fn synthesize_context(&self, question: &str, spans: Vec<AnswerSpan>) -> SynthesizedContext {
        if spans.is_empty() {
            return SynthesizedContext {
                question: question.to_string(),
                ranked_answers: Vec::new(),
                top_answer: None,
                mean_confidence: 0.0,
                count: 0,
                context_summary: "No relevant answer spans found.".to_string(),
            };
        }

        let mean_confidence =
            spans.iter().map(|s| s.confidence).sum::<f32>() / spans.len() as f32;
        let top_answer = spans[0].answer_text.clone();
        let context_summary = format!(
            "Found {} potential answer(s). Top answer: '{}' (confidence: {:.3}). Average confidence: {:.3}.",
            spans.len(),
            top_answer,
            spans[0].confidence,
            mean_confidence
        );

        SynthesizedContext {
            question: question.to_string(),
            count: spans.len(),
            top_answer: Some(top_answer),
            mean_confidence,
            context_summary,
            ranked_answers: spans,
        }
    }
}

/// Expands `[start, end)` (character offsets into `passage`) by 100
/// characters on each side, extends the boundaries outward to the
/// nearest whitespace, trims, and prefixes/suffixes `"..."` if the
/// window doesn't reach the passage's edges.
fn context_window(passage: &str, start: usize, end: usize) -> String {
    let chars: Vec<char> = passage.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let start = start.min(chars.len());
    let end = end.min(chars.len()).max(start);

    let mut window_start = start.saturating_sub(CONTEXT_WINDOW_RADIUS);
    let mut window_end = (end + CONTEXT_WINDOW_RADIUS).min(chars.len());

    while window_start > 0 && !chars[window_start].is_whitespace() {
        window_start -= 1;
    }
    while window_end < chars.len() && !chars[window_end].is_whitespace() {
        window_end += 1;
    }

    let mut text: String = chars[window_start..window_end].iter().collect();
    text = text.trim().to_string();
    if window_start > 0 {
        text = format!("...{text}");
    }
    if window_end < chars.len() {
        text = format!("{text}...");
    }
    text
}

/// Indices of the top `n` values in `values`, descending, as a
/// tie-break-stable selection (ties broken by ascending index).
fn top_indices(values: &[f32], n: usize) -> Vec<usize> {
    let mut indexed: Vec<usize> = (0..values.len()).collect();
    indexed.sort_by(|&a, &b| match values[b].partial_cmp(&values[a]) {
        Some(ord) => ord.then_with(|| a.cmp(&b)),
        None => a.cmp(&b),
    });
    indexed.truncate(n);
    indexed
}
