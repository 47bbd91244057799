//! Integration coverage for the `SpanReader` / `extract_multiple_spans_per_passage`
//! path, which the inline unit tests in `lib.rs` don't exercise (those
//! cover `extract_spans` via the simpler `Reader` trait only).

use rank_qa::*;

struct FixedDistribution {
    dist: SpanDistribution,
}

impl SpanReader for FixedDistribution {
    fn span_distribution(&self, _question: &str, _passage: &str) -> Result<SpanDistribution, QaError> {
        Ok(self.dist.clone())
    }
}

fn qa() -> NeuralQA {
    NeuralQA::new(
        Box::new(NoopReader),
        QaConfig {
            confidence_threshold: 0.05,
            max_answer_length: 10,
            top_k_answers: 3,
        },
    )
}

struct NoopReader;
impl Reader for NoopReader {
    fn read(&self, _question: &str, _context: &str) -> Result<ReaderOutput, QaError> {
        unreachable!("not used by multi-span tests")
    }
}

#[test]
fn extract_multiple_spans_deduplicates_and_respects_question_token_count() {
    // passage (byte offsets): "Paris is the capital of France"
    // token 0..1 = question tokens ("who" "is"), token 2.. belong to the passage.
    let passage = "Paris is the capital of France";
    let dist = SpanDistribution {
        token_char_spans: vec![
            (0, 0),  // question token 0 (unused text)
            (0, 0),  // question token 1 (unused text)
            (0, 5),  // "Paris"
            (6, 8),  // "is"
            (9, 12), // "the"
            (13, 20),// "capital"
            (21, 23),// "of"
            (24, 30),// "France"
        ],
        start_probs: vec![0.0, 0.0, 0.9, 0.01, 0.01, 0.01, 0.01, 0.3],
        end_probs: vec![0.0, 0.0, 0.01, 0.01, 0.01, 0.01, 0.01, 0.85],
        question_token_count: 2,
    };
    let reader = FixedDistribution { dist };
    let spans = qa()
        .extract_multiple_spans_per_passage("who is the capital of france", passage, 5, &reader)
        .unwrap();

    assert!(!spans.is_empty());
    // Every returned span must start at or after the question tokens.
    assert!(spans.iter().all(|s| s.start_token >= 2));
    // Deduplication collapses repeated lowercase answer text.
    let lowered: Vec<String> = spans.iter().map(|s| s.answer_text.to_lowercase()).collect();
    let unique: std::collections::HashSet<_> = lowered.iter().cloned().collect();
    assert_eq!(lowered.len(), unique.len());
}

#[test]
fn extract_multiple_spans_empty_distribution_yields_no_spans() {
    let dist = SpanDistribution {
        token_char_spans: vec![],
        start_probs: vec![],
        end_probs: vec![],
        question_token_count: 0,
    };
    let reader = FixedDistribution { dist };
    let spans = qa()
        .extract_multiple_spans_per_passage("q", "", 5, &reader)
        .unwrap();
    assert!(spans.is_empty());
}
