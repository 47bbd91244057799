//! End-to-end scenarios exercising `HybridRetriever` against a
//! deterministic hash encoder and a fixed-answer QA reader.

use std::sync::Arc;

use rank_rank::prelude::*;
use rank_retrieve::dense::Encoder;
use rank_retrieve::RetrieveError;

struct HashEncoder {
    dim: usize,
}

impl Encoder for HashEncoder {
    fn dim(&self) -> usize {
        self.dim
    }
    fn encode_query(&self, text: &str) -> Result<Vec<f32>, RetrieveError> {
        Ok(self.encode_passages(&[text])?.remove(0))
    }
    fn encode_passages(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrieveError> {
        Ok(texts
            .iter()
            .map(|t| {
                let mut v = vec![0.0f32; self.dim];
                for (i, b) in t.bytes().enumerate() {
                    v[i % self.dim] += b as f32;
                }
                v
            })
            .collect())
    }
}

struct FailingEncoder;

impl Encoder for FailingEncoder {
    fn dim(&self) -> usize {
        8
    }
    fn encode_query(&self, _text: &str) -> Result<Vec<f32>, RetrieveError> {
        Err(RetrieveError::ModelUnavailable("encoder down".to_string()))
    }
    fn encode_passages(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrieveError> {
        Err(RetrieveError::ModelUnavailable("encoder down".to_string()))
    }
}

fn retriever(method: FusionMethod) -> HybridRetriever {
    HybridRetriever::new(
        Arc::new(HashEncoder { dim: 16 }),
        Bm25Params::default(),
        method,
        true,
        (0.5, 0.5),
    )
}

// S1: a single passage in the corpus is returned for a matching query.
#[test]
fn single_passage_corpus_returns_the_one_match() {
    let r = retriever(FusionMethod::WeightedSum);
    r.add_documents(&["the quick brown fox".to_string()], None, None)
        .unwrap();
    let results = r.search("fox", 5, None, "normal").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_index, 0);
}

// S2: mode selects different fusion weights, which can change ranking
// when the lexical and dense signals disagree about the top result.
#[test]
fn mode_changes_fusion_weights() {
    let r = retriever(FusionMethod::WeightedSum);
    r.add_documents(
        &[
            "cats and dogs are popular pets".to_string(),
            "feline companions bring joy".to_string(),
        ],
        None,
        None,
    )
    .unwrap();
    let normal = r.search("cats", 2, None, "normal").unwrap();
    let pro = r.search("cats", 2, None, "pro").unwrap();
    assert_eq!(normal[0].fusion_weights, (0.7, 0.3));
    assert_eq!(pro[0].fusion_weights, (0.3, 0.7));
}

// S3: document_ids restricts the candidate set to a subset of passages.
#[test]
fn document_id_filter_restricts_results() {
    let r = retriever(FusionMethod::WeightedSum);
    r.add_documents(&["alpha passage".to_string()], None, Some("d1"))
        .unwrap();
    r.add_documents(&["beta passage".to_string()], None, Some("d2"))
        .unwrap();
    let results = r
        .search("passage", 10, Some(&["d2".to_string()]), "normal")
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].passage, "beta passage");
}

// S4: searching an empty corpus returns an empty result, not an error.
#[test]
fn empty_corpus_search_returns_empty() {
    let r = retriever(FusionMethod::WeightedSum);
    let results = r.search("anything", 5, None, "normal").unwrap();
    assert!(results.is_empty());
}

// S5: weighted-sum and RRF can disagree on ranking for the same corpus.
#[test]
fn rrf_and_weighted_sum_both_produce_total_orderings() {
    let texts: Vec<String> = vec![
        "the history of rome".to_string(),
        "roman architecture and aqueducts".to_string(),
        "modern italian cuisine".to_string(),
    ];
    let ws = retriever(FusionMethod::WeightedSum);
    ws.add_documents(&texts, None, None).unwrap();
    let ws_results = ws.search("roman history", 3, None, "normal").unwrap();

    let rrf = retriever(FusionMethod::Rrf);
    rrf.add_documents(&texts, None, None).unwrap();
    let rrf_results = rrf.search("roman history", 3, None, "normal").unwrap();

    assert_eq!(ws_results.len(), 3);
    assert_eq!(rrf_results.len(), 3);
    // Both rankings are internally sorted descending by fused score.
    assert!(ws_results.windows(2).all(|w| w[0].fused_score >= w[1].fused_score));
    assert!(rrf_results.windows(2).all(|w| w[0].fused_score >= w[1].fused_score));
}

struct FixedReader;
impl Reader for FixedReader {
    fn read(&self, _question: &str, _context: &str) -> Result<ReaderOutput, rank_qa::QaError> {
        Ok(ReaderOutput {
            answer_text: "330 meters".to_string(),
            confidence: 0.8,
            start_char: 20,
            end_char: 30,
        })
    }
}

// S6: combined_score = confidence * (1 + retrieval_score).
#[test]
fn search_with_qa_combines_retrieval_and_reader_confidence() {
    let r = retriever(FusionMethod::WeightedSum)
        .with_qa(NeuralQA::new(Box::new(FixedReader), QaConfig::default()));
    r.add_documents(
        &["The Eiffel Tower is 330 meters tall.".to_string()],
        None,
        None,
    )
    .unwrap();
    let result = r
        .search_with_qa("How tall is the Eiffel Tower?", 1, None, "normal")
        .unwrap();
    assert_eq!(result.qa_results.len(), 1);
    assert!(result.qa_results[0].combined_score > result.qa_results[0].confidence);
    assert_eq!(result.enhanced_context.count, 1);
}

// S7: an encoder failure during ingestion leaves the corpus untouched.
#[test]
fn encoder_failure_during_ingest_rolls_back_everything() {
    let r = HybridRetriever::new(
        Arc::new(FailingEncoder),
        Bm25Params::default(),
        FusionMethod::WeightedSum,
        true,
        (0.5, 0.5),
    );
    let err = r
        .add_documents(&["this will never be stored".to_string()], None, None)
        .unwrap_err();
    assert!(matches!(err, RankRankError::Retrieve(_)));
    assert_eq!(r.stats().document_count, 0);
}

#[test]
fn search_with_qa_without_reader_is_rejected() {
    let r = retriever(FusionMethod::WeightedSum);
    r.add_documents(&["a passage".to_string()], None, None).unwrap();
    let err = r.search_with_qa("q", 1, None, "normal").unwrap_err();
    assert!(matches!(err, RankRankError::InvalidInput(_)));
}

#[test]
fn get_retriever_info_reports_qa_config_only_when_attached() {
    let bare = retriever(FusionMethod::Rrf);
    let info = bare.get_retriever_info();
    assert_eq!(info.retriever_type, "hybrid-bm25-dense");
    assert_eq!(info.stats.fusion_method, FusionMethod::Rrf);
    assert!(info.neural_qa_info.is_none());

    let with_qa = retriever(FusionMethod::WeightedSum)
        .with_qa(NeuralQA::new(Box::new(FixedReader), QaConfig::default()));
    let info = with_qa.get_retriever_info();
    let qa_info = info.neural_qa_info.unwrap();
    assert_eq!(qa_info.top_k_answers, QaConfig::default().top_k_answers);
}

#[test]
fn remove_document_drops_only_matching_passages() {
    let r = retriever(FusionMethod::WeightedSum);
    r.add_documents(&["keep me".to_string()], None, Some("keep"))
        .unwrap();
    r.add_documents(&["drop me".to_string()], None, Some("drop"))
        .unwrap();
    let removed = r.remove_document("drop");
    assert_eq!(removed, 1);
    assert_eq!(r.stats().document_count, 1);
    let results = r.search("keep", 5, None, "normal").unwrap();
    assert_eq!(results[0].passage, "keep me");
}
