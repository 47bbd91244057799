//! HybridRetriever (C5): the orchestrator that owns the corpus, the
//! lexical and dense indexes, and fuses their two score vectors into one
//! ranking. An optional [`NeuralQA`] layer re-reads the fused top-k for
//! answer spans.

use std::sync::{Arc, RwLock};

use rank_fusion::{rrf as rrf_fuse, scores_to_ranking, weighted_sum, DEFAULT_RRF_K};
use rank_qa::{AnswerSpan, NeuralQA, SynthesizedContext};
use rank_retrieve::bm25::{Bm25Params, LexicalIndex};
use rank_retrieve::corpus::CorpusManager;
use rank_retrieve::dense::{DenseIndex, Encoder};
use rank_retrieve::metadata::Metadata;
use rank_retrieve::tokenizer::tokenize;

use crate::error::RankRankError;

/// How the lexical and dense score vectors are combined into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionMethod {
    WeightedSum,
    Rrf,
}

/// A single result of [`HybridRetriever::search`]: one passage plus its
/// raw per-method scores and the fused score that ranked it.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedResult {
    pub doc_index: u32,
    pub passage: String,
    pub metadata: Metadata,
    pub bm25_score: f64,
    pub dense_score: f32,
    pub fused_score: f64,
    pub fusion_weights: (f64, f64),
}

/// Combined retrieval + QA result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchWithQaResult {
    pub retrieval_results: Vec<FusedResult>,
    pub qa_results: Vec<AnswerSpan>,
    pub enhanced_context: SynthesizedContext,
}

/// Snapshot of a retriever's configuration and corpus size.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieverStats {
    pub document_count: usize,
    pub bm25_variant: rank_retrieve::bm25::Bm25Variant,
    pub fusion_method: FusionMethod,
    pub normalize_scores: bool,
    pub default_weights: (f64, f64),
}

/// The attached QA layer's configuration, reported by
/// [`HybridRetriever::get_retriever_info`] when one is configured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeuralQaInfo {
    pub confidence_threshold: f32,
    pub max_answer_length: usize,
    pub top_k_answers: usize,
}

/// Full info payload for the `get_retriever_info` surface API: a fixed
/// type tag, the current [`RetrieverStats`], and the QA layer's
/// configuration if one is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieverInfo {
    pub retriever_type: &'static str,
    pub stats: RetrieverStats,
    pub neural_qa_info: Option<NeuralQaInfo>,
}

struct CorpusState {
    corpus: CorpusManager,
    lexical: LexicalIndex,
    dense: DenseIndex,
}

/// Resolves the `(bm25_weight, dense_weight)` pair for a search mode.
/// `"normal"` favors lexical precision (`0.7, 0.3`), `"pro"` favors
/// dense recall (`0.3, 0.7`), and anything else falls back to the
/// retriever's configured default weights.
pub fn mode_weights(mode: &str, default: (f64, f64)) -> (f64, f64) {
    match mode.to_lowercase().as_str() {
        "normal" => {
            log::debug!("using normal mode weights: bm25=0.7, dense=0.3 (lexical grounding)");
            (0.7, 0.3)
        }
        "pro" => {
            log::debug!("using pro mode weights: bm25=0.3, dense=0.7 (conceptual similarity)");
            (0.3, 0.7)
        }
        _ => {
            log::debug!("using default weights for mode '{mode}': bm25={}, dense={}", default.0, default.1);
            default
        }
    }
}

/// Owns the corpus, lexical index and dense index, and fuses their
/// scores into one ranking. Reads (`search`) take a shared lock; writes
/// (`add_documents`, `remove_document`, `clear`) take an exclusive lock,
/// matching the spec's single-writer/many-readers concurrency model.
pub struct HybridRetriever {
    state: RwLock<CorpusState>,
    encoder: Arc<dyn Encoder>,
    qa: Option<NeuralQA>,
    bm25_params: Bm25Params,
    fusion_method: FusionMethod,
    normalize_scores: bool,
    default_weights: (f64, f64),
}

impl HybridRetriever {
    pub fn new(
        encoder: Arc<dyn Encoder>,
        bm25_params: Bm25Params,
        fusion_method: FusionMethod,
        normalize_scores: bool,
        default_weights: (f64, f64),
    ) -> Self {
        Self {
            state: RwLock::new(CorpusState {
                corpus: CorpusManager::new(),
                lexical: LexicalIndex::new(bm25_params),
                dense: DenseIndex::new(),
            }),
            encoder,
            qa: None,
            bm25_params,
            fusion_method,
            normalize_scores,
            default_weights,
        }
    }

    /// Attaches an extractive QA layer, enabling [`Self::search_with_qa`].
    pub fn with_qa(mut self, qa: NeuralQA) -> Self {
        self.qa = Some(qa);
        self
    }

    pub fn has_qa(&self) -> bool {
        self.qa.is_some()
    }

    pub fn update_weights(&mut self, bm25_weight: f64, dense_weight: f64) {
        self.default_weights = (bm25_weight, dense_weight);
    }

    /// Adds `texts` to the corpus. Encoding happens before anything is
    /// mutated, so an `Encoder` failure (transient or structural) leaves
    /// the corpus, lexical index and dense index exactly as they were —
    /// no partial commit across the three structures.
    pub fn add_documents(
        &self,
        texts: &[String],
        metadata: Option<Vec<Metadata>>,
        document_id: Option<&str>,
    ) -> Result<Vec<u32>, RankRankError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        log::info!("adding {} documents to hybrid retriever", texts.len());
        if let Some(ref m) = metadata {
            if m.len() != texts.len() {
                return Err(RankRankError::InvalidInput(format!(
                    "metadata length {} does not match texts length {}",
                    m.len(),
                    texts.len()
                )));
            }
        }

        // Stage: encode before touching any shared state.
        let mut new_rows = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(DenseIndex::PASSAGE_BATCH_SIZE) {
            let refs: Vec<&str> = chunk.iter().map(String::as_str).collect();
            let embeddings = self.encoder.encode_passages(&refs)?;
            new_rows.extend(embeddings);
        }

        let mut state = self.state.write().expect("retriever lock poisoned");

        // Commit: corpus, lexical rebuild, and dense append happen
        // together. By this point only a dimension mismatch can fail,
        // and dense.push_rows fails before mutating `state.dense` if so.
        state.dense.push_rows(new_rows)?;
        let indices = state.corpus.add(texts, metadata, document_id)?;
        rebuild_lexical(&mut state);
        Ok(indices)
    }

    /// Removes every passage belonging to `document_id`, rebuilding the
    /// lexical index and dense matrix to match the surviving passages.
    pub fn remove_document(&self, document_id: &str) -> usize {
        let mut state = self.state.write().expect("retriever lock poisoned");
        let keep: Vec<bool> = state
            .corpus
            .metadata()
            .iter()
            .map(|m| rank_retrieve::metadata::document_id(m) != Some(document_id))
            .collect();
        let kept_rows: Vec<Vec<f32>> = state
            .dense
            .rows()
            .iter()
            .zip(keep.iter())
            .filter_map(|(row, &k)| k.then(|| row.clone()))
            .collect();
        let removed = state.corpus.remove_document(document_id);
        state.dense.set_rows(kept_rows);
        rebuild_lexical(&mut state);
        removed
    }

    /// Removes every passage, resetting the corpus, lexical index and
    /// dense index to empty.
    pub fn clear(&self) {
        let mut state = self.state.write().expect("retriever lock poisoned");
        state.corpus.clear();
        state.dense.clear();
        rebuild_lexical(&mut state);
        log::info!("hybrid retriever cleared");
    }

    /// Scores every passage lexically and densely, fuses the two
    /// vectors per [`Self::fusion_method`], optionally restricts the
    /// candidate set to `document_ids`, and returns the top `top_k`
    /// fused results descending by fused score.
    pub fn search(
        &self,
        query: &str,
        top_k: usize,
        document_ids: Option<&[String]>,
        mode: &str,
    ) -> Result<Vec<FusedResult>, RankRankError> {
        let state = self.state.read().expect("retriever lock poisoned");
        if state.corpus.is_empty() {
            log::warn!("search called on an empty hybrid retriever");
            return Ok(Vec::new());
        }

        let weights = mode_weights(mode, self.default_weights);
        let query_tokens = tokenize(query);
        let bm25_scores = state.lexical.score(&query_tokens);

        let n = state.corpus.len();
        let dense_hits = state.dense.search(query, n, &*self.encoder)?;
        let mut dense_scores = vec![0.0f32; n];
        for (doc, score) in dense_hits {
            dense_scores[doc as usize] = score;
        }

        let allowed = state.corpus.filter_indices(document_ids);
        let allowed: std::collections::HashSet<u32> = allowed.into_iter().collect();

        let fused_scores: Vec<f64> = match self.fusion_method {
            FusionMethod::WeightedSum => {
                let dense_as_f64: Vec<f64> = dense_scores.iter().map(|&s| s as f64).collect();
                weighted_sum(
                    &bm25_scores,
                    &dense_as_f64,
                    weights.0,
                    weights.1,
                    self.normalize_scores,
                )?
            }
            FusionMethod::Rrf => {
                let bm25_ranking = scores_to_ranking(&bm25_scores);
                let dense_ranking = scores_to_ranking(&dense_scores.iter().map(|&s| s as f64).collect::<Vec<_>>());
                let fused = rrf_fuse(&bm25_ranking, &dense_ranking, DEFAULT_RRF_K);
                let mut by_doc = vec![0.0f64; n];
                for (doc, score) in fused {
                    by_doc[doc as usize] = score;
                }
                by_doc
            }
        };

        let mut results: Vec<FusedResult> = (0..n as u32)
            .filter(|doc_index| allowed.contains(doc_index))
            .map(|doc_index| {
                let i = doc_index as usize;
                FusedResult {
                    doc_index,
                    passage: state.corpus.passages()[i].clone(),
                    metadata: state.corpus.metadata()[i].clone(),
                    bm25_score: bm25_scores[i],
                    dense_score: dense_scores[i],
                    fused_score: fused_scores[i],
                    fusion_weights: weights,
                }
            })
            .collect();

        results.sort_by(|a, b| match b.fused_score.partial_cmp(&a.fused_score) {
            Some(ord) => ord.then_with(|| a.doc_index.cmp(&b.doc_index)),
            None => a.doc_index.cmp(&b.doc_index),
        });
        results.truncate(top_k);
        Ok(results)
    }

    /// Runs [`Self::search`] and re-reads the results with the attached
    /// QA layer. Fails with [`RankRankError::InvalidInput`] if no QA
    /// layer was attached via [`Self::with_qa`].
    pub fn search_with_qa(
        &self,
        question: &str,
        top_k: usize,
        document_ids: Option<&[String]>,
        mode: &str,
    ) -> Result<SearchWithQaResult, RankRankError> {
        let qa = self
            .qa
            .as_ref()
            .ok_or_else(|| RankRankError::InvalidInput("no QA reader configured".to_string()))?;

        let retrieval_results = self.search(question, top_k, document_ids, mode)?;
        let passages: Vec<String> = retrieval_results.iter().map(|r| r.passage.clone()).collect();
        let scores: Vec<f32> = retrieval_results.iter().map(|r| r.fused_score as f32).collect();
        let qa_results = qa.extract_spans(question, &passages, Some(&scores));
        let enhanced_context = qa.synthesize_context(question, qa_results.clone());

        Ok(SearchWithQaResult {
            retrieval_results,
            qa_results,
            enhanced_context,
        })
    }

    pub fn stats(&self) -> RetrieverStats {
        let state = self.state.read().expect("retriever lock poisoned");
        RetrieverStats {
            document_count: state.corpus.len(),
            bm25_variant: self.bm25_params.variant,
            fusion_method: self.fusion_method,
            normalize_scores: self.normalize_scores,
            default_weights: self.default_weights,
        }
    }

    /// The surface-API `get_retriever_info`: a fixed type tag, the
    /// current [`RetrieverStats`], and the attached QA layer's
    /// configuration, if any.
    pub fn get_retriever_info(&self) -> RetrieverInfo {
        RetrieverInfo {
            retriever_type: "hybrid-bm25-dense",
            stats: self.stats(),
            neural_qa_info: self.qa.as_ref().map(|qa| {
                let config = qa.config();
                NeuralQaInfo {
                    confidence_threshold: config.confidence_threshold,
                    max_answer_length: config.max_answer_length,
                    top_k_answers: config.top_k_answers,
                }
            }),
        }
    }
}

fn rebuild_lexical(state: &mut CorpusState) {
    let tokenized: Vec<Vec<String>> = state.corpus.passages().iter().map(|p| tokenize(p)).collect();
    state.lexical.build(&tokenized);
}
