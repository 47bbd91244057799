//! Hybrid lexical + dense retrieval with extractive QA re-reading.
//!
//! `rank-rank` is the facade crate: it wires [`rank_retrieve`]'s
//! `LexicalIndex`/`DenseIndex`/`CorpusManager`, [`rank_fusion`]'s score
//! fusion functions, and [`rank_qa`]'s `NeuralQA` into one
//! [`HybridRetriever`] that owns a corpus and answers `search` and
//! `search_with_qa` queries against it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rank_rank::prelude::*;
//! use rank_retrieve::dense::Encoder;
//! use rank_retrieve::RetrieveError;
//!
//! struct HashEncoder { dim: usize }
//! impl Encoder for HashEncoder {
//!     fn dim(&self) -> usize { self.dim }
//!     fn encode_query(&self, text: &str) -> Result<Vec<f32>, RetrieveError> {
//!         self.encode_passages(&[text]).map(|mut v| v.remove(0))
//!     }
//!     fn encode_passages(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrieveError> {
//!         Ok(texts.iter().map(|t| {
//!             let mut v = vec![0.0f32; self.dim];
//!             for (i, b) in t.bytes().enumerate() { v[i % self.dim] += b as f32; }
//!             v
//!         }).collect())
//!     }
//! }
//!
//! let retriever = HybridRetriever::new(
//!     Arc::new(HashEncoder { dim: 16 }),
//!     Bm25Params::default(),
//!     FusionMethod::WeightedSum,
//!     true,
//!     (0.5, 0.5),
//! );
//! retriever.add_documents(&["the quick brown fox".to_string()], None, None).unwrap();
//! let results = retriever.search("fox", 5, None, "normal").unwrap();
//! assert_eq!(results.len(), 1);
//! ```

pub mod error;
pub mod retriever;

pub use error::RankRankError;
pub use retriever::{
    mode_weights, FusedResult, FusionMethod, HybridRetriever, NeuralQaInfo, RetrieverInfo,
    RetrieverStats, SearchWithQaResult,
};

/// Re-export of the commonly used types across the whole workspace.
pub mod prelude {
    pub use crate::retriever::{
        mode_weights, FusedResult, FusionMethod, HybridRetriever, NeuralQaInfo, RetrieverInfo,
        RetrieverStats, SearchWithQaResult,
    };
    pub use crate::RankRankError;

    pub use rank_fusion::{min_max_normalize, rrf, rrf_default, weighted_sum, z_score_normalize, DEFAULT_RRF_K};
    pub use rank_qa::{AnswerSpan, MultiSpan, NeuralQA, QaConfig, Reader, ReaderOutput, SpanDistribution, SpanReader, SynthesizedContext};
    pub use rank_retrieve::bm25::{Bm25Params, Bm25Variant, LexicalIndex};
    pub use rank_retrieve::corpus::CorpusManager;
    pub use rank_retrieve::dense::DenseIndex;
    pub use rank_retrieve::metadata::{document_id, Metadata, MetadataValue};
    pub use rank_retrieve::tokenizer::tokenize;
}
