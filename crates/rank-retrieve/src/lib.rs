//! First-stage retrieval for a hybrid question-answering core.
//!
//! This crate provides the lexical and dense halves of the retrieval
//! pipeline:
//!
//! - [`tokenizer`]: the single tokenization function shared by ingestion
//!   and querying.
//! - [`bm25`]: `LexicalIndex`, a BM25+/BM25L inverted-index scorer.
//! - [`dense`]: `DenseIndex`, an exhaustive cosine-similarity scorer over
//!   an encoder-produced embedding matrix.
//! - [`corpus`]: `CorpusManager`, the invariant-keeper for passage
//!   storage and `DocIndex` assignment.
//! - [`metadata`]: the opaque per-passage metadata record.
//!
//! Fusing the two score vectors and re-reading the fused top-k for
//! extractive answer spans live in the sibling `rank-fusion` and
//! `rank-qa` crates; this crate only produces per-`DocIndex` score
//! vectors and owns the corpus they're computed over.
//!
//! # Example
//!
//! ```rust
//! use rank_retrieve::prelude::*;
//!
//! let mut index = LexicalIndex::new(Bm25Params::default());
//! let tokenized = vec![tokenize("the quick brown fox")];
//! index.build(&tokenized);
//!
//! let scores = index.score(&tokenize("brown fox"));
//! assert!(scores[0] > 0.0);
//! ```

pub mod bm25;
pub mod corpus;
pub mod dense;
pub mod error;
pub mod metadata;
pub mod tokenizer;

pub use error::RetrieveError;

/// Re-export of the commonly used types.
pub mod prelude {
    pub use crate::bm25::{Bm25Params, Bm25Variant, LexicalIndex};
    pub use crate::corpus::CorpusManager;
    pub use crate::dense::{DenseIndex, Encoder};
    pub use crate::metadata::{document_id, Metadata, MetadataValue};
    pub use crate::tokenizer::tokenize;
    pub use crate::RetrieveError;
}
