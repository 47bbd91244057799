//! DenseIndex (C3): an (N x D) matrix of passage embeddings, scored by
//! exhaustive cosine similarity. Encoding is delegated to an external
//! [`Encoder`] capability; this module owns only the matrix and the
//! similarity search over it.
//!
//! No ANN structure is built here (see spec non-goals): at the low tens
//! of thousands of passages this core targets, brute-force cosine
//! similarity is acceptable and keeps the implementation free of
//! approximate-recall surprises.

use crate::error::RetrieveError;

/// Encodes text into dense vectors. Models are identified by name at
/// construction time by the caller; this trait only describes the two
/// operations the core needs. The reference encoder pairing is
/// `facebook/dpr-question_encoder-single-nq-base` (queries) and
/// `facebook/dpr-ctx_encoder-single-nq-base` (passages); a single
/// sentence-transformer producing e.g. 384-dim vectors for both is an
/// acceptable fallback as long as `dim()` stays consistent within one
/// index.
pub trait Encoder: Send + Sync {
    /// Dimensionality `D` of the vectors this encoder produces.
    fn dim(&self) -> usize;

    /// Encodes a single query string.
    fn encode_query(&self, text: &str) -> Result<Vec<f32>, RetrieveError>;

    /// Encodes a batch of passage strings. Callers are responsible for
    /// chunking (see [`DenseIndex::PASSAGE_BATCH_SIZE`]); implementors
    /// may assume `texts` is already a single batch.
    fn encode_passages(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrieveError>;
}

/// Brute-force dense retriever: a row-major `N x D` matrix of `f32`
/// embeddings, one row per `DocIndex`.
#[derive(Debug, Default)]
pub struct DenseIndex {
    rows: Vec<Vec<f32>>,
    dim: Option<usize>,
}

impl DenseIndex {
    /// Passages are encoded 8 at a time (memory bound).
    pub const PASSAGE_BATCH_SIZE: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows (passages) currently stored.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Embedding dimension, once established by the first append.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Encodes `texts` via `encoder` in batches of
    /// [`DenseIndex::PASSAGE_BATCH_SIZE`] and appends the resulting rows.
    /// Returns an error (and appends nothing) if any passage fails to
    /// encode or if a row's dimension disagrees with the index's
    /// established dimension.
    pub fn append(&mut self, texts: &[String], encoder: &dyn Encoder) -> Result<(), RetrieveError> {
        log::info!("encoding {} passages for dense index", texts.len());
        let mut new_rows = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(Self::PASSAGE_BATCH_SIZE) {
            let refs: Vec<&str> = chunk.iter().map(String::as_str).collect();
            let embeddings = encoder.encode_passages(&refs)?;
            if embeddings.len() != chunk.len() {
                return Err(RetrieveError::EncoderFailure(format!(
                    "encoder returned {} embeddings for a batch of {}",
                    embeddings.len(),
                    chunk.len()
                )));
            }
            new_rows.extend(embeddings);
        }
        self.push_rows(new_rows)
    }

    /// Appends already-encoded rows, validating them against the
    /// established dimension. Used by callers (e.g. `rank-rank`'s
    /// `HybridRetriever`) that encode ahead of time so the encode step
    /// can fail before any state is mutated.
    pub fn push_rows(&mut self, new_rows: Vec<Vec<f32>>) -> Result<(), RetrieveError> {
        for row in &new_rows {
            match self.dim {
                Some(d) if d != row.len() => {
                    return Err(RetrieveError::DimensionMismatch {
                        expected: d,
                        got: row.len(),
                    });
                }
                None => self.dim = Some(row.len()),
                _ => {}
            }
        }

        self.rows.extend(new_rows);
        log::info!("dense index now contains {} passages", self.rows.len());
        Ok(())
    }

    /// Removes all rows, resetting the established dimension.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.dim = None;
        log::info!("dense index cleared");
    }

    /// Replaces the entire matrix. Used by [`crate::corpus::CorpusManager`]
    /// style callers that rebuild after a per-document deletion.
    pub fn set_rows(&mut self, rows: Vec<Vec<f32>>) {
        self.dim = rows.first().map(|r| r.len());
        self.rows = rows;
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    /// Encodes `query` and returns the `top_k` rows by cosine similarity,
    /// sorted descending, ties broken by ascending `DocIndex`. An empty
    /// index returns an empty result without error.
    pub fn search(
        &self,
        query: &str,
        top_k: usize,
        encoder: &dyn Encoder,
    ) -> Result<Vec<(u32, f32)>, RetrieveError> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }
        let query_vec = encoder.encode_query(query)?;
        Ok(self.search_embedding(&query_vec, top_k))
    }

    /// Same as [`DenseIndex::search`] but takes an already-encoded query
    /// vector (used by callers that have cached the query embedding).
    pub fn search_embedding(&self, query_vec: &[f32], top_k: usize) -> Vec<(u32, f32)> {
        if self.rows.is_empty() || top_k == 0 {
            return Vec::new();
        }
        let query_norm = l2_norm(query_vec);
        let mut scored: Vec<(u32, f32)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i as u32, cosine_similarity(query_vec, row, query_norm)))
            .collect();
        scored.sort_by(|a, b| match b.1.partial_cmp(&a.1) {
            Some(ord) => ord.then_with(|| a.0.cmp(&b.0)),
            None => a.0.cmp(&b.0),
        });
        scored.truncate(top_k);
        scored
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity between `query` (with precomputed norm `query_norm`)
/// and `doc`. Returns 0.0 if either vector has zero norm, rather than
/// dividing by zero.
fn cosine_similarity(query: &[f32], doc: &[f32], query_norm: f32) -> f32 {
    let doc_norm = l2_norm(doc);
    if query_norm == 0.0 || doc_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = query.iter().zip(doc.iter()).map(|(a, b)| a * b).sum();
    dot / (query_norm * doc_norm)
}
