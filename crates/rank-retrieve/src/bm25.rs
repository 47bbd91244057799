//! LexicalIndex (C2): BM25+ / BM25L scoring over the tokenized corpus.
//!
//! Maintains per-document term frequencies, document lengths, and the
//! global IDF table. A rebuild (`build`) is `O(total tokens)` and is
//! triggered on every corpus mutation; incremental updates are not
//! required at the scale this core targets (low tens of thousands of
//! passages).
//!
//! # BM25+ formula
//!
//! ```text
//! tf = doc_freqs[i][t]
//! num = tf * (k1 + 1)
//! den = tf + k1 * (1 - b + b * (doc_len[i] / avgdl))
//! term = idf[t] * (num / den + delta)
//! ```
//!
//! # BM25L formula
//!
//! ```text
//! ctd = tf / (1 - b + b * (doc_len[i] / avgdl))
//! term = idf[t] * ((k1 + 1) * ctd / (k1 + ctd)) + delta
//! ```
//!
//! Note the asymmetry: BM25+ sums `delta` *inside* the IDF-weighted
//! product; BM25L adds it *outside*. Both formulations appear in the
//! literature under these names; this is preserved deliberately rather
//! than "fixed" to match observed scores (see `DESIGN.md`).

use std::collections::HashMap;

/// Which BM25 variant to score with. The default is BM25+.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bm25Variant {
    /// BM25+: prevents negative/zero scores for common terms by summing
    /// `delta` inside the IDF-weighted product. Default delta: 1.0.
    Bm25Plus,
    /// BM25L: addresses over-penalization of long documents via a
    /// different length-normalization term (`ctd`), adding `delta`
    /// outside the IDF factor. Default delta: 0.5.
    Bm25L,
}

impl Default for Bm25Variant {
    fn default() -> Self {
        Bm25Variant::Bm25Plus
    }
}

/// BM25 parameters: term-frequency saturation (`k1`), length
/// normalization (`b`), the variant-specific additive constant
/// (`delta`), and which variant to use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term frequency saturation parameter. Default: 1.2.
    pub k1: f64,
    /// Length normalization parameter. Default: 0.75.
    pub b: f64,
    /// Variant-specific additive constant. Default: 1.0 for BM25+,
    /// 0.5 for BM25L.
    pub delta: f64,
    /// Which BM25 variant to score with.
    pub variant: Bm25Variant,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            delta: 1.0,
            variant: Bm25Variant::Bm25Plus,
        }
    }
}

impl Bm25Params {
    /// BM25+ with default `k1`/`b` and `delta = 1.0`.
    pub fn bm25_plus() -> Self {
        Self {
            variant: Bm25Variant::Bm25Plus,
            delta: 1.0,
            ..Self::default()
        }
    }

    /// BM25L with default `k1`/`b` and `delta = 0.5`.
    pub fn bm25l() -> Self {
        Self {
            variant: Bm25Variant::Bm25L,
            delta: 0.5,
            ..Self::default()
        }
    }
}

/// BM25+/BM25L index over a tokenized corpus.
///
/// Rebuilt wholesale on every mutation via [`LexicalIndex::build`]; there
/// is no incremental-update path. Scoring an empty corpus or an empty
/// query never errors (see [`LexicalIndex::score`]).
#[derive(Debug, Default)]
pub struct LexicalIndex {
    /// Per-document term -> count.
    doc_term_freqs: Vec<HashMap<String, u32>>,
    /// Per-document length in tokens.
    doc_len: Vec<u32>,
    /// Document frequency per term (number of documents containing it).
    doc_freqs: HashMap<String, u32>,
    /// `ln((N - df + 0.5) / (df + 0.5))`. Can be negative for very
    /// common terms; that is BM25-canonical and intentional.
    idf: HashMap<String, f64>,
    /// Mean token-length across passages. Zero for an empty corpus.
    avgdl: f64,
    params: Bm25Params,
}

impl LexicalIndex {
    /// Creates an empty index with the given parameters.
    pub fn new(params: Bm25Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Number of passages currently indexed.
    pub fn corpus_size(&self) -> usize {
        self.doc_term_freqs.len()
    }

    /// Mean token-length across passages (0.0 if empty).
    pub fn avgdl(&self) -> f64 {
        self.avgdl
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }

    pub fn set_params(&mut self, params: Bm25Params) {
        self.params = params;
    }

    /// Rebuilds all statistics from scratch given the full corpus of
    /// already-tokenized documents. `doc_len[i] = tokenized[i].len()`,
    /// `avgdl = sum(doc_len) / N` (0 if empty).
    pub fn build(&mut self, tokenized: &[Vec<String>]) {
        self.doc_term_freqs.clear();
        self.doc_len.clear();
        self.doc_freqs.clear();
        self.idf.clear();

        for doc in tokenized {
            let mut freqs: HashMap<String, u32> = HashMap::new();
            for term in doc {
                *freqs.entry(term.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *self.doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            self.doc_len.push(doc.len() as u32);
            self.doc_term_freqs.push(freqs);
        }

        let n = self.doc_term_freqs.len();
        self.avgdl = if n == 0 {
            0.0
        } else {
            self.doc_len.iter().map(|&l| l as f64).sum::<f64>() / n as f64
        };

        let n_f = n as f64;
        for (term, &df) in &self.doc_freqs {
            let df_f = df as f64;
            self.idf
                .insert(term.clone(), ((n_f - df_f + 0.5) / (df_f + 0.5)).ln());
        }
    }

    /// Scores every passage against `query_tokens`.
    ///
    /// Scoring an empty corpus returns an empty vector (not an error).
    /// Scoring with an empty query returns all zeros. Terms absent from a
    /// passage contribute zero; a passage's score is the sum of its
    /// per-token contributions.
    pub fn score(&self, query_tokens: &[String]) -> Vec<f64> {
        let n = self.corpus_size();
        if n == 0 {
            return Vec::new();
        }
        if query_tokens.is_empty() || self.avgdl == 0.0 {
            return vec![0.0; n];
        }

        let mut scores = vec![0.0f64; n];
        for i in 0..n {
            let doc_len = self.doc_len[i] as f64;
            let freqs = &self.doc_term_freqs[i];
            let mut score = 0.0f64;
            for term in query_tokens {
                let tf = match freqs.get(term) {
                    Some(&count) => count as f64,
                    None => continue,
                };
                let idf = *self.idf.get(term).unwrap_or(&0.0);

                let length_norm = 1.0 - self.params.b + self.params.b * (doc_len / self.avgdl);
                let term_score = match self.params.variant {
                    Bm25Variant::Bm25Plus => {
                        let num = tf * (self.params.k1 + 1.0);
                        let den = tf + self.params.k1 * length_norm;
                        idf * (num / den + self.params.delta)
                    }
                    Bm25Variant::Bm25L => {
                        let ctd = tf / length_norm;
                        idf * ((self.params.k1 + 1.0) * ctd / (self.params.k1 + ctd))
                            + self.params.delta
                    }
                };
                score += term_score;
            }
            scores[i] = score;
        }
        scores
    }
}
