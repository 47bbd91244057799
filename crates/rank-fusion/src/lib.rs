//! Score-fusion primitives (C4).
//!
//! Four pure functions for combining two differently-scaled score
//! distributions into one ranking: [`min_max_normalize`],
//! [`z_score_normalize`], [`weighted_sum`], and [`rrf`] (reciprocal rank
//! fusion). None of these touch a corpus or a `DocIndex` space directly —
//! `rank-rank`'s `HybridRetriever` is the caller that threads BM25 and
//! dense score vectors through them.

mod error;

pub use error::FusionError;

/// Min-max normalizes `scores` into `[0, 1]`.
///
/// If `scores` has length <= 1, it is returned unchanged (nothing to
/// normalize against). If every value is equal, every output is `1.0`
/// (there is no informative spread, and it still lands in-range).
pub fn min_max_normalize(scores: &[f64]) -> Vec<f64> {
    if scores.len() <= 1 {
        return scores.to_vec();
    }
    let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![1.0; scores.len()];
    }
    scores.iter().map(|&s| (s - min) / (max - min)).collect()
}

/// Z-score normalizes `scores`: `(x - mean) / stddev`.
///
/// An empty input is returned unchanged. If the standard deviation is
/// zero (including the single-element case), every output is `0.0`.
pub fn z_score_normalize(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|&s| (s - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    if std.abs() < f64::EPSILON {
        return vec![0.0; scores.len()];
    }
    scores.iter().map(|&s| (s - mean) / std).collect()
}

/// Combines two equal-length score lists as `w1 * s1 + w2 * s2`,
/// elementwise.
///
/// When `normalize` is `true` (the common case, since BM25 and cosine
/// similarity live on very different scales), each side is min-max
/// normalized before the weighted sum. Fails with
/// [`FusionError::LengthMismatch`] if the two lists differ in length.
pub fn weighted_sum(
    s1: &[f64],
    s2: &[f64],
    w1: f64,
    w2: f64,
    normalize: bool,
) -> Result<Vec<f64>, FusionError> {
    if s1.len() != s2.len() {
        return Err(FusionError::LengthMismatch {
            len1: s1.len(),
            len2: s2.len(),
        });
    }
    let (a, b) = if normalize {
        (min_max_normalize(s1), min_max_normalize(s2))
    } else {
        (s1.to_vec(), s2.to_vec())
    };
    Ok(a.iter().zip(b.iter()).map(|(&x, &y)| w1 * x + w2 * y).collect())
}

/// Reciprocal Rank Fusion default constant.
pub const DEFAULT_RRF_K: f64 = 60.0;

/// Fuses two rankings (each a list of `DocIndex` in descending-rank
/// order — `list[0]` is rank 1) via Reciprocal Rank Fusion.
///
/// The RRF score for a doc is `sum(1 / (k + rank))`, summed only over
/// the lists it actually appears in — a doc present in just one list
/// still gets a well-defined score from that list's contribution alone.
/// Returns every doc that appears in *either* list, sorted by RRF score
/// descending, ties broken by `DocIndex` ascending for determinism.
pub fn rrf(list1: &[u32], list2: &[u32], k: f64) -> Vec<(u32, f64)> {
    use std::collections::HashMap;

    let mut scores: HashMap<u32, f64> = HashMap::new();
    for (rank, &doc) in list1.iter().enumerate() {
        *scores.entry(doc).or_insert(0.0) += 1.0 / (k + (rank + 1) as f64);
    }
    for (rank, &doc) in list2.iter().enumerate() {
        *scores.entry(doc).or_insert(0.0) += 1.0 / (k + (rank + 1) as f64);
    }

    let mut fused: Vec<(u32, f64)> = scores.into_iter().collect();
    fused.sort_by(|a, b| match b.1.partial_cmp(&a.1) {
        Some(ord) => ord.then_with(|| a.0.cmp(&b.0)),
        None => a.0.cmp(&b.0),
    });
    fused
}

/// Convenience wrapper over [`rrf`] using [`DEFAULT_RRF_K`].
pub fn rrf_default(list1: &[u32], list2: &[u32]) -> Vec<(u32, f64)> {
    rrf(list1, list2, DEFAULT_RRF_K)
}

/// Sorts a `DocIndex -> score` vector into a rank list (descending
/// score, ties broken by `DocIndex` ascending) suitable for [`rrf`].
pub fn scores_to_ranking(scores: &[f64]) -> Vec<u32> {
    let mut indexed: Vec<(u32, f64)> = scores
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as u32, s))
        .collect();
    indexed.sort_by(|a, b| match b.1.partial_cmp(&a.1) {
        Some(ord) => ord.then_with(|| a.0.cmp(&b.0)),
        None => a.0.cmp(&b.0),
    });
    indexed.into_iter().map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_bounds_and_hits_both_ends() {
        let out = min_max_normalize(&[1.0, 5.0, 3.0]);
        assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(out.contains(&0.0));
        assert!(out.contains(&1.0));
    }

    #[test]
    fn min_max_equal_values_yields_all_ones() {
        assert_eq!(min_max_normalize(&[2.0, 2.0, 2.0]), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn min_max_passthrough_for_short_input() {
        assert_eq!(min_max_normalize(&[]), Vec::<f64>::new());
        assert_eq!(min_max_normalize(&[7.0]), vec![7.0]);
    }

    #[test]
    fn z_score_zero_std_yields_zeros() {
        assert_eq!(z_score_normalize(&[4.0, 4.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn weighted_sum_rejects_length_mismatch() {
        let err = weighted_sum(&[1.0, 2.0], &[1.0], 0.5, 0.5, false).unwrap_err();
        assert_eq!(
            err,
            FusionError::LengthMismatch { len1: 2, len2: 1 }
        );
    }

    #[test]
    fn weighted_sum_without_normalize_is_plain_linear_combination() {
        let s = vec![1.0, 2.0, 3.0];
        let out = weighted_sum(&s, &s, 0.3, 0.7, false).unwrap();
        for (o, x) in out.iter().zip(s.iter()) {
            assert!((o - (0.3 + 0.7) * x).abs() < 1e-12);
        }
    }

    #[test]
    fn rrf_identical_lists_preserves_order() {
        let list = vec![10, 20, 30];
        let fused = rrf(&list, &list, DEFAULT_RRF_K);
        let order: Vec<u32> = fused.iter().map(|(d, _)| *d).collect();
        assert_eq!(order, list);
    }

    #[test]
    fn rrf_scores_are_positive_and_decreasing() {
        let list = vec![1, 2, 3];
        let fused = rrf(&list, &list, DEFAULT_RRF_K);
        assert!(fused.windows(2).all(|w| w[0].1 > w[1].1));
        assert!(fused.iter().all(|(_, s)| *s > 0.0));
    }

    #[test]
    fn rrf_reversed_lists_favors_split_extremes_over_consistent_middle() {
        // 1/(k+rank) is strictly convex, so the docs that split rank 1
        // and rank 3 between the two lists (doc 1, doc 3) out-score the
        // doc that is rank 2 in both (doc 2): 1/61 + 1/63 > 2/62.
        let a = vec![1, 2, 3];
        let b = vec![3, 2, 1];
        let fused = rrf(&a, &b, DEFAULT_RRF_K);
        assert_eq!(fused[0].0, 1);
        assert_eq!(fused[2].0, 2);
    }

    #[test]
    fn rrf_includes_docs_present_in_only_one_list() {
        let a = vec![1, 2];
        let b = vec![2, 3];
        let fused = rrf(&a, &b, DEFAULT_RRF_K);
        let docs: std::collections::HashSet<u32> = fused.iter().map(|(d, _)| *d).collect();
        assert_eq!(docs, [1, 2, 3].into_iter().collect());
    }

    #[test]
    fn scores_to_ranking_orders_descending() {
        assert_eq!(scores_to_ranking(&[0.1, 0.9, 0.5]), vec![1, 2, 0]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn min_max_output_always_in_unit_range(scores in proptest::collection::vec(-1000.0f64..1000.0, 2..50)) {
            let out = min_max_normalize(&scores);
            for v in out {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }

        #[test]
        fn weighted_sum_identity_without_normalize(
            scores in proptest::collection::vec(-100.0f64..100.0, 1..30),
            w1 in 0.0f64..5.0,
            w2 in 0.0f64..5.0,
        ) {
            let out = weighted_sum(&scores, &scores, w1, w2, false).unwrap();
            for (o, s) in out.iter().zip(scores.iter()) {
                prop_assert!((o - (w1 + w2) * s).abs() < 1e-6);
            }
        }
    }
}
