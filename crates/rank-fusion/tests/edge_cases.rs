//! Edge cases for score fusion that are easy to get subtly wrong:
//! length mismatches, degenerate (all-equal) inputs, and RRF's
//! union-of-both-lists semantics when a doc appears in only one list.

use rank_fusion::*;

#[test]
fn weighted_sum_propagates_length_mismatch_through_normalize_path() {
    let err = weighted_sum(&[1.0, 2.0, 3.0], &[1.0, 2.0], 0.6, 0.4, true).unwrap_err();
    assert_eq!(err, FusionError::LengthMismatch { len1: 3, len2: 2 });
}

#[test]
fn rrf_disjoint_lists_scores_each_doc_from_its_single_list_only() {
    let lexical_ranking = vec![1, 2, 3];
    let dense_ranking = vec![4, 5, 6];
    let fused = rrf_default(&lexical_ranking, &dense_ranking);
    assert_eq!(fused.len(), 6);
    // Rank-1 in either list scores identically since neither doc
    // benefits from a second list's contribution.
    let score_of = |doc: u32| fused.iter().find(|(d, _)| *d == doc).unwrap().1;
    assert!((score_of(1) - score_of(4)).abs() < 1e-12);
}

#[test]
fn z_score_normalize_roundtrips_mean_to_zero() {
    let scores = vec![10.0, 20.0, 30.0, 40.0];
    let out = z_score_normalize(&scores);
    let mean: f64 = out.iter().sum::<f64>() / out.len() as f64;
    assert!(mean.abs() < 1e-9);
}

#[test]
fn scores_to_ranking_then_rrf_matches_manual_weighted_intuition() {
    let bm25 = vec![0.5, 0.9, 0.1];
    let dense = vec![0.2, 0.3, 0.8];
    let bm25_rank = scores_to_ranking(&bm25);
    let dense_rank = scores_to_ranking(&dense);
    let fused = rrf_default(&bm25_rank, &dense_rank);
    // Doc 1 is top of bm25 and second in dense: should outrank doc 2,
    // which is last in bm25 despite topping dense.
    let rank_of = |doc: u32| fused.iter().position(|(d, _)| *d == doc).unwrap();
    assert!(rank_of(1) < rank_of(2));
}
