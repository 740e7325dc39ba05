//! Linter Result Scoring
//!
//! Both linters are reduced to the same 0-10 score so their results can be
//! compared and classified the same way.
//!
//! # Scoring Formula
//!
//! ```text
//! score = clamp(10 - penalty / objects × 5, 0, 10)    (rounded to 2 decimals)
//! score = 0                                            when objects = 0
//! ```
//!
//! An item with nothing to check is scored as the worst case rather than
//! passing by omission.
//!
//! # Penalties (visuals linter)
//!
//! - Error finding: 2
//! - Warning finding: 1
//! - Info finding: 0
//! - A rule that failed outright counts as 5 findings
//!
//! # Tiers
//!
//! - `score >= 8`: Excellent
//! - `6 <= score < 8`: Needs attention
//! - `score < 6`: Poor (fails the run)

pub mod normalize;

pub use normalize::{
    count_report_objects, extract_json_object, normalize_model_output, normalize_visuals_output,
    parse_inspector_output, FindingSeverity, VisualFinding,
};

use crate::models::ScoreTier;

pub const MAX_SCORE: f64 = 10.0;
pub const EXCELLENT_THRESHOLD: f64 = 8.0;
pub const ATTENTION_THRESHOLD: f64 = 6.0;

/// Score points lost per unit of penalty per object
const PENALTY_SCALE: f64 = 5.0;

/// Round to 2 decimals, halves to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Shared score formula
pub fn score_from_penalty(penalty: f64, objects: u64) -> f64 {
    if objects == 0 {
        return 0.0;
    }
    let raw = MAX_SCORE - penalty / objects as f64 * PENALTY_SCALE;
    round2(raw.clamp(0.0, MAX_SCORE))
}

/// Classify a score. Lower bounds are inclusive; NaN is poor.
pub fn classify_score(score: f64) -> ScoreTier {
    if score >= EXCELLENT_THRESHOLD {
        ScoreTier::Excellent
    } else if score >= ATTENTION_THRESHOLD {
        ScoreTier::NeedsAttention
    } else {
        ScoreTier::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_objects_scores_zero() {
        assert_eq!(score_from_penalty(0.0, 0), 0.0);
        assert_eq!(score_from_penalty(42.0, 0), 0.0);
    }

    #[test]
    fn test_score_formula_matches_clamp() {
        for p in 0..60u64 {
            for n in 1..25u64 {
                let expected = round2((10.0 - 5.0 * p as f64 / n as f64).clamp(0.0, 10.0));
                let score = score_from_penalty(p as f64, n);
                assert!(
                    (score - expected).abs() < 1e-9,
                    "p={} n={} got {} expected {}",
                    p,
                    n,
                    score,
                    expected
                );
                assert!((0.0..=10.0).contains(&score));
            }
        }
    }

    #[test]
    fn test_score_examples() {
        assert_eq!(score_from_penalty(0.0, 4), 10.0);
        assert_eq!(score_from_penalty(1.0, 3), 8.33);
        assert_eq!(score_from_penalty(10.0, 2), 0.0);
    }

    #[test]
    fn test_halves_round_to_even() {
        // 10 - 3/8 * 5 = 8.125
        assert_eq!(score_from_penalty(3.0, 8), 8.12);
        // 10 - 1/8 * 5 = 9.375
        assert_eq!(score_from_penalty(1.0, 8), 9.38);
        assert_eq!(score_from_penalty(801.0, 1000), 6.0);
        assert_eq!(round2(0.125), 0.12);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(classify_score(10.0), ScoreTier::Excellent);
        assert_eq!(classify_score(8.0), ScoreTier::Excellent);
        assert_eq!(classify_score(7.99), ScoreTier::NeedsAttention);
        assert_eq!(classify_score(6.0), ScoreTier::NeedsAttention);
        assert_eq!(classify_score(5.99), ScoreTier::Poor);
        assert_eq!(classify_score(0.0), ScoreTier::Poor);
        assert_eq!(classify_score(f64::NAN), ScoreTier::Poor);
    }
}
