//! # Reputation
//!
//! Per-actor reputation state. Reputation only grows through accepted
//! participations; there is no slashing mechanism, so scores are
//! non-decreasing and only the cooldown timestamp ever "expires".

use serde::{Deserialize, Serialize};

/// Fixed-point scale shared by scores, multipliers, and event thresholds.
pub const SCORE_SCALE: u64 = 10_000;

/// Base score gained per accepted submission.
pub const BASE_SCORE_STEP: u64 = 500;

/// Quality multiplier gained per accepted submission (starts at 1.0×).
pub const MULTIPLIER_STEP: u64 = 250;

/// Upper bound on the quality multiplier (2.0×).
pub const MULTIPLIER_CAP: u64 = 2 * SCORE_SCALE;

/// Per-actor reputation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reputation {
    /// Accrued base score, capped at [`SCORE_SCALE`].
    pub base_score: u64,
    /// Quality multiplier in fixed-point, `SCORE_SCALE` = 1.0×.
    pub quality_multiplier: u64,
    /// Unix timestamp before which the actor may not participate again.
    pub cooldown_until: u64,
}

impl Default for Reputation {
    fn default() -> Self {
        Self {
            base_score: 0,
            quality_multiplier: SCORE_SCALE,
            cooldown_until: 0,
        }
    }
}

impl Reputation {
    /// Derived score used for both quality gating and cooldown scaling:
    /// `min(SCORE_SCALE, base_score * quality_multiplier / SCORE_SCALE)`.
    #[must_use]
    pub fn effective_score(&self) -> u64 {
        (self.base_score * self.quality_multiplier / SCORE_SCALE).min(SCORE_SCALE)
    }

    /// Accrues one accepted submission. Scores never decrease.
    pub fn accrue(&mut self) {
        self.base_score = (self.base_score + BASE_SCORE_STEP).min(SCORE_SCALE);
        self.quality_multiplier = (self.quality_multiplier + MULTIPLIER_STEP).min(MULTIPLIER_CAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_actor_has_zero_effective_score() {
        assert_eq!(Reputation::default().effective_score(), 0);
    }

    #[test]
    fn test_accrual_is_monotonic_and_capped() {
        let mut rep = Reputation::default();
        let mut previous = 0;
        for _ in 0..50 {
            rep.accrue();
            let score = rep.effective_score();
            assert!(score >= previous);
            previous = score;
        }
        assert_eq!(rep.base_score, SCORE_SCALE);
        assert_eq!(rep.quality_multiplier, MULTIPLIER_CAP);
        assert_eq!(rep.effective_score(), SCORE_SCALE);
    }

    #[test]
    fn test_multiplier_amplifies_base() {
        let mut rep = Reputation::default();
        // 6 accepted submissions: base 3000, multiplier 1.15x => 3450... but
        // what matters for cooldown scaling is crossing 5000 eventually.
        for _ in 0..6 {
            rep.accrue();
        }
        assert_eq!(rep.base_score, 3000);
        assert_eq!(rep.quality_multiplier, 11_500);
        assert_eq!(rep.effective_score(), 3450);
    }
}
