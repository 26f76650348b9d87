//! # Match Model
//!
//! Canonical representation of one curated question/answer pairing, the
//! denormalized content it carries, and the fail-fast validation that gates
//! entry into the commitment pipeline.
//!
//! The match hash — `keccak256(question_hash ‖ answer_hash ‖ ranking)` — is
//! the Merkle leaf value. It deliberately excludes display content and
//! annotations (so correcting a typo in the carried text does not move the
//! commitment) but includes the ranking (so reordering does).

use crate::errors::ValidationError;
use crate::primitives::{keccak256, Hash32};
use serde::{Deserialize, Serialize};

// =============================================================================
// CONTENT TYPES
// =============================================================================

/// Author of a thread item, as resolved by the social-graph provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastAuthor {
    /// Numeric social-graph id.
    pub fid: u64,
    /// Handle at resolution time.
    pub username: String,
}

/// Denormalized display copy of one side of a pairing. Carried so the bundle
/// is self-describing without re-fetching the source thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastContent {
    /// Item text.
    pub text: String,
    /// Origin id in the source thread.
    pub cast_id: String,
    /// Unix timestamp of the item, seconds.
    pub timestamp: u64,
    /// Resolved author.
    pub author: CastAuthor,
}

/// Optional curator annotations on a pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySignals {
    /// Relevance of the answer to the question, in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    /// Engagement the pairing attracted, in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,
    /// Free-form curator notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curator_notes: Option<String>,
}

// =============================================================================
// MATCH
// =============================================================================

/// One curated question/answer pairing within a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Content identifier of the question item.
    pub question_hash: Hash32,
    /// Content identifier of the answer item.
    pub answer_hash: Hash32,
    /// Curator's 0-based ordinal for this pairing. Ties are rejected within
    /// one bundle.
    pub ranking: u64,
    /// Display copy of the question.
    pub question_content: CastContent,
    /// Display copy of the answer.
    pub answer_content: CastContent,
    /// Optional topic category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Optional free-form tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Optional curator annotations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_signals: Option<QualitySignals>,
}

impl Match {
    /// The Merkle leaf value for this match:
    /// `keccak256(question_hash ‖ answer_hash ‖ ranking)` with the ranking
    /// packed as a 32-byte big-endian integer. Always recomputed, never
    /// stored.
    #[must_use]
    pub fn hash(&self) -> Hash32 {
        let mut packed = Vec::with_capacity(96);
        packed.extend_from_slice(self.question_hash.as_bytes());
        packed.extend_from_slice(self.answer_hash.as_bytes());
        packed.extend_from_slice(&[0u8; 24]);
        packed.extend_from_slice(&self.ranking.to_be_bytes());
        keccak256(&packed)
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Validates a single match. Fails fast on the first violation.
pub fn validate_match(m: &Match) -> Result<(), ValidationError> {
    if m.question_hash.is_zero() {
        return Err(ValidationError::ZeroHash {
            field: "question_hash",
        });
    }
    if m.answer_hash.is_zero() {
        return Err(ValidationError::ZeroHash {
            field: "answer_hash",
        });
    }
    validate_content(&m.question_content, "question_content")?;
    validate_content(&m.answer_content, "answer_content")?;
    if let Some(signals) = &m.quality_signals {
        validate_score(signals.relevance_score, "quality_signals.relevance_score")?;
        validate_score(signals.engagement_score, "quality_signals.engagement_score")?;
    }
    Ok(())
}

/// Validates a full match list: non-empty, every match valid, rankings
/// unique. No partial acceptance — the first violation aborts.
pub fn validate_matches(matches: &[Match]) -> Result<(), ValidationError> {
    if matches.is_empty() {
        return Err(ValidationError::EmptyBundle);
    }
    let mut seen = std::collections::HashSet::with_capacity(matches.len());
    for m in matches {
        validate_match(m)?;
        if !seen.insert(m.ranking) {
            return Err(ValidationError::DuplicateRanking { ranking: m.ranking });
        }
    }
    Ok(())
}

fn validate_content(content: &CastContent, field: &'static str) -> Result<(), ValidationError> {
    if content.text.trim().is_empty() {
        return Err(ValidationError::EmptyText { field });
    }
    if content.cast_id.is_empty() {
        return Err(ValidationError::EmptyCastId { field });
    }
    if content.timestamp == 0 {
        return Err(ValidationError::NonPositiveTimestamp { field });
    }
    if content.author.fid == 0 {
        return Err(ValidationError::InvalidAuthorFid { field });
    }
    if content.author.username.is_empty() {
        return Err(ValidationError::EmptyAuthorUsername { field });
    }
    Ok(())
}

fn validate_score(score: Option<f64>, field: &'static str) -> Result<(), ValidationError> {
    if let Some(value) = score {
        if !(0.0..=1.0).contains(&value) || value.is_nan() {
            return Err(ValidationError::ScoreOutOfRange { field, value });
        }
    }
    Ok(())
}

// =============================================================================
// TEST HELPERS
// =============================================================================

/// Builders for tests across the workspace.
pub mod test_fixtures {
    use super::*;

    /// A valid match with deterministic hashes derived from the ranking.
    #[must_use]
    pub fn sample_match(ranking: u64) -> Match {
        Match {
            question_hash: keccak256(format!("question-{ranking}").as_bytes()),
            answer_hash: keccak256(format!("answer-{ranking}").as_bytes()),
            ranking,
            question_content: CastContent {
                text: format!("What about topic {ranking}?"),
                cast_id: format!("cast_q{ranking}"),
                timestamp: 1_700_000_000 + ranking,
                author: CastAuthor {
                    fid: 378,
                    username: "curator".into(),
                },
            },
            answer_content: CastContent {
                text: format!("Here is the answer to {ranking}."),
                cast_id: format!("cast_a{ranking}"),
                timestamp: 1_700_000_100 + ranking,
                author: CastAuthor {
                    fid: 379,
                    username: "host".into(),
                },
            },
            category: Some("general".into()),
            tags: Some(vec!["qa".into()]),
            quality_signals: Some(QualitySignals {
                relevance_score: Some(0.8),
                engagement_score: Some(0.7),
                curator_notes: Some("solid pairing".into()),
            }),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
