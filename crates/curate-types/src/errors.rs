//! # Validation Errors
//!
//! Raised when a match or bundle fails shape checks before entering the
//! pipeline. Validation failures are never retried.

use thiserror::Error;

/// A match or bundle failed validation. Each variant names the offending
/// field so callers can surface it directly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A content identifier is the zero hash.
    #[error("{field} must not be the zero hash")]
    ZeroHash { field: &'static str },

    /// A text field is empty.
    #[error("{field} must not be empty")]
    EmptyText { field: &'static str },

    /// An origin (cast) id is empty.
    #[error("{field} must carry a cast id")]
    EmptyCastId { field: &'static str },

    /// A timestamp is zero or missing.
    #[error("{field} must have a positive timestamp")]
    NonPositiveTimestamp { field: &'static str },

    /// An author fid is zero.
    #[error("{field} author must have a positive fid")]
    InvalidAuthorFid { field: &'static str },

    /// An author username is empty.
    #[error("{field} author must have a username")]
    EmptyAuthorUsername { field: &'static str },

    /// A quality score is outside [0, 1].
    #[error("{field} must lie in [0, 1], got {value}")]
    ScoreOutOfRange { field: &'static str, value: f64 },

    /// The bundle carries no matches at all.
    #[error("bundle contains no matches")]
    EmptyBundle,

    /// Two matches in one bundle share a ranking.
    #[error("duplicate ranking {ranking} within bundle")]
    DuplicateRanking { ranking: u64 },
}
