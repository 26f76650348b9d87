//! # Submission Errors

use curate_publisher::PublishError;
use curate_registry::ChainError;
use curate_types::{SignatureError, ValidationError};
use thiserror::Error;

/// Errors from draft persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("draft store i/o: {detail}")]
    Io { detail: String },

    /// A stored draft did not parse. Fail-closed: never returned as an
    /// empty draft.
    #[error("stored draft is corrupt: {detail}")]
    Corrupt { detail: String },
}

/// Errors from the submission service. Originating errors are surfaced
/// unmodified through the transparent variants.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// No signer attached to this session.
    #[error("submission requires an attached signer")]
    Auth,

    /// A submit for the same `(event, actor)` key is already running.
    #[error("a submission for this event and actor is already in flight")]
    InFlight,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Draft(#[from] DraftError),
}
