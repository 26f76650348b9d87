//! # Chain Errors

use curate_gate::GateError;
use thiserror::Error;

/// Errors surfaced by chain reads, writes, and event queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The participation gate refused the write. No state changed.
    #[error("write rejected by participation gate: {0}")]
    Rejected(#[from] GateError),

    /// The contract reverted for a non-gate reason.
    #[error("transaction reverted: {reason}")]
    Reverted { reason: String },

    /// A chain response or call argument did not have the expected shape.
    /// Parsing is fail-closed: nothing is defaulted or coerced.
    #[error("malformed chain payload: {detail}")]
    BadPayload { detail: String },

    /// No contract deployed under this name.
    #[error("unknown contract: {contract}")]
    UnknownContract { contract: String },

    /// The contract does not expose this method.
    #[error("unknown method: {method}")]
    UnknownMethod { method: String },
}

impl ChainError {
    pub(crate) fn bad_payload(detail: impl Into<String>) -> Self {
        Self::BadPayload {
            detail: detail.into(),
        }
    }
}
