//! # Publisher Errors

use curate_merkle::MerkleError;
use curate_types::{Hash32, SignatureError, ValidationError};
use thiserror::Error;

/// Errors from the content store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A single backend operation failed. Retryable.
    #[error("storage backend: {detail}")]
    Backend { detail: String },

    /// Upload retries exhausted.
    #[error("upload failed after {attempts} attempts: {last_error}")]
    Upload { attempts: u32, last_error: String },

    /// Fetch failed for a reason other than absence.
    #[error("fetch of {pointer} failed: {detail}")]
    Fetch { pointer: String, detail: String },

    /// No object under this pointer.
    #[error("no object at pointer {pointer}")]
    NotFound { pointer: String },
}

/// Errors from the publish pipeline. Each variant carries the originating
/// error unmodified; only storage failures are retried, and only inside
/// the bounded upload loop.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Canonical serialization failed.
    #[error("bundle encoding failed: {detail}")]
    Encoding { detail: String },
}

/// Errors from bundle verification. Verification is fail-closed: any
/// malformed or inconsistent artifact is an error, never a partial result.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The fetched bytes do not parse as a bundle.
    #[error("malformed bundle at {pointer}: {detail}")]
    Malformed { pointer: String, detail: String },

    /// The bundle carries no Merkle root or no signature.
    #[error("bundle at {pointer} is unsigned")]
    Unsigned { pointer: String },

    /// The embedded root does not match the root recomputed from matches.
    #[error("merkle root mismatch: embedded {embedded:?}, computed {computed:?}")]
    RootMismatch { embedded: Hash32, computed: Hash32 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}
