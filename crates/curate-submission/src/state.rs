//! # Submission Lifecycle State

use curate_registry::TxId;
use curate_types::{keccak256, Address, Hash32};
use serde::{Deserialize, Serialize};

/// Key identifying one curator's work on one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftKey {
    pub event_id: Hash32,
    pub actor: Address,
}

impl DraftKey {
    #[must_use]
    pub fn new(event_id: Hash32, actor: Address) -> Self {
        Self { event_id, actor }
    }

    /// Filesystem-safe identifier for this key: the hex Keccak-256 of
    /// `event_id ‖ actor`.
    #[must_use]
    pub fn storage_key(&self) -> String {
        let mut packed = [0u8; 52];
        packed[..32].copy_from_slice(self.event_id.as_bytes());
        packed[32..].copy_from_slice(self.actor.as_bytes());
        hex::encode(keccak256(&packed).as_bytes())
    }
}

/// Where a submission currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionPhase {
    /// Matches saved locally, nothing published.
    Draft,
    /// Deriving the pre-signature pointer and collecting the signature.
    Signing,
    /// Uploading the signed artifact.
    Uploading,
    /// Registering the pointer on chain.
    Publishing,
    /// Pointer registered; the submission is live.
    Submitted,
    /// A step failed; the draft is retained for retry.
    Failed,
}

/// Tracked lifecycle state for one `(event, actor)` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionState {
    pub phase: SubmissionPhase,
    pub last_saved_at: Option<u64>,
    pub last_submitted_at: Option<u64>,
    /// Latest upload attempt number, 1-based, during `Uploading`.
    pub upload_attempt: u32,
    pub content_pointer: Option<String>,
    pub tx_id: Option<TxId>,
    pub last_error: Option<String>,
}

impl Default for SubmissionState {
    fn default() -> Self {
        Self {
            phase: SubmissionPhase::Draft,
            last_saved_at: None,
            last_submitted_at: None,
            upload_attempt: 0,
            content_pointer: None,
            tx_id: None,
            last_error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_distinguishes_event_and_actor() {
        let base = DraftKey::new(Hash32([1; 32]), Address([2; 20]));
        let other_event = DraftKey::new(Hash32([9; 32]), Address([2; 20]));
        let other_actor = DraftKey::new(Hash32([1; 32]), Address([9; 20]));

        assert_eq!(base.storage_key(), base.storage_key());
        assert_ne!(base.storage_key(), other_event.storage_key());
        assert_ne!(base.storage_key(), other_actor.storage_key());
        // Hex only, safe as a file name.
        assert!(base.storage_key().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
