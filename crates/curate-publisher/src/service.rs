//! # Publish Pipeline

use crate::errors::{PublishError, StorageError};
use crate::ports::{ContentStore, Signer};
use crate::retry::{AttemptHook, RetryPolicy};
use curate_merkle::MerkleData;
use curate_types::{signing_digest, validate_matches, verify_signer, Bundle, Hash32};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Publisher configuration, constructed per process and passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublisherConfig {
    pub retry: RetryPolicy,
}

/// Result of a successful publish.
#[derive(Debug, Clone)]
pub struct PublishedBundle {
    /// The signed bundle as uploaded.
    pub bundle: Bundle,
    /// Commitment over the bundle's matches.
    pub merkle: MerkleData,
    /// Pointer to the published artifact; this is what the registry stores.
    pub pointer: String,
    /// Pointer of the pre-signature artifact, as committed into `digest`.
    pub unsigned_pointer: String,
    /// The digest the submitter signed.
    pub digest: Hash32,
}

/// Drives the publish pipeline: commit, sign, upload once.
pub struct BundlePublisher<S: ContentStore, K: Signer> {
    store: Arc<S>,
    signer: Arc<K>,
    config: PublisherConfig,
    attempt_hook: Option<AttemptHook>,
}

impl<S: ContentStore, K: Signer> BundlePublisher<S, K> {
    pub fn new(store: Arc<S>, signer: Arc<K>, config: PublisherConfig) -> Self {
        Self {
            store,
            signer,
            config,
            attempt_hook: None,
        }
    }

    /// Installs a progress hook invoked with the attempt number before each
    /// upload attempt.
    #[must_use]
    pub fn with_attempt_hook(mut self, hook: AttemptHook) -> Self {
        self.attempt_hook = Some(hook);
        self
    }

    /// Publishes an unsigned bundle.
    ///
    /// Steps: validate matches, build the Merkle commitment, derive the
    /// pre-signature pointer locally, sign the digest, embed root and
    /// signature, upload the final artifact once (with bounded retries).
    /// The signature is checked against `metadata.submitter` before
    /// anything is uploaded.
    #[instrument(skip(self, bundle), fields(event_id = %bundle.event_id, matches = bundle.matches.len()))]
    pub async fn publish(&self, bundle: Bundle) -> Result<PublishedBundle, PublishError> {
        validate_matches(&bundle.matches)?;
        let merkle = curate_merkle::build(&bundle.matches)?;

        let unsigned = bundle.to_unsigned();
        let unsigned_bytes = encode(&unsigned)?;
        let unsigned_pointer = self.store.content_id(&unsigned_bytes);

        let digest = signing_digest(&unsigned.event_id, &unsigned_pointer, &merkle.root);
        let signature = self.signer.sign(&digest).await?;
        verify_signer(&digest, &signature, unsigned.metadata.submitter)?;

        let mut signed = unsigned;
        signed.merkle_root = Some(merkle.root);
        signed.signature = Some(signature);
        let signed_bytes = encode(&signed)?;

        let pointer = self.upload_with_retry(&signed_bytes).await?;
        debug!(%pointer, root = %merkle.root, "bundle published");

        Ok(PublishedBundle {
            bundle: signed,
            merkle,
            pointer,
            unsigned_pointer,
            digest,
        })
    }

    /// Unpins all but the newest `keep_latest` pointers. Best-effort: a
    /// failed unpin is logged and skipped, never surfaced to the caller.
    /// `pointers` is expected oldest-first. Returns the number unpinned.
    #[instrument(skip(self, pointers), fields(total = pointers.len()))]
    pub async fn unpin_stale(&self, pointers: &[String], keep_latest: usize) -> usize {
        let stale = pointers.len().saturating_sub(keep_latest);
        let mut unpinned = 0;
        for pointer in &pointers[..stale] {
            match self.store.unpin(pointer).await {
                Ok(()) => unpinned += 1,
                Err(e) => warn!(%pointer, error = %e, "unpin failed, skipping"),
            }
        }
        unpinned
    }

    async fn upload_with_retry(&self, bytes: &[u8]) -> Result<String, StorageError> {
        let policy: RetryPolicy = self.config.retry;
        let mut last_error = String::new();

        for attempt in 1..=policy.max_attempts.max(1) {
            if let Some(hook) = &self.attempt_hook {
                hook(attempt);
            }
            let delay = policy.delay_before(attempt);
            if !delay.is_zero() {
                sleep(delay).await;
            }

            match self.store.put(bytes).await {
                Ok(pointer) => return Ok(pointer),
                Err(e) => {
                    warn!(attempt, error = %e, "upload attempt failed");
                    last_error = e.to_string();
                }
            }
        }

        Err(StorageError::Upload {
            attempts: policy.max_attempts.max(1),
            last_error,
        })
    }
}

fn encode(bundle: &Bundle) -> Result<Vec<u8>, PublishError> {
    bundle.canonical_bytes().map_err(|e| PublishError::Encoding {
        detail: e.to_string(),
    })
}
