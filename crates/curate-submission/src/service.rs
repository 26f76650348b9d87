//! # Submission Service

use crate::errors::SubmissionError;
use crate::ports::{Draft, DraftStore};
use crate::state::{DraftKey, SubmissionPhase, SubmissionState};
use curate_merkle::MerkleData;
use curate_publisher::{
    BundlePublisher, ContentStore, PublisherConfig, RetryPolicy, Signer,
};
use curate_registry::{ChainClient, PointerRegistryClient, TxId};
use curate_types::{
    Bundle, BundleMetadata, CurationCriteria, Hash32, Match, BUNDLE_SCHEMA_VERSION,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, instrument, warn};

// =============================================================================
// CONTEXT & CONFIG
// =============================================================================

/// The effects a submission session runs against, built once per session
/// and passed in explicitly. A read-only session has no signer.
pub struct SubmissionContext<S, C, K, D>
where
    S: ContentStore,
    C: ChainClient,
    K: Signer,
    D: DraftStore,
{
    pub content_store: Arc<S>,
    pub chain: Arc<C>,
    pub signer: Option<Arc<K>>,
    pub draft_store: Arc<D>,
}

#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    /// Name the pointer registry contract is deployed under.
    pub registry_contract: String,
    /// Upload retry policy passed through to the publisher.
    pub retry: RetryPolicy,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            registry_contract: "pointer_registry".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// One submit call's input. Submitter identity and timestamps are filled
/// in by the service from the attached signer.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub event_id: Hash32,
    pub matches: Vec<Match>,
    pub event_title: String,
    pub event_host: String,
    pub submitter_fid: Option<String>,
    pub curation_criteria: Option<CurationCriteria>,
}

/// Result of a successful submit.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// Published content pointer, as registered on chain.
    pub pointer: String,
    /// Registry update transaction.
    pub tx_id: TxId,
    /// Commitment over the submitted matches.
    pub merkle: MerkleData,
    /// Digest the submitter signed.
    pub digest: Hash32,
    /// Final lifecycle state.
    pub state: SubmissionState,
}

/// Counters across the life of one service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmissionStats {
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

type SharedStates = Arc<Mutex<HashMap<DraftKey, SubmissionState>>>;

/// Orchestrates drafts and submits over an explicit context.
pub struct SubmissionService<S, C, K, D>
where
    S: ContentStore + 'static,
    C: ChainClient,
    K: Signer + 'static,
    D: DraftStore,
{
    ctx: SubmissionContext<S, C, K, D>,
    config: SubmissionConfig,
    states: SharedStates,
    in_flight: Arc<Mutex<HashSet<DraftKey>>>,
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl<S, C, K, D> SubmissionService<S, C, K, D>
where
    S: ContentStore + 'static,
    C: ChainClient,
    K: Signer + 'static,
    D: DraftStore,
{
    pub fn new(ctx: SubmissionContext<S, C, K, D>, config: SubmissionConfig) -> Self {
        Self {
            ctx,
            config,
            states: Arc::new(Mutex::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            started: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // DRAFTS
    // =========================================================================

    /// Saves (or overwrites) the draft for `event_id` under the session
    /// actor. Drafts are work in progress and are not validated.
    #[instrument(skip(self, matches), fields(matches = matches.len()))]
    pub async fn save_draft(
        &self,
        event_id: Hash32,
        matches: Vec<Match>,
    ) -> Result<DraftKey, SubmissionError> {
        let key = self.session_key(event_id).await?;
        let saved_at = unix_now();
        let draft = Draft {
            matches,
            last_saved_at: saved_at,
        };
        self.ctx.draft_store.save(&key, &draft).await?;
        update_state(&self.states, key, |state| {
            state.phase = SubmissionPhase::Draft;
            state.last_saved_at = Some(saved_at);
        });
        Ok(key)
    }

    pub async fn load_draft(&self, event_id: Hash32) -> Result<Option<Draft>, SubmissionError> {
        let key = self.session_key(event_id).await?;
        Ok(self.ctx.draft_store.load(&key).await?)
    }

    /// Discards the draft and resets the key's lifecycle state, so a
    /// later session starts from a clean Draft phase.
    pub async fn delete_draft(&self, event_id: Hash32) -> Result<(), SubmissionError> {
        let key = self.session_key(event_id).await?;
        self.ctx.draft_store.delete(&key).await?;
        lock(&self.states).insert(key, SubmissionState::default());
        Ok(())
    }

    // =========================================================================
    // SUBMIT
    // =========================================================================

    /// Runs the full pipeline for one event: validate, commit, sign, upload
    /// once, register the pointer on chain.
    ///
    /// Holds the per-key in-flight guard for the duration; a concurrent
    /// submit for the same `(event, actor)` is rejected with
    /// [`SubmissionError::InFlight`]. On failure the draft is retained and
    /// the originating error is returned unmodified; on success the draft
    /// is deleted.
    #[instrument(skip(self, request), fields(event_id = %request.event_id))]
    pub async fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let signer = self.ctx.signer.clone().ok_or(SubmissionError::Auth)?;
        let actor = signer.address().await?;
        let key = DraftKey::new(request.event_id, actor);

        let _guard =
            InFlightGuard::acquire(self.in_flight.clone(), key).ok_or(SubmissionError::InFlight)?;
        self.started.fetch_add(1, Ordering::Relaxed);

        match self.run(key, signer, request).await {
            Ok(outcome) => {
                self.succeeded.fetch_add(1, Ordering::Relaxed);
                Ok(outcome)
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                update_state(&self.states, key, |state| {
                    state.phase = SubmissionPhase::Failed;
                    state.last_error = Some(e.to_string());
                });
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        key: DraftKey,
        signer: Arc<K>,
        request: SubmissionRequest,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let submitted_at = unix_now();
        let metadata = BundleMetadata {
            timestamp: submitted_at,
            version: BUNDLE_SCHEMA_VERSION,
            submitter: key.actor,
            submitter_fid: request.submitter_fid,
            event_title: request.event_title,
            event_host: request.event_host,
            curation_criteria: request.curation_criteria,
        };
        let bundle = Bundle::new(request.event_id, request.matches, metadata)?;

        update_state(&self.states, key, |state| {
            state.phase = SubmissionPhase::Signing;
            state.upload_attempt = 0;
            state.last_error = None;
        });

        let states = self.states.clone();
        let publisher = BundlePublisher::new(
            self.ctx.content_store.clone(),
            signer,
            PublisherConfig {
                retry: self.config.retry,
            },
        )
        .with_attempt_hook(Arc::new(move |attempt| {
            update_state(&states, key, |state| {
                state.phase = SubmissionPhase::Uploading;
                state.upload_attempt = attempt;
            });
        }));
        let published = publisher.publish(bundle).await?;

        update_state(&self.states, key, |state| {
            state.phase = SubmissionPhase::Publishing;
            state.content_pointer = Some(published.pointer.clone());
        });

        let registry = PointerRegistryClient::new(
            self.ctx.chain.clone(),
            self.config.registry_contract.clone(),
            key.actor,
        );
        let tx_id = registry.update(key.event_id, &published.pointer).await?;

        let state = update_state(&self.states, key, |state| {
            state.phase = SubmissionPhase::Submitted;
            state.tx_id = Some(tx_id.clone());
            state.last_submitted_at = Some(submitted_at);
        });

        // The submission is live; a draft cleanup failure is not worth
        // failing it over.
        if let Err(e) = self.ctx.draft_store.delete(&key).await {
            warn!(error = %e, "draft cleanup after submit failed");
        }

        info!(pointer = %published.pointer, tx = %tx_id, "submission registered");
        Ok(SubmissionOutcome {
            pointer: published.pointer,
            tx_id,
            merkle: published.merkle,
            digest: published.digest,
            state,
        })
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Lifecycle state for one key, if any activity has been recorded.
    pub fn state_of(&self, key: &DraftKey) -> Option<SubmissionState> {
        lock(&self.states).get(key).cloned()
    }

    pub fn stats(&self) -> SubmissionStats {
        SubmissionStats {
            started: self.started.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    async fn session_key(&self, event_id: Hash32) -> Result<DraftKey, SubmissionError> {
        let signer = self.ctx.signer.as_ref().ok_or(SubmissionError::Auth)?;
        let actor = signer.address().await?;
        Ok(DraftKey::new(event_id, actor))
    }
}

// =============================================================================
// INTERNALS
// =============================================================================

/// RAII guard for the per-key in-flight set. Released on drop, so a
/// cancelled submit future frees its key.
struct InFlightGuard {
    set: Arc<Mutex<HashSet<DraftKey>>>,
    key: DraftKey,
}

impl InFlightGuard {
    fn acquire(set: Arc<Mutex<HashSet<DraftKey>>>, key: DraftKey) -> Option<Self> {
        let inserted = set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
        inserted.then_some(Self { set, key })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

fn lock(states: &SharedStates) -> std::sync::MutexGuard<'_, HashMap<DraftKey, SubmissionState>> {
    states.lock().unwrap_or_else(PoisonError::into_inner)
}

fn update_state(
    states: &SharedStates,
    key: DraftKey,
    f: impl FnOnce(&mut SubmissionState),
) -> SubmissionState {
    let mut guard = lock(states);
    let state = guard.entry(key).or_default();
    f(state);
    state.clone()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// =============================================================================
// TESTS
// =============================================================================
