//! # End-to-End Submission Flows
//!
//! Full-stack choreography over the in-memory adapters: draft store,
//! content store, chain with embedded participation gate, and local
//! signer, driven through the submission service exactly as a client
//! session would.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use curate_gate::{GateConfig, GateError, SCORE_SCALE};
    use curate_merkle::verify_proof;
    use curate_publisher::{
        fetch_and_verify, InMemoryContentStore, LocalSigner, RetryPolicy,
    };
    use curate_registry::{
        adapters::memory::REGISTRY_CONTRACT, ChainClient, ChainError, InMemoryChain,
        PointerRegistryClient,
    };
    use curate_submission::{
        FileDraftStore, MemoryDraftStore, SubmissionConfig, SubmissionContext, SubmissionError,
        SubmissionPhase, SubmissionRequest, SubmissionService,
    };
    use curate_types::match_model::test_fixtures::sample_match;
    use curate_types::{Address, Hash32, Match};
    use serde_json::json;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const OWNER: Address = Address([0xAA; 20]);

    fn fast_config() -> SubmissionConfig {
        SubmissionConfig {
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
            },
            ..SubmissionConfig::default()
        }
    }

    fn request(event: u8, matches: Vec<Match>) -> SubmissionRequest {
        SubmissionRequest {
            event_id: Hash32([event; 32]),
            matches,
            event_title: "Launch AMA".into(),
            event_host: "host".into(),
            submitter_fid: Some("378".into()),
            curation_criteria: None,
        }
    }

    fn service_over(
        chain: Arc<InMemoryChain>,
        store: Arc<InMemoryContentStore>,
        signer: Arc<LocalSigner>,
    ) -> SubmissionService<InMemoryContentStore, InMemoryChain, LocalSigner, MemoryDraftStore> {
        SubmissionService::new(
            SubmissionContext {
                content_store: store,
                chain,
                signer: Some(signer),
                draft_store: Arc::new(MemoryDraftStore::new()),
            },
            fast_config(),
        )
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    /// The canonical three-match flow: draft, submit, then confirm every
    /// artifact a downstream consumer would check.
    #[tokio::test]
    async fn test_three_match_submit_end_to_end() {
        let chain = Arc::new(InMemoryChain::new(OWNER));
        let store = Arc::new(InMemoryContentStore::new());
        let signer = Arc::new(LocalSigner::random());
        let actor = signer.signer_address();
        let service = service_over(chain.clone(), store.clone(), signer);

        let matches: Vec<Match> = (0..3).map(sample_match).collect();
        let event = Hash32([1; 32]);
        service.save_draft(event, matches.clone()).await.unwrap();

        let outcome = service.submit(request(1, matches.clone())).await.unwrap();
        assert_eq!(outcome.state.phase, SubmissionPhase::Submitted);
        assert!(!outcome.pointer.is_empty());

        // Registry points at the published bundle and records one update.
        let registry = PointerRegistryClient::new(chain.clone(), REGISTRY_CONTRACT, actor);
        assert_eq!(
            registry.current(event).await.unwrap(),
            Some(outcome.pointer.clone())
        );
        let history = registry.history(event).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].pointer, outcome.pointer);

        // The bundle verifies end to end from the pointer alone.
        let verified = fetch_and_verify(store.as_ref(), &outcome.pointer)
            .await
            .unwrap();
        assert_eq!(verified.signer, actor);
        assert_eq!(verified.bundle.metadata.submitter, actor);

        // Every match is provably a member of the committed tree.
        for m in &matches {
            let leaf = m.hash();
            let proof = outcome.merkle.proof_for(&leaf).unwrap();
            assert!(verify_proof(&leaf, proof, &outcome.merkle.root));
        }

        // The draft was consumed by the successful submit.
        assert_eq!(service.load_draft(event).await.unwrap(), None);
        // Reputation accrued on chain.
        assert!(chain.reputation_of(actor).await.base_score > 0);
    }

    /// A gated event rejects fresh actors until they earn reputation on
    /// open events.
    #[tokio::test]
    async fn test_reputation_unlocks_gated_event() {
        // Zero cooldown so reputation can be accrued back to back.
        let chain = Arc::new(InMemoryChain::with_gate_config(
            OWNER,
            GateConfig {
                base_cooldown_secs: 0,
                ..GateConfig::default()
            },
        ));
        let store = Arc::new(InMemoryContentStore::new());
        let signer = Arc::new(LocalSigner::random());
        let actor = signer.signer_address();
        let service = service_over(chain.clone(), store, signer);

        // Owner requires 3000 effective score on the flagship event.
        let gated = Hash32([50; 32]);
        chain
            .write(
                OWNER,
                REGISTRY_CONTRACT,
                "configureEvent",
                json!({ "scope": gated, "minQualityScore": 3000 }),
            )
            .await
            .unwrap();

        let matches: Vec<Match> = (0..2).map(sample_match).collect();
        let err = service.submit(request(50, matches.clone())).await.unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::Chain(ChainError::Rejected(GateError::InsufficientQuality {
                required: 3000,
                effective: 0,
            }))
        ));

        // Build reputation on open events until the bar clears.
        let mut open_event = 100u8;
        while chain.reputation_of(actor).await.effective_score() < 3000 {
            service
                .submit(request(open_event, matches.clone()))
                .await
                .unwrap();
            open_event += 1;
        }
        assert!(chain.reputation_of(actor).await.effective_score() <= SCORE_SCALE);

        let outcome = service.submit(request(50, matches)).await.unwrap();
        assert_eq!(outcome.state.phase, SubmissionPhase::Submitted);
    }

    /// Revisions land as new pointers; history keeps every version and the
    /// registry serves the newest.
    #[tokio::test]
    async fn test_revision_appends_history() {
        let chain = Arc::new(InMemoryChain::with_gate_config(
            OWNER,
            GateConfig {
                base_cooldown_secs: 0,
                ..GateConfig::default()
            },
        ));
        let store = Arc::new(InMemoryContentStore::new());
        let signer = Arc::new(LocalSigner::random());
        let actor = signer.signer_address();
        let service = service_over(chain.clone(), store, signer);

        let v1 = service
            .submit(request(1, (0..2).map(sample_match).collect()))
            .await
            .unwrap();
        let v2 = service
            .submit(request(1, (0..4).map(sample_match).collect()))
            .await
            .unwrap();
        assert_ne!(v1.pointer, v2.pointer);

        let registry = PointerRegistryClient::new(chain, REGISTRY_CONTRACT, actor);
        assert_eq!(
            registry.current(Hash32([1; 32])).await.unwrap(),
            Some(v2.pointer.clone())
        );
        let history = registry.history(Hash32([1; 32])).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].pointer, v1.pointer);
        assert_eq!(history[1].pointer, v2.pointer);
    }

    /// The same flow holds with drafts on disk.
    #[tokio::test]
    async fn test_submit_with_file_draft_store() {
        let dir = tempfile::tempdir().unwrap();
        let chain = Arc::new(InMemoryChain::new(OWNER));
        let store = Arc::new(InMemoryContentStore::new());
        let service = SubmissionService::new(
            SubmissionContext {
                content_store: store,
                chain,
                signer: Some(Arc::new(LocalSigner::random())),
                draft_store: Arc::new(FileDraftStore::new(dir.path())),
            },
            fast_config(),
        );

        let event = Hash32([7; 32]);
        let matches: Vec<Match> = (0..2).map(sample_match).collect();
        service.save_draft(event, matches.clone()).await.unwrap();
        assert!(service.load_draft(event).await.unwrap().is_some());

        service.submit(request(7, matches)).await.unwrap();
        assert_eq!(service.load_draft(event).await.unwrap(), None);
    }

    /// A session without a signer can read but not write.
    #[tokio::test]
    async fn test_read_only_session() {
        let chain = Arc::new(InMemoryChain::new(OWNER));
        let store = Arc::new(InMemoryContentStore::new());
        let service: SubmissionService<_, _, LocalSigner, _> = SubmissionService::new(
            SubmissionContext {
                content_store: store,
                chain,
                signer: None,
                draft_store: Arc::new(MemoryDraftStore::new()),
            },
            fast_config(),
        );

        assert!(matches!(
            service
                .submit(request(1, vec![sample_match(0)]))
                .await
                .unwrap_err(),
            SubmissionError::Auth
        ));
    }
}
