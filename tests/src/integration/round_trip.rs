//! # Publish / Fetch / Verify Round Trips
//!
//! The consumer-side contract: anything published under a pointer must
//! come back byte-identical, re-derive to the same commitment, and carry a
//! signature that recovers to the claimed submitter.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use curate_merkle::verify_proof;
    use curate_publisher::{
        fetch_and_verify, BundlePublisher, ContentStore, InMemoryContentStore, LocalSigner,
        PublisherConfig, RetryPolicy, VerifyError,
    };
    use curate_types::match_model::test_fixtures::sample_match;
    use curate_types::{keccak256, Bundle, BundleMetadata, Match, BUNDLE_SCHEMA_VERSION};

    fn publisher(
        store: Arc<InMemoryContentStore>,
        signer: Arc<LocalSigner>,
    ) -> BundlePublisher<InMemoryContentStore, LocalSigner> {
        BundlePublisher::new(
            store,
            signer,
            PublisherConfig {
                retry: RetryPolicy {
                    max_attempts: 2,
                    base_delay: Duration::from_millis(1),
                },
            },
        )
    }

    fn unsigned_bundle(signer: &LocalSigner, matches: Vec<Match>) -> Bundle {
        Bundle::new(
            keccak256(b"launch-ama"),
            matches,
            BundleMetadata {
                timestamp: 1_700_000_000,
                version: BUNDLE_SCHEMA_VERSION,
                submitter: signer.signer_address(),
                submitter_fid: Some("378".into()),
                event_title: "Launch AMA".into(),
                event_host: "host".into(),
                curation_criteria: None,
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_published_bytes_round_trip_identically() {
        let store = Arc::new(InMemoryContentStore::new());
        let signer = Arc::new(LocalSigner::random());
        let matches: Vec<Match> = (0..5).map(sample_match).collect();
        let bundle = unsigned_bundle(&signer, matches);

        let published = publisher(store.clone(), signer)
            .publish(bundle)
            .await
            .unwrap();

        // Byte identity: fetched bytes equal the canonical serialization of
        // the signed bundle, and re-address to the same pointer.
        let fetched = store.get(&published.pointer).await.unwrap();
        assert_eq!(fetched, published.bundle.canonical_bytes().unwrap());
        assert_eq!(store.content_id(&fetched), published.pointer);

        // The commitment re-derives from the fetched matches.
        let verified = fetch_and_verify(store.as_ref(), &published.pointer)
            .await
            .unwrap();
        assert_eq!(verified.bundle, published.bundle);
        assert_eq!(verified.digest, published.digest);
        for m in &verified.bundle.matches {
            let leaf = m.hash();
            let proof = published.merkle.proof_for(&leaf).unwrap();
            assert!(verify_proof(&leaf, proof, &published.merkle.root));
        }
    }

    #[tokio::test]
    async fn test_tampered_artifact_is_rejected() {
        let store = Arc::new(InMemoryContentStore::new());
        let signer = Arc::new(LocalSigner::random());
        let bundle = unsigned_bundle(&signer, (0..3).map(sample_match).collect());
        let published = publisher(store.clone(), signer)
            .publish(bundle)
            .await
            .unwrap();

        // Reorder the curated ranking and store the result as a new object.
        let mut forged = published.bundle.clone();
        forged.matches[0].ranking = 42;
        let forged_pointer = store
            .put(&forged.canonical_bytes().unwrap())
            .await
            .unwrap();

        assert!(matches!(
            fetch_and_verify(store.as_ref(), &forged_pointer).await,
            Err(VerifyError::RootMismatch { .. })
        ));
        // The original still verifies.
        fetch_and_verify(store.as_ref(), &published.pointer)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_two_curators_same_matches_different_bundles() {
        let store = Arc::new(InMemoryContentStore::new());
        let alice = Arc::new(LocalSigner::random());
        let bob = Arc::new(LocalSigner::random());
        let matches: Vec<Match> = (0..3).map(sample_match).collect();

        let a = publisher(store.clone(), alice.clone())
            .publish(unsigned_bundle(&alice, matches.clone()))
            .await
            .unwrap();
        let b = publisher(store.clone(), bob.clone())
            .publish(unsigned_bundle(&bob, matches))
            .await
            .unwrap();

        // Same match set, same commitment; different submitters, different
        // artifacts and digests.
        assert_eq!(a.merkle.root, b.merkle.root);
        assert_ne!(a.pointer, b.pointer);
        assert_ne!(a.digest, b.digest);

        let va = fetch_and_verify(store.as_ref(), &a.pointer).await.unwrap();
        let vb = fetch_and_verify(store.as_ref(), &b.pointer).await.unwrap();
        assert_eq!(va.signer, alice.signer_address());
        assert_eq!(vb.signer, bob.signer_address());
    }
}
