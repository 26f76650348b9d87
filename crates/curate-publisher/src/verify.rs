//! # Bundle Verification
//!
//! The consumer side of the publish contract: given only a content
//! pointer, fetch the bundle and check everything the publisher committed
//! to. Parsing is fail-closed; a bundle that cannot be fully verified is
//! rejected, never partially accepted.

use crate::errors::VerifyError;
use crate::ports::ContentStore;
use curate_types::{
    recover_address, signing_digest, validate_matches, verify_signer, Address, Bundle, Hash32,
};
use tracing::{debug, instrument};

/// A bundle that passed every verification step.
#[derive(Debug, Clone)]
pub struct VerifiedBundle {
    pub bundle: Bundle,
    /// Recomputed digest the signature was checked against.
    pub digest: Hash32,
    /// Address recovered from the signature; equals `metadata.submitter`.
    pub signer: Address,
}

/// Fetches the bundle at `pointer` and verifies it end to end:
///
/// 1. The bytes parse as a signed bundle with valid matches.
/// 2. The embedded Merkle root equals the root recomputed from the matches.
/// 3. Stripping the signature fields and re-serializing reproduces the
///    pre-signature pointer, whose digest the signature covers.
/// 4. The signature recovers to `metadata.submitter`.
#[instrument(skip(store))]
pub async fn fetch_and_verify<S: ContentStore>(
    store: &S,
    pointer: &str,
) -> Result<VerifiedBundle, VerifyError> {
    let bytes = store.get(pointer).await?;
    let bundle: Bundle = serde_json::from_slice(&bytes).map_err(|e| VerifyError::Malformed {
        pointer: pointer.to_string(),
        detail: e.to_string(),
    })?;

    let (embedded_root, signature) = match (bundle.merkle_root, bundle.signature.as_ref()) {
        (Some(root), Some(sig)) => (root, sig.clone()),
        _ => {
            return Err(VerifyError::Unsigned {
                pointer: pointer.to_string(),
            })
        }
    };

    validate_matches(&bundle.matches)?;
    let merkle = curate_merkle::build(&bundle.matches)?;
    if merkle.root != embedded_root {
        return Err(VerifyError::RootMismatch {
            embedded: embedded_root,
            computed: merkle.root,
        });
    }

    let unsigned = bundle.to_unsigned();
    let unsigned_bytes = unsigned
        .canonical_bytes()
        .map_err(|e| VerifyError::Malformed {
            pointer: pointer.to_string(),
            detail: e.to_string(),
        })?;
    let unsigned_pointer = store.content_id(&unsigned_bytes);
    let digest = signing_digest(&bundle.event_id, &unsigned_pointer, &embedded_root);

    verify_signer(&digest, &signature, bundle.metadata.submitter)?;
    let signer = recover_address(&digest, &signature)?;
    debug!(%signer, root = %embedded_root, "bundle verified");

    Ok(VerifiedBundle {
        bundle,
        digest,
        signer,
    })
}
