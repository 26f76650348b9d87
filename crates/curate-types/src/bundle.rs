//! # Bundle Wire Format
//!
//! The unit published to content-addressed storage: event id, ordered
//! matches, metadata, and — once signed — the Merkle root and signature.
//!
//! A bundle is immutable once published; a revision is a new bundle under a
//! new content pointer. Serialization is canonical because struct field
//! order is fixed, which is what lets a verifier strip the signature fields,
//! re-serialize, and recompute the pre-signature content pointer.

use crate::crypto::EcdsaSignature;
use crate::errors::ValidationError;
use crate::match_model::{validate_matches, Match};
use crate::primitives::{keccak256, Address, Hash32};
use serde::{Deserialize, Serialize};

/// Current bundle schema version.
pub const BUNDLE_SCHEMA_VERSION: u32 = 2;

// =============================================================================
// METADATA
// =============================================================================

/// Event-level curation guidance, set by the event host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurationCriteria {
    /// Topics the host asked curators to focus on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_topics: Option<Vec<String>>,
    /// Minimum quality the host expects, in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_threshold: Option<f64>,
    /// Free-form guidance text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curation_guidelines: Option<String>,
}

/// Bundle metadata block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Unix timestamp of submission, seconds.
    pub timestamp: u64,
    /// Schema version, see [`BUNDLE_SCHEMA_VERSION`].
    pub version: u32,
    /// On-chain address of the submitter; the signature must recover to it.
    pub submitter: Address,
    /// Submitter's social-graph id, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitter_fid: Option<String>,
    /// Event title, for display.
    pub event_title: String,
    /// Event host handle, for display.
    pub event_host: String,
    /// Host-provided curation guidance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curation_criteria: Option<CurationCriteria>,
}

// =============================================================================
// BUNDLE
// =============================================================================

/// A curation bundle. `merkle_root` and `signature` are absent in the
/// pre-signature artifact and present in the published one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// Curation event this bundle belongs to.
    pub event_id: Hash32,
    /// Curated pairings; order is the curated ranking and is significant.
    pub matches: Vec<Match>,
    /// Submission metadata.
    pub metadata: BundleMetadata,
    /// Merkle commitment over the match leaf hashes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merkle_root: Option<Hash32>,
    /// Submitter signature over the bundle digest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<EcdsaSignature>,
}

impl Bundle {
    /// Creates an unsigned bundle after validating its matches.
    pub fn new(
        event_id: Hash32,
        matches: Vec<Match>,
        metadata: BundleMetadata,
    ) -> Result<Self, ValidationError> {
        validate_matches(&matches)?;
        Ok(Self {
            event_id,
            matches,
            metadata,
            merkle_root: None,
            signature: None,
        })
    }

    /// Returns a copy with the signature fields stripped — the exact
    /// artifact whose content pointer is committed into the signing digest.
    #[must_use]
    pub fn to_unsigned(&self) -> Self {
        Self {
            merkle_root: None,
            signature: None,
            ..self.clone()
        }
    }

    /// Canonical JSON bytes of this bundle.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// True once both commitment fields are present.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.merkle_root.is_some() && self.signature.is_some()
    }
}

/// The digest a submitter signs: `keccak256(event_id ‖ content_pointer ‖
/// merkle_root)`, where `content_pointer` addresses the unsigned artifact.
#[must_use]
pub fn signing_digest(event_id: &Hash32, content_pointer: &str, merkle_root: &Hash32) -> Hash32 {
    let mut packed =
        Vec::with_capacity(64 + content_pointer.len());
    packed.extend_from_slice(event_id.as_bytes());
    packed.extend_from_slice(content_pointer.as_bytes());
    packed.extend_from_slice(merkle_root.as_bytes());
    keccak256(&packed)
}

// =============================================================================
// TESTS
// =============================================================================
