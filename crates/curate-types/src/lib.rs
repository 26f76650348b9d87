//! # Shared Types Crate
//!
//! Domain types shared across the Curate-Chain workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: hashes, addresses, matches, and the bundle
//!   wire format are defined here and nowhere else.
//! - **Fail-Fast Validation**: a [`Match`] that enters the pipeline has
//!   already passed [`validate_matches`]; downstream crates never re-check
//!   field shapes.
//! - **Hex-on-the-Wire**: 32-byte hashes, 20-byte addresses, and 65-byte
//!   signatures serialize as 0x-prefixed hex strings so published bundles
//!   are verifiable by any JSON-speaking party.

pub mod bundle;
pub mod crypto;
pub mod errors;
pub mod match_model;
pub mod primitives;

pub use bundle::{signing_digest, Bundle, BundleMetadata, CurationCriteria, BUNDLE_SCHEMA_VERSION};
pub use crypto::{recover_address, verify_signer, EcdsaSignature, SignatureError};
pub use errors::ValidationError;
pub use match_model::{
    validate_match, validate_matches, CastAuthor, CastContent, Match, QualitySignals,
};
pub use primitives::{keccak256, Address, Hash32};
