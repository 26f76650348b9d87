//! # ECDSA Signatures (secp256k1)
//!
//! Signature creation and verification for curation bundles. Signatures are
//! Ethereum-style: 65 bytes `r ‖ s ‖ v` over a Keccak-256 prehash, with the
//! signer identified by the last 20 bytes of the Keccak-256 of their
//! uncompressed public key.
//!
//! ## Security Notes
//!
//! - S values are normalized to the lower half of the curve order at signing
//!   time and rejected otherwise at verification time (malleability).
//! - Verification never needs the private key; callers hold keys behind a
//!   `Signer` port and only this module's recovery path sees signatures.

use crate::primitives::{keccak256, Address, Hash32};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Half of the secp256k1 curve order, big-endian. S must be strictly below
/// this for a signature to be accepted.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from signing or verifying bundle digests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Signature bytes are not a valid secp256k1 signature.
    #[error("invalid signature format")]
    InvalidFormat,

    /// S value is in the upper half of the curve order.
    #[error("malleable signature: high S value")]
    MalleableSignature,

    /// Recovery id is not 0, 1, 27, or 28.
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Public key recovery failed for this digest/signature pair.
    #[error("public key recovery failed")]
    RecoveryFailed,

    /// Recovered signer does not match the declared submitter.
    #[error("signer mismatch: expected {expected:?}, recovered {actual:?}")]
    SignerMismatch { expected: Address, actual: Address },

    /// No signer is available to the caller (wallet not connected).
    #[error("no signer available")]
    Unavailable,

    /// The signer refused to sign (user rejection, locked key).
    #[error("signer rejected request: {0}")]
    Rejected(String),
}

// =============================================================================
// SIGNATURE TYPE
// =============================================================================

/// A recoverable ECDSA signature, wire-encoded as 65 bytes of 0x-hex.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// R component (32 bytes, big-endian).
    pub r: [u8; 32],
    /// S component (32 bytes, big-endian), always low-half.
    pub s: [u8; 32],
    /// Recovery id (27 or 28 on the wire).
    pub v: u8,
}

impl EcdsaSignature {
    /// Encodes as `r ‖ s ‖ v`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Decodes from `r ‖ s ‖ v`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != 65 {
            return Err(SignatureError::InvalidFormat);
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }
}

impl fmt::Debug for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl Serialize for EcdsaSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.to_bytes())))
    }
}

impl<'de> Deserialize<'de> for EcdsaSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SigVisitor;

        impl Visitor<'_> for SigVisitor {
            type Value = EcdsaSignature;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a 0x-prefixed 130-char hex signature")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                let body = v
                    .strip_prefix("0x")
                    .ok_or_else(|| de::Error::custom("missing 0x prefix"))?;
                let raw = hex::decode(body).map_err(de::Error::custom)?;
                EcdsaSignature::from_bytes(&raw).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(SigVisitor)
    }
}

// =============================================================================
// SIGNING & RECOVERY
// =============================================================================

/// Signs a 32-byte digest, producing a low-S recoverable signature.
pub fn sign_prehash(key: &SigningKey, digest: &Hash32) -> Result<EcdsaSignature, SignatureError> {
    let (sig, recid) = key
        .sign_prehash_recoverable(digest.as_bytes())
        .map_err(|_| SignatureError::InvalidFormat)?;

    // k256 normalizes S on request; normalize_s returns Some when S was high.
    let (sig, recid) = match sig.normalize_s() {
        Some(normalized) => {
            let flipped =
                RecoveryId::try_from(recid.to_byte() ^ 1).map_err(|_| SignatureError::RecoveryFailed)?;
            (normalized, flipped)
        }
        None => (sig, recid),
    };

    let bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);

    Ok(EcdsaSignature {
        r,
        s,
        v: recid.to_byte() + 27,
    })
}

/// Recovers the signer's address from a digest and signature.
///
/// Rejects high-S signatures before attempting recovery.
pub fn recover_address(
    digest: &Hash32,
    signature: &EcdsaSignature,
) -> Result<Address, SignatureError> {
    if !is_low_s(&signature.s) {
        return Err(SignatureError::MalleableSignature);
    }

    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&sig_bytes).map_err(|_| SignatureError::InvalidFormat)?;

    let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(address_from_pubkey(&key))
}

/// Verifies that `signature` over `digest` was produced by `expected`.
pub fn verify_signer(
    digest: &Hash32,
    signature: &EcdsaSignature,
    expected: Address,
) -> Result<(), SignatureError> {
    let recovered = recover_address(digest, signature)?;
    if recovered != expected {
        return Err(SignatureError::SignerMismatch {
            expected,
            actual: recovered,
        });
    }
    Ok(())
}

/// Derives the Ethereum-style address of a public key: the last 20 bytes of
/// the Keccak-256 of its uncompressed encoding (without the 0x04 prefix).
#[must_use]
pub fn address_from_pubkey(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest.as_bytes()[12..]);
    Address(out)
}

/// True when `s` is strictly below half the curve order (big-endian compare).
fn is_low_s(s: &[u8; 32]) -> bool {
    *s < SECP256K1_HALF_ORDER
}

fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };
    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidRecoveryId(v))
}

// =============================================================================
// TESTS
// =============================================================================
