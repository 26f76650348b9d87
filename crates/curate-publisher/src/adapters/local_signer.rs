//! # Local Signer
//!
//! A [`Signer`] backed by an in-process secp256k1 key. The key stays
//! inside this adapter; callers only ever see digests in and signatures
//! out.

use crate::ports::Signer;
use async_trait::async_trait;
use curate_types::crypto::{address_from_pubkey, sign_prehash};
use curate_types::{Address, EcdsaSignature, Hash32, SignatureError};
use k256::ecdsa::SigningKey;

pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl LocalSigner {
    #[must_use]
    pub fn new(key: SigningKey) -> Self {
        let address = address_from_pubkey(key.verifying_key());
        Self { key, address }
    }

    /// Generates a fresh random key.
    #[must_use]
    pub fn random() -> Self {
        Self::new(SigningKey::random(&mut rand::rngs::OsRng))
    }

    /// The address this signer's signatures recover to.
    #[must_use]
    pub fn signer_address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl Signer for LocalSigner {
    async fn address(&self) -> Result<Address, SignatureError> {
        Ok(self.address)
    }

    async fn sign(&self, digest: &Hash32) -> Result<EcdsaSignature, SignatureError> {
        sign_prehash(&self.key, digest)
    }
}
