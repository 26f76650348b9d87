//! # Publisher Ports
//!
//! Driven ports for the two effects publishing needs: content-addressed
//! storage and signing. The signing key never crosses the `Signer` port.

use crate::errors::StorageError;
use async_trait::async_trait;
use curate_types::{Address, EcdsaSignature, Hash32, SignatureError};

/// Content-addressed object store.
///
/// Production: a pinning-service adapter. Testing and single-process
/// deployments: [`crate::InMemoryContentStore`].
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// The pointer `bytes` would be stored under. Pure and local; must
    /// agree with what [`put`](Self::put) returns for the same bytes.
    fn content_id(&self, bytes: &[u8]) -> String;

    /// Stores `bytes` and returns their pointer. Idempotent for identical
    /// bytes.
    async fn put(&self, bytes: &[u8]) -> Result<String, StorageError>;

    /// Fetches the object under `pointer`.
    async fn get(&self, pointer: &str) -> Result<Vec<u8>, StorageError>;

    /// True if an object exists under `pointer`.
    async fn exists(&self, pointer: &str) -> Result<bool, StorageError>;

    /// Releases the pin on `pointer`. Unpinning an unknown pointer is not
    /// an error.
    async fn unpin(&self, pointer: &str) -> Result<(), StorageError>;
}

/// Signing port. Implementations hold the key material; callers only see
/// digests in and signatures out.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Address the signatures recover to.
    async fn address(&self) -> Result<Address, SignatureError>;

    /// Signs a 32-byte digest.
    async fn sign(&self, digest: &Hash32) -> Result<EcdsaSignature, SignatureError>;
}
