//! # Bundle Publisher
//!
//! Turns a validated, unsigned bundle into a published one: Merkle
//! commitment, actor signature, and a single upload to content-addressed
//! storage with bounded retries.
//!
//! ## Single Upload
//!
//! Content addressing makes the pointer a pure function of the bytes, so
//! the pre-signature pointer is derived locally via
//! [`ContentStore::content_id`] and committed into the signing digest
//! before anything leaves the process. Only the final signed artifact is
//! uploaded; a failed publish never leaves an orphan object behind.
//!
//! ## Self-Verification
//!
//! Any holder of the published pointer can fetch the bundle, recompute the
//! Merkle root, strip the signature fields, recompute the pre-signature
//! pointer and digest, and recover the signer — see
//! [`verify::fetch_and_verify`].

pub mod adapters;
pub mod errors;
pub mod ports;
pub mod retry;
pub mod service;
pub mod verify;

pub use adapters::local_signer::LocalSigner;
pub use adapters::memory::InMemoryContentStore;
pub use errors::{PublishError, StorageError, VerifyError};
pub use ports::{ContentStore, Signer};
pub use retry::{AttemptHook, RetryPolicy};
pub use service::{BundlePublisher, PublishedBundle, PublisherConfig};
pub use verify::{fetch_and_verify, VerifiedBundle};
