//! # Merkle Commitment Engine
//!
//! Builds the tamper-evident commitment over a bundle's matches: a binary
//! Merkle tree whose leaves are the match hashes
//! (`keccak256(question_hash ‖ answer_hash ‖ ranking)`).
//!
//! ## Determinism
//!
//! Independent parties must derive the same root from the same match set,
//! so construction is fully deterministic:
//!
//! - leaves are sorted ascending byte-wise before pairing,
//! - each interior node hashes its children in sorted order (commutative
//!   pairing), so proofs need no left/right direction bits,
//! - an unpaired node at the end of a level is promoted unchanged.
//!
//! A single leaf is its own root with an empty proof. An empty leaf set is
//! refused; bundle validation rejects it upstream, and the engine refuses
//! it again rather than inventing a root for nothing.

pub mod tree;

pub use tree::{build, verify_proof, MerkleData, MerkleError};
