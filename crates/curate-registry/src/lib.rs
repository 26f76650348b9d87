//! # Pointer Registry
//!
//! Client for the on-chain pointer registry: one mutable content pointer
//! per curation scope, with the full update history reconstructable from
//! emitted events.
//!
//! ## Layout
//!
//! - `ports` — the `ChainClient` trait the client drives (read, write,
//!   event queries) plus the event log shape.
//! - `client` — `PointerRegistryClient`, the typed facade over the raw
//!   chain interface. All payload parsing is fail-closed: a malformed
//!   response is an error, never a default.
//! - `adapters::memory` — `InMemoryChain`, a single-process chain hosting
//!   the registry contract and its participation gate. Every write runs
//!   the gate's check-then-update atomically before the pointer moves.

pub mod adapters;
pub mod client;
pub mod errors;
pub mod ports;

pub use adapters::memory::InMemoryChain;
pub use client::{PointerRecord, PointerRegistryClient};
pub use errors::ChainError;
pub use ports::{ChainClient, EventLog, TxId};
