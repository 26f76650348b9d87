//! # Chain Access Port
//!
//! The driven port the registry client (and anything else touching the
//! chain) depends on. Arguments and return values cross the port as
//! `serde_json::Value`; the typed layer above parses them fail-closed.

use crate::errors::ChainError;
use async_trait::async_trait;
use curate_types::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque transaction identifier assigned by the chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub String);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One emitted contract event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    /// Contract that emitted the event.
    pub contract: String,
    /// Event name, e.g. `PointerUpdated`.
    pub name: String,
    /// Block the emitting transaction landed in.
    pub block_height: u64,
    /// Timestamp of that block.
    pub block_time: u64,
    /// Transaction that emitted the event.
    pub tx_id: TxId,
    /// Event payload.
    pub data: Value,
}

/// Minimal chain interface: calls, transactions, and event queries.
///
/// Production: an RPC-backed adapter. Testing and single-process
/// deployments: [`crate::InMemoryChain`].
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Read-only contract call. Never mutates chain state.
    async fn read(&self, contract: &str, method: &str, args: Value) -> Result<Value, ChainError>;

    /// State-changing contract call, submitted as `caller`.
    async fn write(
        &self,
        caller: Address,
        contract: &str,
        method: &str,
        args: Value,
    ) -> Result<TxId, ChainError>;

    /// Events named `event` emitted by `contract` in
    /// `[from_block, to_block]`, in emission order. An empty result is
    /// not an error.
    async fn query_events(
        &self,
        contract: &str,
        event: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<EventLog>, ChainError>;

    /// Height of the newest block.
    async fn latest_block(&self) -> Result<u64, ChainError>;

    /// Timestamp of the block at `height`.
    async fn block_time(&self, height: u64) -> Result<u64, ChainError>;
}
