//! # Pointer Registry Client

use crate::errors::ChainError;
use crate::ports::{ChainClient, TxId};
use curate_types::{Address, Hash32};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Event name emitted by the registry on every pointer move.
pub const POINTER_UPDATED_EVENT: &str = "PointerUpdated";

/// Blocks per event-query window during a history scan. Keeps each query
/// bounded so the scan can resume from any window boundary.
const EVENT_SCAN_WINDOW: u64 = 5_000;

/// One historical pointer value for a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerRecord {
    pub pointer: String,
    pub block_height: u64,
    pub block_time: u64,
}

/// Typed facade over the registry contract.
///
/// The registry maps each curation scope (an event id) to its current
/// content pointer. History is not stored in contract state; it is
/// reconstructed from `PointerUpdated` events.
pub struct PointerRegistryClient<C: ChainClient> {
    chain: Arc<C>,
    contract: String,
    caller: Address,
}

impl<C: ChainClient> Clone for PointerRegistryClient<C> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
            contract: self.contract.clone(),
            caller: self.caller,
        }
    }
}

impl<C: ChainClient> PointerRegistryClient<C> {
    pub fn new(chain: Arc<C>, contract: impl Into<String>, caller: Address) -> Self {
        Self {
            chain,
            contract: contract.into(),
            caller,
        }
    }

    /// Points `scope` at `pointer`. The write passes through the
    /// participation gate; a gate rejection surfaces as
    /// [`ChainError::Rejected`] with no state changed.
    #[instrument(skip(self), fields(contract = %self.contract))]
    pub async fn update(&self, scope: Hash32, pointer: &str) -> Result<TxId, ChainError> {
        let tx_id = self
            .chain
            .write(
                self.caller,
                &self.contract,
                "updateMapping",
                json!({ "scope": scope, "pointer": pointer }),
            )
            .await?;
        debug!(%scope, %tx_id, "pointer updated");
        Ok(tx_id)
    }

    /// Current pointer for `scope`, or `None` if the scope has never been
    /// written.
    #[instrument(skip(self), fields(contract = %self.contract))]
    pub async fn current(&self, scope: Hash32) -> Result<Option<String>, ChainError> {
        let value = self
            .chain
            .read(&self.contract, "getMapping", json!({ "scope": scope }))
            .await?;
        match value {
            Value::Null => Ok(None),
            Value::String(pointer) => Ok(Some(pointer)),
            other => Err(ChainError::bad_payload(format!(
                "getMapping returned neither null nor string: {other}"
            ))),
        }
    }

    /// Full pointer history for `scope`, oldest first, reconstructed by
    /// scanning `PointerUpdated` events from genesis in bounded windows.
    /// A scope with no history yields an empty vector.
    #[instrument(skip(self), fields(contract = %self.contract))]
    pub async fn history(&self, scope: Hash32) -> Result<Vec<PointerRecord>, ChainError> {
        let latest = self.chain.latest_block().await?;
        let mut records = Vec::new();

        let mut from = 0u64;
        loop {
            let to = latest.min(from.saturating_add(EVENT_SCAN_WINDOW - 1));
            let logs = self
                .chain
                .query_events(&self.contract, POINTER_UPDATED_EVENT, from, to)
                .await?;
            for log in logs {
                let event_scope: Hash32 = field(&log.data, "scope")?;
                if event_scope != scope {
                    continue;
                }
                records.push(PointerRecord {
                    pointer: field(&log.data, "pointer")?,
                    block_height: log.block_height,
                    block_time: log.block_time,
                });
            }
            if to >= latest {
                break;
            }
            from = to + 1;
        }

        debug!(%scope, entries = records.len(), "history scan complete");
        Ok(records)
    }
}

/// Extracts a typed field from an event payload, fail-closed.
fn field<T: serde::de::DeserializeOwned>(data: &Value, name: &str) -> Result<T, ChainError> {
    let raw = data
        .get(name)
        .ok_or_else(|| ChainError::bad_payload(format!("event payload missing `{name}`")))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| ChainError::bad_payload(format!("event field `{name}`: {e}")))
}
