//! # In-Memory Chain
//!
//! A single-process chain hosting the pointer registry contract with its
//! participation gate embedded. One block is minted per accepted write;
//! rejected writes mint nothing and mutate nothing, matching the gate's
//! side-effect-free rejection rule.

use crate::errors::ChainError;
use crate::ports::{ChainClient, EventLog, TxId};
use async_trait::async_trait;
use curate_gate::{GateConfig, ParticipationGate, Reputation};
use curate_types::{Address, Hash32};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Name the registry contract is deployed under.
pub const REGISTRY_CONTRACT: &str = "pointer_registry";

const GENESIS_TIME: u64 = 1_700_000_000;
const BLOCK_INTERVAL_SECS: u64 = 12;

struct ChainState {
    height: u64,
    pointers: HashMap<Hash32, String>,
    events: Vec<EventLog>,
    gate: ParticipationGate,
}

/// In-memory [`ChainClient`] implementation.
pub struct InMemoryChain {
    state: RwLock<ChainState>,
}

impl InMemoryChain {
    /// Deploys the registry with `owner` as the gate administrator.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self::with_gate_config(owner, GateConfig::default())
    }

    #[must_use]
    pub fn with_gate_config(owner: Address, config: GateConfig) -> Self {
        Self {
            state: RwLock::new(ChainState {
                height: 0,
                pointers: HashMap::new(),
                events: Vec::new(),
                gate: ParticipationGate::new(config, owner),
            }),
        }
    }

    /// Reputation snapshot, for inspection outside the contract interface.
    pub async fn reputation_of(&self, actor: Address) -> Reputation {
        self.state.read().await.gate.reputation(&actor)
    }

    fn block_time_at(height: u64) -> u64 {
        GENESIS_TIME + height * BLOCK_INTERVAL_SECS
    }
}

#[async_trait]
impl ChainClient for InMemoryChain {
    async fn read(&self, contract: &str, method: &str, args: Value) -> Result<Value, ChainError> {
        if contract != REGISTRY_CONTRACT {
            return Err(ChainError::UnknownContract {
                contract: contract.to_string(),
            });
        }
        let state = self.state.read().await;
        match method {
            "getMapping" => {
                let scope: Hash32 = arg(&args, "scope")?;
                Ok(match state.pointers.get(&scope) {
                    Some(pointer) => Value::String(pointer.clone()),
                    None => Value::Null,
                })
            }
            "minQualityScore" => {
                let scope: Hash32 = arg(&args, "scope")?;
                Ok(json!(state.gate.min_quality_score(&scope)))
            }
            "reputation" => {
                let actor: Address = arg(&args, "actor")?;
                to_value(&state.gate.reputation(&actor))
            }
            "participationRecord" => {
                let actor: Address = arg(&args, "actor")?;
                let scope: Hash32 = arg(&args, "scope")?;
                to_value(&state.gate.record(&actor, &scope))
            }
            other => Err(ChainError::UnknownMethod {
                method: other.to_string(),
            }),
        }
    }

    async fn write(
        &self,
        caller: Address,
        contract: &str,
        method: &str,
        args: Value,
    ) -> Result<TxId, ChainError> {
        if contract != REGISTRY_CONTRACT {
            return Err(ChainError::UnknownContract {
                contract: contract.to_string(),
            });
        }
        let mut state = self.state.write().await;
        // Time the transaction would land at. The block is only minted if
        // the call succeeds; rejections leave the chain untouched.
        let next_height = state.height + 1;
        let now = Self::block_time_at(next_height);

        match method {
            "updateMapping" => {
                let scope: Hash32 = arg(&args, "scope")?;
                let pointer: String = arg(&args, "pointer")?;

                state.gate.try_participate(caller, scope, now)?;

                state.height = next_height;
                state.pointers.insert(scope, pointer.clone());
                let tx_id = TxId(Uuid::new_v4().to_string());
                state.events.push(EventLog {
                    contract: REGISTRY_CONTRACT.to_string(),
                    name: "PointerUpdated".to_string(),
                    block_height: next_height,
                    block_time: now,
                    tx_id: tx_id.clone(),
                    data: json!({ "scope": scope, "pointer": pointer }),
                });
                debug!(%caller, %scope, height = next_height, "pointer write accepted");
                Ok(tx_id)
            }
            "registerFid" => {
                let fid: u64 = arg(&args, "fid")?;
                state.gate.register_actor(caller, fid)?;

                state.height = next_height;
                let tx_id = TxId(Uuid::new_v4().to_string());
                state.events.push(EventLog {
                    contract: REGISTRY_CONTRACT.to_string(),
                    name: "ActorRegistered".to_string(),
                    block_height: next_height,
                    block_time: now,
                    tx_id: tx_id.clone(),
                    data: json!({ "actor": caller, "fid": fid }),
                });
                Ok(tx_id)
            }
            "configureEvent" => {
                let scope: Hash32 = arg(&args, "scope")?;
                let min_quality_score: u64 = arg(&args, "minQualityScore")?;
                state.gate.configure_event(caller, scope, min_quality_score)?;

                state.height = next_height;
                Ok(TxId(Uuid::new_v4().to_string()))
            }
            other => Err(ChainError::UnknownMethod {
                method: other.to_string(),
            }),
        }
    }

    async fn query_events(
        &self,
        contract: &str,
        event: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<EventLog>, ChainError> {
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .filter(|log| {
                log.contract == contract
                    && log.name == event
                    && log.block_height >= from_block
                    && log.block_height <= to_block
            })
            .cloned()
            .collect())
    }

    async fn latest_block(&self) -> Result<u64, ChainError> {
        Ok(self.state.read().await.height)
    }

    async fn block_time(&self, height: u64) -> Result<u64, ChainError> {
        let state = self.state.read().await;
        if height > state.height {
            return Err(ChainError::Reverted {
                reason: format!("no block at height {height}"),
            });
        }
        Ok(Self::block_time_at(height))
    }
}

/// Extracts a typed argument from a call payload, fail-closed.
fn arg<T: serde::de::DeserializeOwned>(args: &Value, name: &str) -> Result<T, ChainError> {
    let raw = args
        .get(name)
        .ok_or_else(|| ChainError::bad_payload(format!("call args missing `{name}`")))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| ChainError::bad_payload(format!("call arg `{name}`: {e}")))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, ChainError> {
    serde_json::to_value(value).map_err(|e| ChainError::bad_payload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PointerRegistryClient;
    use curate_gate::GateError;
    use std::sync::Arc;

    fn addr(byte: u8) -> Address {
        Address([byte; 20])
    }

    fn scope(byte: u8) -> Hash32 {
        Hash32([byte; 32])
    }

    fn client(chain: Arc<InMemoryChain>, caller: Address) -> PointerRegistryClient<InMemoryChain> {
        PointerRegistryClient::new(chain, REGISTRY_CONTRACT, caller)
    }

    #[tokio::test]
    async fn test_update_then_current() {
        let chain = Arc::new(InMemoryChain::new(addr(0xAA)));
        let registry = client(chain, addr(1));

        assert_eq!(registry.current(scope(1)).await.unwrap(), None);
        registry.update(scope(1), "bafy-one").await.unwrap();
        assert_eq!(
            registry.current(scope(1)).await.unwrap(),
            Some("bafy-one".to_string())
        );
    }

    #[tokio::test]
    async fn test_history_ordered_and_scoped() {
        // Zero cooldown so one actor can write repeatedly.
        let config = GateConfig {
            base_cooldown_secs: 0,
            ..GateConfig::default()
        };
        let chain = Arc::new(InMemoryChain::with_gate_config(addr(0xAA), config));
        let registry = client(chain.clone(), addr(1));

        registry.update(scope(1), "v1").await.unwrap();
        registry.update(scope(2), "other-scope").await.unwrap();
        registry.update(scope(1), "v2").await.unwrap();

        let history = registry.history(scope(1)).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].pointer, "v1");
        assert_eq!(history[1].pointer, "v2");
        assert!(history[0].block_height < history[1].block_height);
        assert!(history[0].block_time < history[1].block_time);

        // A never-written scope has an empty history, not an error.
        assert!(registry.history(scope(9)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gate_rejection_leaves_chain_untouched() {
        let chain = Arc::new(InMemoryChain::new(addr(0xAA)));
        let registry = client(chain.clone(), addr(1));

        registry.update(scope(1), "v1").await.unwrap();
        let height = chain.latest_block().await.unwrap();

        // Still cooling down.
        let err = registry.update(scope(1), "v2").await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::Rejected(GateError::RateLimited { .. })
        ));
        assert_eq!(chain.latest_block().await.unwrap(), height);
        assert_eq!(
            registry.current(scope(1)).await.unwrap(),
            Some("v1".to_string())
        );
    }

    #[tokio::test]
    async fn test_foreign_actor_cannot_overwrite_scope() {
        let chain = Arc::new(InMemoryChain::new(addr(0xAA)));
        let first = client(chain.clone(), addr(1));
        let second = client(chain.clone(), addr(2));

        first.update(scope(1), "bafy-first").await.unwrap();
        let height = chain.latest_block().await.unwrap();

        // Another actor, in good standing, still cannot take the scope over.
        let err = second.update(scope(1), "bafy-hijack").await.unwrap_err();
        assert_eq!(
            err,
            ChainError::Rejected(GateError::NotScopeOwner { owner: addr(1) })
        );
        assert_eq!(chain.latest_block().await.unwrap(), height);
        assert_eq!(
            first.current(scope(1)).await.unwrap(),
            Some("bafy-first".to_string())
        );

        // The same actor is free to claim a different scope.
        second.update(scope(2), "bafy-own").await.unwrap();
    }

    #[tokio::test]
    async fn test_participation_record_kept_per_scope() {
        let config = GateConfig {
            base_cooldown_secs: 0,
            ..GateConfig::default()
        };
        let chain = Arc::new(InMemoryChain::with_gate_config(addr(0xAA), config));
        let registry = client(chain.clone(), addr(1));

        registry.update(scope(1), "v1").await.unwrap();
        registry.update(scope(2), "v1").await.unwrap();

        let record_for = |s: Hash32| {
            let chain = chain.clone();
            async move {
                let value = chain
                    .read(
                        REGISTRY_CONTRACT,
                        "participationRecord",
                        json!({ "actor": addr(1), "scope": s }),
                    )
                    .await
                    .unwrap();
                serde_json::from_value::<curate_gate::ParticipationRecord>(value).unwrap()
            }
        };

        // One submission on each scope, not two pooled on the actor.
        assert_eq!(record_for(scope(1)).await.submission_count, 1);
        assert_eq!(record_for(scope(2)).await.submission_count, 1);
        assert_eq!(record_for(scope(3)).await.submission_count, 0);
    }

    #[tokio::test]
    async fn test_quality_threshold_enforced_on_write() {
        let chain = Arc::new(InMemoryChain::new(addr(0xAA)));

        // Owner raises the bar on scope 1.
        chain
            .write(
                addr(0xAA),
                REGISTRY_CONTRACT,
                "configureEvent",
                json!({ "scope": scope(1), "minQualityScore": 7000 }),
            )
            .await
            .unwrap();

        let registry = client(chain, addr(1));
        let err = registry.update(scope(1), "v1").await.unwrap_err();
        assert_eq!(
            err,
            ChainError::Rejected(GateError::InsufficientQuality {
                required: 7000,
                effective: 0,
            })
        );
    }

    #[tokio::test]
    async fn test_configure_event_owner_only() {
        let chain = InMemoryChain::new(addr(0xAA));
        let err = chain
            .write(
                addr(1),
                REGISTRY_CONTRACT,
                "configureEvent",
                json!({ "scope": scope(1), "minQualityScore": 100 }),
            )
            .await
            .unwrap_err();
        assert_eq!(err, ChainError::Rejected(GateError::NotOwner));
    }

    #[tokio::test]
    async fn test_register_fid_duplicate_rejected() {
        let chain = InMemoryChain::new(addr(0xAA));
        chain
            .write(addr(1), REGISTRY_CONTRACT, "registerFid", json!({ "fid": 42 }))
            .await
            .unwrap();
        let err = chain
            .write(addr(2), REGISTRY_CONTRACT, "registerFid", json!({ "fid": 42 }))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ChainError::Rejected(GateError::FidAlreadyRegistered { fid: 42 })
        );
    }

    #[tokio::test]
    async fn test_unknown_contract_and_method() {
        let chain = InMemoryChain::new(addr(0xAA));
        assert!(matches!(
            chain.read("nope", "getMapping", json!({})).await,
            Err(ChainError::UnknownContract { .. })
        ));
        assert!(matches!(
            chain.read(REGISTRY_CONTRACT, "nope", json!({})).await,
            Err(ChainError::UnknownMethod { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_args_fail_closed() {
        let chain = InMemoryChain::new(addr(0xAA));
        let err = chain
            .read(REGISTRY_CONTRACT, "getMapping", json!({ "scope": 17 }))
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::BadPayload { .. }));
    }

    #[tokio::test]
    async fn test_reputation_readable_through_contract() {
        let chain = Arc::new(InMemoryChain::new(addr(0xAA)));
        let registry = client(chain.clone(), addr(1));
        registry.update(scope(1), "v1").await.unwrap();

        let value = chain
            .read(
                REGISTRY_CONTRACT,
                "reputation",
                json!({ "actor": addr(1) }),
            )
            .await
            .unwrap();
        let rep: Reputation = serde_json::from_value(value).unwrap();
        assert!(rep.base_score > 0);
        assert_eq!(rep, chain.reputation_of(addr(1)).await);
    }
}
