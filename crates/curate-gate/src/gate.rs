//! # Gate State & Decision Logic

use crate::reputation::{Reputation, SCORE_SCALE};
use curate_types::{Address, Hash32};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

// =============================================================================
// CONFIG
// =============================================================================

/// Tunable gate parameters, fixed at deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Cooldown applied after an accepted participation, in seconds.
    pub base_cooldown_secs: u64,
    /// Effective score above which the cooldown is halved.
    pub high_reputation_threshold: u64,
    /// When set, actors must have a registered fid before participating.
    pub require_registration: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            base_cooldown_secs: 3600,
            high_reputation_threshold: SCORE_SCALE / 2,
            require_registration: false,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Deterministic gate rejections. None of these mutate gate state.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GateError {
    /// Actor is still in cooldown from a previous accepted participation.
    #[error("rate limited: retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Actor's effective score is below the event's minimum quality score.
    #[error("insufficient quality: required {required}, effective {effective}")]
    InsufficientQuality { required: u64, effective: u64 },

    /// The fid is already bound to a different address.
    #[error("fid {fid} already registered")]
    FidAlreadyRegistered { fid: u64 },

    /// Registration is required and the actor has no registered fid.
    #[error("actor has no registered fid")]
    ActorNotRegistered,

    /// The scope's pointer belongs to a different actor.
    #[error("scope is owned by {owner}")]
    NotScopeOwner { owner: Address },

    /// Caller is not the gate owner.
    #[error("caller is not the gate owner")]
    NotOwner,
}

// =============================================================================
// STATE
// =============================================================================

/// Per-actor, per-event participation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticipationRecord {
    /// Accepted participations on this event.
    pub submission_count: u64,
    /// Unix timestamp of the most recent accepted participation.
    pub last_submission_time: u64,
    /// Running average of score-over-threshold ratios, `SCORE_SCALE` = 1.0.
    pub quality_ratio: u64,
}

/// The participation gate: reputation ledger, fid registry, per-event
/// quality thresholds, and scope ownership. One instance per deployed
/// registry.
#[derive(Debug, Clone)]
pub struct ParticipationGate {
    config: GateConfig,
    owner: Address,
    reputations: HashMap<Address, Reputation>,
    records: HashMap<(Address, Hash32), ParticipationRecord>,
    /// fid -> bound address. A fid binds once and never rebinds.
    fids: HashMap<u64, Address>,
    /// Actors holding at least one fid binding.
    registered: HashSet<Address>,
    /// event -> minimum effective score. Unconfigured events default to zero.
    event_thresholds: HashMap<Hash32, u64>,
    /// event -> the actor whose pointer it carries. Claimed by the first
    /// accepted participation; only the owner may update afterward.
    scope_owners: HashMap<Hash32, Address>,
}

impl ParticipationGate {
    #[must_use]
    pub fn new(config: GateConfig, owner: Address) -> Self {
        Self {
            config,
            owner,
            reputations: HashMap::new(),
            records: HashMap::new(),
            fids: HashMap::new(),
            registered: HashSet::new(),
            event_thresholds: HashMap::new(),
            scope_owners: HashMap::new(),
        }
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    /// Sets the minimum quality score for one event. Owner only.
    pub fn configure_event(
        &mut self,
        caller: Address,
        event_id: Hash32,
        min_quality_score: u64,
    ) -> Result<(), GateError> {
        if caller != self.owner {
            return Err(GateError::NotOwner);
        }
        let clamped = min_quality_score.min(SCORE_SCALE);
        self.event_thresholds.insert(event_id, clamped);
        debug!(event = %event_id, threshold = clamped, "event threshold configured");
        Ok(())
    }

    /// Binds a fid to an address. A fid already bound to a *different*
    /// address is rejected; re-registering the same binding is a no-op.
    pub fn register_actor(&mut self, actor: Address, fid: u64) -> Result<(), GateError> {
        match self.fids.get(&fid) {
            Some(bound) if *bound != actor => Err(GateError::FidAlreadyRegistered { fid }),
            Some(_) => Ok(()),
            None => {
                self.fids.insert(fid, actor);
                self.registered.insert(actor);
                debug!(%actor, fid, "actor registered");
                Ok(())
            }
        }
    }

    // =========================================================================
    // DECISION
    // =========================================================================

    /// Admits or rejects one participation attempt at time `now`.
    ///
    /// Checks, in order: registration (when required), scope ownership,
    /// rate limit, quality. All run against pre-call state; only an
    /// accepted attempt mutates the gate (record, reputation, cooldown,
    /// scope claim), and it does so in full before returning.
    pub fn try_participate(
        &mut self,
        actor: Address,
        event_id: Hash32,
        now: u64,
    ) -> Result<ParticipationRecord, GateError> {
        if self.config.require_registration && !self.registered.contains(&actor) {
            return Err(GateError::ActorNotRegistered);
        }

        // The first accepted writer claims the scope; everyone else is
        // shut out of it afterward.
        if let Some(owner) = self.scope_owners.get(&event_id) {
            if *owner != actor {
                return Err(GateError::NotScopeOwner { owner: *owner });
            }
        }

        let reputation = self.reputations.get(&actor).copied().unwrap_or_default();

        if now < reputation.cooldown_until {
            return Err(GateError::RateLimited {
                retry_after_secs: reputation.cooldown_until - now,
            });
        }

        let required = self.min_quality_score(&event_id);
        let effective = reputation.effective_score();
        if effective < required {
            return Err(GateError::InsufficientQuality {
                required,
                effective,
            });
        }

        // Accepted: claim the scope, fold this attempt into the record,
        // and accrue reputation.
        self.scope_owners.entry(event_id).or_insert(actor);

        let ratio = if required == 0 {
            SCORE_SCALE
        } else {
            (effective * SCORE_SCALE / required).min(SCORE_SCALE)
        };
        let record = self.records.entry((actor, event_id)).or_default();
        record.quality_ratio = if record.submission_count == 0 {
            ratio
        } else {
            (record.quality_ratio * record.submission_count + ratio)
                / (record.submission_count + 1)
        };
        record.submission_count += 1;
        record.last_submission_time = now;
        let updated = *record;

        let base_cooldown = self.config.base_cooldown_secs;
        let high_threshold = self.config.high_reputation_threshold;
        let reputation = self.reputations.entry(actor).or_default();
        reputation.accrue();
        // Half the baseline once the effective score clears the
        // high-reputation threshold.
        reputation.cooldown_until = now
            + if reputation.effective_score() > high_threshold {
                base_cooldown / 2
            } else {
                base_cooldown
            };

        debug!(
            %actor,
            event = %event_id,
            effective = reputation.effective_score(),
            cooldown_until = reputation.cooldown_until,
            "participation accepted"
        );
        Ok(updated)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    #[must_use]
    pub fn min_quality_score(&self, event_id: &Hash32) -> u64 {
        self.event_thresholds.get(event_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn reputation(&self, actor: &Address) -> Reputation {
        self.reputations.get(actor).copied().unwrap_or_default()
    }

    /// Participation record for one actor on one event.
    #[must_use]
    pub fn record(&self, actor: &Address, event_id: &Hash32) -> ParticipationRecord {
        self.records
            .get(&(*actor, *event_id))
            .copied()
            .unwrap_or_default()
    }

    /// Actor owning the scope's pointer, if it has ever been written.
    #[must_use]
    pub fn scope_owner(&self, event_id: &Hash32) -> Option<Address> {
        self.scope_owners.get(event_id).copied()
    }

    /// Address bound to `fid`, if any.
    #[must_use]
    pub fn actor_for_fid(&self, fid: u64) -> Option<Address> {
        self.fids.get(&fid).copied()
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }
}

// =============================================================================
// TESTS
// =============================================================================
