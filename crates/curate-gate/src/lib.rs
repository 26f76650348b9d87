//! # Participation Gate
//!
//! On-chain anti-spam gate in front of the pointer registry. Decides, per
//! actor and curation event, whether a submission may register right now,
//! and accrues reputation afterward.
//!
//! ## Decision Rule
//!
//! All must hold, checked before any state is touched:
//!
//! 1. **Registration** — when `require_registration` is enabled, the actor
//!    must hold at least one fid binding.
//! 2. **Scope ownership** — a scope belongs to the first actor whose write
//!    was accepted on it; every other actor is rejected afterward.
//! 3. **Rate limit** — `now >= cooldown_until`. The cooldown written after
//!    an accepted participation scales down with reputation: baseline for
//!    low/no reputation, half the baseline once the effective score clears
//!    the high-reputation threshold.
//! 4. **Quality** — the actor's effective score meets the event's minimum
//!    quality score (0–10000 fixed-point). A first-time actor has an
//!    effective score of zero and is rejected by any positive threshold.
//!
//! Participation records are kept per actor per event.
//!
//! Rejections are deterministic and side-effect-free; acceptance updates
//! the participation record, reputation, and cooldown atomically within the
//! single call (contract execution is single-threaded per transaction, and
//! the check-then-update is never split across transactions).

pub mod gate;
pub mod reputation;

pub use gate::{GateConfig, GateError, ParticipationGate, ParticipationRecord};
pub use reputation::{Reputation, SCORE_SCALE};
