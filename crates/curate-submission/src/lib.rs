//! # Submission State Machine
//!
//! Client-side orchestration of the whole curation flow: drafts while the
//! curator works, then a guarded end-to-end submit — validate, commit,
//! sign, upload, register on chain — with the lifecycle tracked per
//! `(event, actor)` key.
//!
//! All effects flow through an explicit [`SubmissionContext`] built once
//! per session; there is no ambient state. Dropping a submit future
//! mid-flight releases the in-flight guard and leaves the draft intact.

pub mod adapters;
pub mod errors;
pub mod ports;
pub mod service;
pub mod state;

pub use adapters::file::FileDraftStore;
pub use adapters::memory::MemoryDraftStore;
pub use errors::{DraftError, SubmissionError};
pub use ports::{Draft, DraftStore};
pub use service::{
    SubmissionConfig, SubmissionContext, SubmissionOutcome, SubmissionRequest, SubmissionService,
    SubmissionStats,
};
pub use state::{DraftKey, SubmissionPhase, SubmissionState};
