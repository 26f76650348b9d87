//! # Curate-Chain Test Suite
//!
//! Unified test crate for cross-crate choreography:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs       # End-to-end submit scenarios
//!     └── round_trip.rs  # Publish/fetch/verify round trips
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p curate-tests
//! cargo test -p curate-tests integration::
//! ```

pub mod integration;
