//! # Publisher Adapters

pub mod local_signer;
pub mod memory;
