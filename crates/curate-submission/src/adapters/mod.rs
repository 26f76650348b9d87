//! # Draft Store Adapters

pub mod file;
pub mod memory;
