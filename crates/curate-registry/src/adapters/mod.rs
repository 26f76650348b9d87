//! # Chain Adapters

pub mod memory;
