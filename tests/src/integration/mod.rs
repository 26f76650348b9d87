//! # Integration Scenarios

pub mod flows;
pub mod round_trip;
