//! # LarchDB Configuration Module
//!
//! Centralizes the compile-time layout constants for LarchDB. Values that
//! derive from one another live together so a change to the page geometry
//! re-derives everything consistently.

pub mod constants;
pub use constants::*;
