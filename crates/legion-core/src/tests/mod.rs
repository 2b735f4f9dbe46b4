//! Crate-level battle tests.
//!
//! - `scenarios.rs`: end-to-end combat scenarios through the full tick
//! - `determinism.rs`: same seed and inputs give identical battles
//! - `properties.rs`: proptest checks of damage, hit point and charge rules
//! - `helpers.rs`: setup utilities and factory functions

mod determinism;
mod helpers;

pub use helpers::*;
