//! # Pairing Engine
//!
//! Owns the two stimulus slots and produces composites for the currently
//! selected pair or for a deterministic grid of pairs.

pub mod engine;

// Re-exports for convenience
pub use engine::{GridBatch, PairingEngine};
