//! # pairstack
//!
//! Pair images from two folders — a "top" stimulus and a "bottom" stimulus —
//! stitch them vertically into a single composite, browse combinations
//! deterministically, and save a chosen composite to disk.
//!
//! The engine owns two ordered image sets and a current index into each.
//! Navigation wraps modulo slot length and is a no-op on an empty slot. The
//! engine never touches a rendering surface: every operation returns an owned
//! pixel buffer plus display metadata, and the presentation layer (the
//! bundled CLI, a GUI, whatever) decides what to keep and how to show it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pairstack::{Config, PairingEngine, SlotId};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut engine = PairingEngine::new(Config::default());
//! engine.load_slot(SlotId::Top, "stimuli/top")?;
//! engine.load_slot(SlotId::Bottom, "stimuli/bottom")?;
//!
//! engine.step(SlotId::Top, 1);
//! let composite = engine.compose_current()?;
//! println!("{}", composite.caption());
//! composite.save("pair.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`pairing`] - The pairing engine: slot loading, navigation, current and
//!   grid composition
//! - [`slot`] - Directory scanning and wraparound index arithmetic
//! - [`imaging`] - Composite buffers and the vertical stitching algorithm
//! - [`sheet`] - Contact-sheet assembly for grid output
//! - [`config`] - Configuration management
//!
//! ## Grid sampling
//!
//! [`PairingEngine::compose_batch`] samples a rows x cols grid around the
//! current indices. A cell whose source image fails to decode is skipped
//! rather than aborting the batch — the rest of the grid stays available and
//! the missing cell is logged.

pub mod config;
pub mod error;
pub mod imaging;
pub mod pairing;
pub mod sheet;
pub mod slot;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{CombinerError, Result},
    imaging::{Composite, PairMember},
    pairing::{GridBatch, PairingEngine},
    slot::{ImageSlot, SlotId},
};
