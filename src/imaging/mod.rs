//! # Imaging Module
//!
//! Owned composite buffers and the vertical stitching algorithm.

pub mod types;

pub(crate) mod stitch;

pub use types::{Composite, PairMember};
