//! Face detection with a single-shot detector network.
//!
//! A frame flows one way through the pipeline:
//! color conversion → blob → forward pass → decode → rank.

pub mod capture;
pub mod detection;
pub mod pipeline;
pub mod shared;
