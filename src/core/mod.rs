//! Core audio types and structures

/// Sample formats, states and stream metadata
pub mod audio;
/// Decoded native sample blocks
pub mod block;

pub use audio::{BitDepth, SampleFormat, State, StreamInfo};
pub use block::{PcmBlock, PcmData};
