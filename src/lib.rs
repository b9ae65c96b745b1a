#![warn(missing_docs)]

//! # audio-cursor: decode-for-read access to WAV, MP3 and Ogg/Vorbis
//!
//! One uniform streaming interface over three container/codec formats:
//! query metadata, read decoded samples as `i16`, `i32` or `f32`, and seek to
//! any frame-aligned byte offset of the decoded output.
//!
//! ## Features
//!
//! - **WAV** - integer PCM 8/16/24/32-bit and 32-bit float
//! - **MP3** - MPEG audio layers I-III with a frame index for exact seeks
//! - **Vorbis** - Ogg/Vorbis with granule-based seeking
//! - **Conversion** - range-correct S16/S32/F32 output
//!
//! ## Quick Start
//!
//! ```no_run
//! use audio_cursor::{Instance, SampleFormat};
//!
//! let mut instance = Instance::open("thing.wav", SampleFormat::S16)?;
//! println!("{} Hz, {} channels", instance.sample_rate()?, instance.channels()?);
//!
//! let mut buf = [0i16; 16];
//! let read_bytes = instance.read(&mut buf)?;
//! instance.set_position(16384)?;
//! # let _ = read_bytes;
//! # Ok::<(), audio_cursor::AudioError>(())
//! ```

/// Engine configuration
pub mod config;
/// Sample conversion to the output format
pub mod convert;
/// Core audio types and structures
pub mod core;
/// Codec backends
pub mod decoder;
/// Backend selection from path and magic bytes
pub mod detect;
/// Error types for audio operations
pub mod error;
/// The instance state machine
pub mod instance;
/// Byte position mapping and seek index
pub mod seek;
/// Read cursor over a loaded backend
pub mod stream;

// Export public types
pub use config::EngineConfig;
pub use convert::OutputSample;
pub use core::{BitDepth, SampleFormat, State, StreamInfo};
pub use detect::CodecKind;
pub use error::{AudioError, AudioResult, ErrorCode};
pub use instance::Instance;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
