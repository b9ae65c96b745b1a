//! Codec backends

/// MPEG audio backend
pub mod mp3;
/// Shared packet decoder over symphonia demuxers
pub mod symphonia;
/// Ogg/Vorbis backend
pub mod vorbis;
/// RIFF/WAVE backend
pub mod wav;

pub use mp3::Mp3Decoder;
pub use vorbis::VorbisDecoder;
pub use wav::WavDecoder;

use crate::config::EngineConfig;
use crate::core::{PcmBlock, StreamInfo};
use crate::detect::CodecKind;
use crate::error::AudioResult;
use std::path::Path;

/// Trait for codec backends
pub trait Decoder: Send {
    /// Stream properties parsed at open
    fn info(&self) -> &StreamInfo;

    /// Decode up to `max_frames` frames of interleaved native samples.
    ///
    /// An empty block means end of stream.
    fn decode_next(&mut self, max_frames: usize) -> AudioResult<PcmBlock>;

    /// Position so the next decoded frame is exactly `frame`
    fn seek_to_frame(&mut self, frame: u64) -> AudioResult<()>;
}

/// The backend owned by an instance, fixed at load
pub enum Backend {
    /// RIFF/WAVE
    Wav(WavDecoder),
    /// MPEG audio
    Mp3(Mp3Decoder),
    /// Ogg/Vorbis
    Vorbis(VorbisDecoder),
}

impl Backend {
    /// Open `path` with the backend for `kind`
    pub fn open(kind: CodecKind, path: &Path, config: &EngineConfig) -> AudioResult<Self> {
        match kind {
            CodecKind::Wav => WavDecoder::open(path).map(Backend::Wav),
            CodecKind::Mp3 => Mp3Decoder::open(path, config).map(Backend::Mp3),
            CodecKind::Vorbis => VorbisDecoder::open(path, config).map(Backend::Vorbis),
        }
    }

    fn inner(&self) -> &dyn Decoder {
        match self {
            Backend::Wav(d) => d,
            Backend::Mp3(d) => d,
            Backend::Vorbis(d) => d,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Decoder {
        match self {
            Backend::Wav(d) => d,
            Backend::Mp3(d) => d,
            Backend::Vorbis(d) => d,
        }
    }
}

impl Decoder for Backend {
    fn info(&self) -> &StreamInfo {
        self.inner().info()
    }

    fn decode_next(&mut self, max_frames: usize) -> AudioResult<PcmBlock> {
        self.inner_mut().decode_next(max_frames)
    }

    fn seek_to_frame(&mut self, frame: u64) -> AudioResult<()> {
        self.inner_mut().seek_to_frame(frame)
    }
}
