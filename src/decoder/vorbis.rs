use super::symphonia::PacketDecoder;
use super::Decoder;
use crate::config::EngineConfig;
use crate::core::{PcmBlock, StreamInfo};
use crate::detect::CodecKind;
use crate::error::AudioResult;
use std::path::Path;
use symphonia::core::codecs::CODEC_TYPE_VORBIS;

/// Packets decoded ahead of a seek target; each block overlaps the previous one
const SEEK_PREROLL_PACKETS: usize = 2;

/// Ogg/Vorbis decoder.
///
/// The length is trimmed to the final page's granule position. Seeks bisect
/// over Ogg pages, then decode forward to the exact sample.
pub struct VorbisDecoder {
    inner: PacketDecoder,
}

impl VorbisDecoder {
    /// Open an Ogg file whose first logical stream is Vorbis
    pub fn open<P: AsRef<Path>>(path: P, config: &EngineConfig) -> AudioResult<Self> {
        let inner = PacketDecoder::open(
            path.as_ref(),
            CodecKind::Vorbis,
            &[CODEC_TYPE_VORBIS],
            SEEK_PREROLL_PACKETS,
            config,
        )?;
        Ok(VorbisDecoder { inner })
    }
}

impl Decoder for VorbisDecoder {
    fn info(&self) -> &StreamInfo {
        self.inner.info()
    }

    fn decode_next(&mut self, max_frames: usize) -> AudioResult<PcmBlock> {
        self.inner.decode_next(max_frames)
    }

    fn seek_to_frame(&mut self, frame: u64) -> AudioResult<()> {
        self.inner.seek_to_frame(frame)
    }
}
