use super::symphonia::PacketDecoder;
use super::Decoder;
use crate::config::EngineConfig;
use crate::core::{PcmBlock, StreamInfo};
use crate::detect::CodecKind;
use crate::error::AudioResult;
use crate::seek::SeekIndex;
use std::path::Path;
use symphonia::core::codecs::{CodecType, CODEC_TYPE_MP1, CODEC_TYPE_MP2, CODEC_TYPE_MP3};

/// MPEG audio layers accepted behind a `.mp3` extension
const MPEG_AUDIO: [CodecType; 3] = [CODEC_TYPE_MP3, CODEC_TYPE_MP2, CODEC_TYPE_MP1];

/// Frames decoded ahead of a seek target. Covers the 511-byte bit reservoir
/// at low bitrates plus the IMDCT and synthesis filterbank overlap.
const SEEK_PREROLL_FRAMES: usize = 10;

/// MP3 decoder with a frame index built at open
pub struct Mp3Decoder {
    inner: PacketDecoder,
}

impl Mp3Decoder {
    /// Open an MPEG audio file, indexing every frame
    pub fn open<P: AsRef<Path>>(path: P, config: &EngineConfig) -> AudioResult<Self> {
        let inner = PacketDecoder::open(
            path.as_ref(),
            CodecKind::Mp3,
            &MPEG_AUDIO,
            SEEK_PREROLL_FRAMES,
            config,
        )?;
        Ok(Mp3Decoder { inner })
    }

    /// Frame index, one entry per MPEG frame
    pub fn frame_index(&self) -> &SeekIndex {
        self.inner.index()
    }
}

impl Decoder for Mp3Decoder {
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
