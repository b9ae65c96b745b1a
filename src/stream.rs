//! A loaded backend plus the output-domain read cursor

use crate::config::EngineConfig;
use crate::convert::{convert_into, OutputSample};
use crate::core::{PcmBlock, SampleFormat, StreamInfo};
use crate::decoder::{Backend, Decoder};
use crate::detect;
use crate::error::AudioResult;
use crate::seek::PositionMapper;
use log::{debug, warn};
use std::path::Path;

/// Decoded stream read through a byte cursor in the output format
pub struct PcmStream {
    backend: Backend,
    info: StreamInfo,
    format: SampleFormat,
    mapper: PositionMapper,
    /// Read cursor in output bytes
    position: u64,
    /// Decoded samples not yet converted into a caller buffer
    pending: PcmBlock,
    /// Samples of `pending` already consumed
    pending_pos: usize,
    chunk_frames: usize,
}

impl PcmStream {
    /// Detect the codec of `path`, open its backend and position at zero
    pub fn open(path: &Path, format: SampleFormat, config: &EngineConfig) -> AudioResult<Self> {
        format.require_bytes_per_sample()?;

        let kind = detect::detect(path)?;
        if config.verify_magic {
            if let Some(found) = detect::magic_mismatch(path, kind) {
                warn!(
                    "{:?} looks like {} but its extension selects {}",
                    path, found, kind
                );
            }
        }

        let backend = Backend::open(kind, path, config)?;
        Self::new(backend, format, config.chunk_frames)
    }

    /// Wrap an opened backend
    pub fn new(backend: Backend, format: SampleFormat, chunk_frames: usize) -> AudioResult<Self> {
        let info = backend.info().clone();
        let mapper = PositionMapper::new(format, info.channels, info.total_frames)?;

        Ok(PcmStream {
            pending: PcmBlock::empty(info.native_depth, info.channels),
            backend,
            info,
            format,
            mapper,
            position: 0,
            pending_pos: 0,
            chunk_frames: chunk_frames.max(1),
        })
    }

    /// Stream properties
    pub fn info(&self) -> &StreamInfo {
        &self.info
    }

    /// Output format fixed at load
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Total decodable bytes in the output format
    pub fn byte_count(&self) -> u64 {
        self.mapper.byte_count()
    }

    /// Current read cursor in bytes
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Move the cursor to a frame-aligned byte offset
    pub fn set_position(&mut self, position: u64) -> AudioResult<()> {
        let frame = self.mapper.byte_to_frame(position)?;
        self.backend.seek_to_frame(frame)?;

        self.pending = PcmBlock::empty(self.info.native_depth, self.info.channels);
        self.pending_pos = 0;
        self.position = self.mapper.frame_to_byte(frame);

        debug!("seeked to byte {} (frame {})", position, frame);
        Ok(())
    }

    /// Decode and convert into `dst`, returning the number of bytes written.
    ///
    /// Returns fewer bytes than `dst` holds only at the end of the stream.
    pub fn read<S: OutputSample>(&mut self, dst: &mut [S]) -> AudioResult<usize> {
        let bytes_per_sample = self.mapper.bytes_per_sample();
        let remaining = (self.mapper.byte_count() - self.position) / bytes_per_sample;
        let wanted = usize::try_from(remaining).map_or(dst.len(), |r| r.min(dst.len()));

        let mut filled = 0;
        while filled < wanted {
            if self.pending_pos >= self.pending.len() {
                let block = self.backend.decode_next(self.chunk_frames)?;
                if block.is_empty() {
                    // Backend ran dry before the indexed length
                    warn!(
                        "{} stream ended {} samples early, padding with silence",
                        self.info.codec,
                        wanted - filled
                    );
                    dst[filled..wanted].fill(S::default());
                    filled = wanted;
                    break;
                }
                self.pending = block;
                self.pending_pos = 0;
            }

            let n = (self.pending.len() - self.pending_pos).min(wanted - filled);
            convert_into(&self.pending, self.pending_pos, &mut dst[filled..filled + n]);
            self.pending_pos += n;
            filled += n;
        }

        self.position += filled as u64 * bytes_per_sample;
        Ok(filled * bytes_per_sample as usize)
    }
}
