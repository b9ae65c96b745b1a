//! Byte position mapping and the packet index used for exact seeks

use crate::core::SampleFormat;
use crate::error::{AudioError, AudioResult};

/// Translates output-domain byte offsets to sample frames and back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionMapper {
    bytes_per_sample: u64,
    channels: u64,
    byte_count: u64,
}

impl PositionMapper {
    /// Create a mapper for a loaded stream
    pub fn new(format: SampleFormat, channels: u16, total_frames: u64) -> AudioResult<Self> {
        let bytes_per_sample = format.require_bytes_per_sample()?;
        let channels = u64::from(channels);
        Ok(PositionMapper {
            bytes_per_sample,
            channels,
            byte_count: total_frames * channels * bytes_per_sample,
        })
    }

    /// Bytes of one output sample
    pub fn bytes_per_sample(&self) -> u64 {
        self.bytes_per_sample
    }

    /// Bytes of one output frame
    pub fn bytes_per_frame(&self) -> u64 {
        self.bytes_per_sample * self.channels
    }

    /// Total decodable bytes
    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    /// Frame index of a byte position.
    ///
    /// Positions past the end fail with `IndexOutOfBounds`; positions that do
    /// not sit on a frame boundary fail with `InvalidParam`.
    pub fn byte_to_frame(&self, position: u64) -> AudioResult<u64> {
        if position > self.byte_count {
            return Err(AudioError::IndexOutOfBounds {
                position,
                byte_count: self.byte_count,
            });
        }

        let frame_size = self.bytes_per_frame();
        if position % frame_size != 0 {
            return Err(AudioError::InvalidParam(format!(
                "position {position} is not aligned to the {frame_size}-byte frame size"
            )));
        }

        Ok(position / frame_size)
    }

    /// Byte position of a frame index
    pub fn frame_to_byte(&self, frame: u64) -> u64 {
        (frame * self.bytes_per_frame()).min(self.byte_count)
    }
}

/// One compressed packet in decode order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketEntry {
    /// First frame the packet decodes to
    pub ts: u64,
    /// Number of frames the packet decodes to
    pub dur: u64,
}

impl PacketEntry {
    /// Frame just past this packet
    pub fn end(&self) -> u64 {
        self.ts + self.dur
    }
}

/// Timestamps of every packet in a compressed stream, built by a scan at open
#[derive(Debug, Clone, Default)]
pub struct SeekIndex {
    entries: Vec<PacketEntry>,
}

impl SeekIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the next packet. Packets must arrive in timestamp order.
    ///
    /// Packets that decode to no frames, such as those trimmed away as
    /// encoder delay or padding, are not recorded.
    pub fn push(&mut self, ts: u64, dur: u64) -> AudioResult<()> {
        if dur == 0 {
            return Ok(());
        }
        if let Some(last) = self.entries.last() {
            if ts < last.ts {
                return Err(AudioError::DecodeError(format!(
                    "packet timestamp {ts} precedes {}",
                    last.ts
                )));
            }
        }
        self.entries.try_reserve(1)?;
        self.entries.push(PacketEntry { ts, dur });
        Ok(())
    }

    /// Number of indexed packets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no packets were indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frame at which decoding starts
    pub fn first_frame(&self) -> u64 {
        self.entries.first().map_or(0, |e| e.ts)
    }

    /// Total frames covered by the index
    pub fn total_frames(&self) -> u64 {
        self.entries
            .last()
            .map_or(0, |last| last.end().saturating_sub(self.first_frame()))
    }

    /// Packet to resume decoding from so that `frame` decodes exactly.
    ///
    /// Returns the entry `preroll` packets before the one containing `frame`,
    /// along with its position in the index, or `None` if no packet covers
    /// `frame`.
    pub fn seek_point(&self, frame: u64, preroll: usize) -> Option<(usize, &PacketEntry)> {
        let idx = self.entries.partition_point(|e| e.end() <= frame);
        self.entries.get(idx).filter(|e| e.ts <= frame)?;

        let start = idx.saturating_sub(preroll);
        self.entries.get(start).map(|e| (start, e))
    }
}
