//! Engine configuration

use crate::error::{AudioError, AudioResult};

/// Tunables shared by every backend an instance opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Frames requested from a backend per decode call
    pub chunk_frames: usize,
    /// Check magic bytes against the extension before opening
    pub verify_magic: bool,
    /// Replace undecodable compressed packets with silence instead of failing.
    /// Off by default, so a corrupt packet is a terminal decode error.
    pub conceal_corrupt_packets: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            chunk_frames: 4096,
            verify_magic: true,
            conceal_corrupt_packets: false,
        }
    }
}

impl EngineConfig {
    /// Set frames decoded per backend call
    pub fn with_chunk_frames(mut self, chunk_frames: usize) -> AudioResult<Self> {
        if chunk_frames == 0 {
            return Err(AudioError::InvalidParam(
                "chunk size must be at least one frame".to_string(),
            ));
        }
        self.chunk_frames = chunk_frames;
        Ok(self)
    }

    /// Enable or disable magic-byte verification
    pub fn with_verify_magic(mut self, verify_magic: bool) -> Self {
        self.verify_magic = verify_magic;
        self
    }

    /// Enable or disable concealment of corrupt packets
    pub fn with_conceal_corrupt_packets(mut self, conceal: bool) -> Self {
        self.conceal_corrupt_packets = conceal;
        self
    }
}
