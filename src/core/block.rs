use super::audio::BitDepth;
use crate::error::AudioResult;

/// Interleaved native samples
#[derive(Debug, Clone, PartialEq)]
pub enum PcmData {
    /// Integer samples, right-aligned at the block's bit depth
    Int(Vec<i32>),
    /// Float samples, nominally in [-1.0, 1.0]
    Float(Vec<f32>),
}

/// A run of decoded sample frames in the backend's native depth
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBlock {
    depth: BitDepth,
    channels: u16,
    data: PcmData,
}

/// Allocate an empty sample vector, reporting allocation failure as an error
pub fn alloc_samples<T>(len: usize) -> AudioResult<Vec<T>> {
    let mut samples = Vec::new();
    samples.try_reserve_exact(len)?;
    Ok(samples)
}

impl PcmBlock {
    /// Block with no frames
    pub fn empty(depth: BitDepth, channels: u16) -> Self {
        let data = match depth {
            BitDepth::F32 => PcmData::Float(Vec::new()),
            _ => PcmData::Int(Vec::new()),
        };
        PcmBlock {
            depth,
            channels,
            data,
        }
    }

    /// `frames` frames of digital silence
    pub fn silence(depth: BitDepth, channels: u16, frames: usize) -> AudioResult<Self> {
        let len = frames * usize::from(channels);
        let data = match depth {
            BitDepth::F32 => {
                let mut samples = alloc_samples(len)?;
                samples.resize(len, 0.0);
                PcmData::Float(samples)
            }
            _ => {
                let mut samples = alloc_samples(len)?;
                samples.resize(len, 0);
                PcmData::Int(samples)
            }
        };
        Ok(PcmBlock {
            depth,
            channels,
            data,
        })
    }

    /// Wrap interleaved integer samples
    pub fn from_int(depth: BitDepth, channels: u16, samples: Vec<i32>) -> Self {
        debug_assert!(depth != BitDepth::F32);
        PcmBlock {
            depth,
            channels,
            data: PcmData::Int(samples),
        }
    }

    /// Wrap interleaved float samples
    pub fn from_float(channels: u16, samples: Vec<f32>) -> Self {
        PcmBlock {
            depth: BitDepth::F32,
            channels,
            data: PcmData::Float(samples),
        }
    }

    /// Native depth of the samples
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Number of interleaved channels
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Raw sample storage
    pub fn data(&self) -> &PcmData {
        &self.data
    }

    /// Number of samples across all channels
    pub fn len(&self) -> usize {
        match &self.data {
            PcmData::Int(samples) => samples.len(),
            PcmData::Float(samples) => samples.len(),
        }
    }

    /// Check if block holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of whole frames
    pub fn frames(&self) -> usize {
        self.len() / usize::from(self.channels.max(1))
    }

    /// Drop the first `frames` frames
    pub fn skip_frames(&mut self, frames: usize) {
        let n = (frames * usize::from(self.channels)).min(self.len());
        match &mut self.data {
            PcmData::Int(samples) => {
                samples.drain(..n);
            }
            PcmData::Float(samples) => {
                samples.drain(..n);
            }
        }
    }

    /// Split off and return the first `frames` frames, keeping the rest
    pub fn take_frames(&mut self, frames: usize) -> PcmBlock {
        let n = (frames * usize::from(self.channels)).min(self.len());
        let head = match &mut self.data {
            PcmData::Int(samples) => PcmData::Int(samples.drain(..n).collect()),
            PcmData::Float(samples) => PcmData::Float(samples.drain(..n).collect()),
        };
        PcmBlock {
            depth: self.depth,
            channels: self.channels,
            data: head,
        }
    }
}
