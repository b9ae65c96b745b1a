use crate::detect::CodecKind;
use crate::error::{AudioError, AudioResult};
use std::fmt;
use std::time::Duration;

/// Output sample representation requested at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleFormat {
    /// No format chosen; never valid for a load
    #[default]
    Undefined,
    /// 16-bit signed integer
    S16,
    /// 32-bit signed integer
    S32,
    /// 32-bit float in [-1.0, 1.0)
    F32,
}

impl SampleFormat {
    /// Get bytes per sample, `None` for `Undefined`
    pub fn bytes_per_sample(&self) -> Option<u64> {
        match self {
            SampleFormat::Undefined => None,
            SampleFormat::S16 => Some(2),
            SampleFormat::S32 | SampleFormat::F32 => Some(4),
        }
    }

    /// Bytes per sample, failing for `Undefined`
    pub fn require_bytes_per_sample(&self) -> AudioResult<u64> {
        self.bytes_per_sample()
            .ok_or_else(|| AudioError::InvalidParam("sample format is undefined".to_string()))
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleFormat::Undefined => "Undefined",
            SampleFormat::S16 => "S16",
            SampleFormat::S32 => "S32",
            SampleFormat::F32 => "F32",
        };
        f.write_str(name)
    }
}

/// Lifecycle state of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    /// Created, nothing loaded
    #[default]
    Init,
    /// A file was parsed and is readable
    Ready,
    /// A load or decode failed; cleared by the next successful load
    Error,
}

/// Native bit depth samples are decoded into before conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 8-bit integer (unsigned in WAV, re-centred to signed)
    I8,
    /// 16-bit signed
    I16,
    /// 24-bit signed
    I24,
    /// 32-bit signed
    I32,
    /// 32-bit floating point
    F32,
}

impl BitDepth {
    /// Significant bits of an integer depth, `None` for float
    pub fn int_bits(&self) -> Option<u32> {
        match self {
            BitDepth::I8 => Some(8),
            BitDepth::I16 => Some(16),
            BitDepth::I24 => Some(24),
            BitDepth::I32 => Some(32),
            BitDepth::F32 => None,
        }
    }

    /// Integer depth from a bit count
    pub fn from_int_bits(bits: u16) -> AudioResult<Self> {
        match bits {
            8 => Ok(BitDepth::I8),
            16 => Ok(BitDepth::I16),
            24 => Ok(BitDepth::I24),
            32 => Ok(BitDepth::I32),
            n => Err(AudioError::UnsupportedFormat(format!(
                "{n}-bit integer samples"
            ))),
        }
    }

    /// Get bytes per sample
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            BitDepth::I8 => 1,
            BitDepth::I16 => 2,
            BitDepth::I24 => 3,
            BitDepth::I32 => 4,
            BitDepth::F32 => 4,
        }
    }
}

/// Stream properties reported by a backend once opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Codec backend that decoded the stream
    pub codec: CodecKind,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Depth samples are decoded into
    pub native_depth: BitDepth,
    /// Total number of sample frames
    pub total_frames: u64,
}

impl StreamInfo {
    /// Create stream info, rejecting empty layouts
    pub fn new(
        codec: CodecKind,
        sample_rate: u32,
        channels: u16,
        native_depth: BitDepth,
        total_frames: u64,
    ) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::MalformedContainer(
                "sample rate is zero".to_string(),
            ));
        }
        if channels == 0 {
            return Err(AudioError::MalformedContainer(
                "channel count is zero".to_string(),
            ));
        }

        Ok(StreamInfo {
            codec,
            sample_rate,
            channels,
            native_depth,
            total_frames,
        })
    }

    /// Total duration of the stream
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.total_frames as f64 / self.sample_rate as f64)
    }

    /// Decodable size in bytes of the given output format
    pub fn byte_count(&self, format: SampleFormat) -> AudioResult<u64> {
        let bytes_per_sample = format.require_bytes_per_sample()?;
        Ok(self.total_frames * u64::from(self.channels) * bytes_per_sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_sample() {
        assert_eq!(SampleFormat::S16.bytes_per_sample(), Some(2));
        assert_eq!(SampleFormat::S32.bytes_per_sample(), Some(4));
        assert_eq!(SampleFormat::F32.bytes_per_sample(), Some(4));
        assert_eq!(SampleFormat::Undefined.bytes_per_sample(), None);
        assert!(SampleFormat::Undefined.require_bytes_per_sample().is_err());
    }

    #[test]
    fn test_bit_depth_from_bits() {
        assert_eq!(BitDepth::from_int_bits(24).unwrap(), BitDepth::I24);
        assert_eq!(BitDepth::I24.int_bits(), Some(24));
        assert_eq!(BitDepth::F32.int_bits(), None);
        assert!(BitDepth::from_int_bits(12).is_err());
    }

    #[test]
    fn test_stream_info_byte_count() {
        let info = StreamInfo::new(CodecKind::Wav, 22050, 1, BitDepth::I16, 22050).unwrap();

        assert_eq!(info.byte_count(SampleFormat::S16).unwrap(), 44100);
        assert_eq!(info.byte_count(SampleFormat::F32).unwrap(), 88200);
        assert_eq!(info.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_stream_info_invalid() {
        assert!(StreamInfo::new(CodecKind::Mp3, 0, 2, BitDepth::F32, 0).is_err());
        assert!(StreamInfo::new(CodecKind::Mp3, 44100, 0, BitDepth::F32, 0).is_err());
    }
}
