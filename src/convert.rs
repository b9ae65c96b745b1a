//! Conversion from native decoded samples to the caller's output format
//!
//! Integer sources are rescaled by bit shifts, integer to float divides by the
//! full-scale value of the source depth, and float to integer clamps before
//! truncating.

use crate::core::{PcmBlock, PcmData, SampleFormat};
use crate::error::{AudioError, AudioResult};

/// Element type of a caller's read buffer
pub trait OutputSample: Copy + Default + Send + 'static {
    /// Format this element type represents
    const FORMAT: SampleFormat;

    /// Convert an integer sample of `bits` significant bits
    fn from_int(sample: i32, bits: u32) -> Self;

    /// Convert a float sample
    fn from_float(sample: f32) -> Self;
}

impl OutputSample for i16 {
    const FORMAT: SampleFormat = SampleFormat::S16;

    fn from_int(sample: i32, bits: u32) -> Self {
        if bits >= 16 {
            (sample >> (bits - 16)) as i16
        } else {
            (sample << (16 - bits)) as i16
        }
    }

    fn from_float(sample: f32) -> Self {
        (sample * 32768.0).clamp(i16::MIN as f32, i16::MAX as f32) as i16
    }
}

impl OutputSample for i32 {
    const FORMAT: SampleFormat = SampleFormat::S32;

    fn from_int(sample: i32, bits: u32) -> Self {
        if bits >= 32 {
            sample
        } else {
            sample << (32 - bits)
        }
    }

    fn from_float(sample: f32) -> Self {
        (f64::from(sample) * 2_147_483_648.0).clamp(i32::MIN as f64, i32::MAX as f64) as i32
    }
}

impl OutputSample for f32 {
    const FORMAT: SampleFormat = SampleFormat::F32;

    fn from_int(sample: i32, bits: u32) -> Self {
        let full_scale = (1u64 << (bits - 1)) as f64;
        (f64::from(sample) / full_scale) as f32
    }

    fn from_float(sample: f32) -> Self {
        sample
    }
}

/// Convert `dst.len()` samples of `block`, starting at sample `offset`
pub fn convert_into<S: OutputSample>(block: &PcmBlock, offset: usize, dst: &mut [S]) {
    match block.data() {
        PcmData::Int(samples) => {
            let bits = block.depth().int_bits().unwrap_or(32);
            for (out, &sample) in dst.iter_mut().zip(&samples[offset..]) {
                *out = S::from_int(sample, bits);
            }
        }
        PcmData::Float(samples) => {
            for (out, &sample) in dst.iter_mut().zip(&samples[offset..]) {
                *out = S::from_float(sample);
            }
        }
    }
}

/// Reject buffers whose element type differs from the loaded format
pub fn check_format<S: OutputSample>(loaded: SampleFormat) -> AudioResult<()> {
    if S::FORMAT != loaded {
        return Err(AudioError::InvalidParam(format!(
            "sample format mismatch, buffer should hold {loaded} samples but holds {}",
            S::FORMAT
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BitDepth;

    fn convert<S: OutputSample>(block: &PcmBlock) -> Vec<S> {
        let mut out = vec![S::default(); block.len()];
        convert_into(block, 0, &mut out);
        out
    }

    #[test]
    fn test_int_to_int_widening() {
        let block = PcmBlock::from_int(BitDepth::I16, 1, vec![1, -1, 32767, -32768]);
        let out: Vec<i32> = convert(&block);
        assert_eq!(out, vec![65536, -65536, 32767 << 16, i32::MIN]);
    }

    #[test]
    fn test_int_to_int_narrowing() {
        let block = PcmBlock::from_int(BitDepth::I24, 1, vec![0x7F_FFFF, -0x80_0000, 256, -1]);
        let out: Vec<i16> = convert(&block);
        assert_eq!(out, vec![i16::MAX, i16::MIN, 1, -1]);

        let block = PcmBlock::from_int(BitDepth::I8, 1, vec![127, -128, 1]);
        let out: Vec<i16> = convert(&block);
        assert_eq!(out, vec![127 << 8, i16::MIN, 256]);
    }

    #[test]
    fn test_int_to_float() {
        let block = PcmBlock::from_int(BitDepth::I16, 1, vec![-32768, 0, 16384]);
        let out: Vec<f32> = convert(&block);
        assert_eq!(out, vec![-1.0, 0.0, 0.5]);

        let block = PcmBlock::from_int(BitDepth::I32, 1, vec![i32::MIN, i32::MAX]);
        let out: Vec<f32> = convert(&block);
        assert_eq!(out[0], -1.0);
        assert!(out[1] <= 1.0);
    }

    #[test]
    fn test_float_passthrough() {
        let samples = vec![0.25, -0.75, 1.5];
        let block = PcmBlock::from_float(1, samples.clone());
        let out: Vec<f32> = convert(&block);
        assert_eq!(out, samples);
    }

    #[test]
    fn test_float_to_int_clamps() {
        let block = PcmBlock::from_float(1, vec![2.0, -2.0, 0.5, -0.5, 1.0]);

        let out: Vec<i16> = convert(&block);
        assert_eq!(out, vec![i16::MAX, i16::MIN, 16384, -16384, i16::MAX]);

        let out: Vec<i32> = convert(&block);
        assert_eq!(out, vec![i32::MAX, i32::MIN, 1 << 30, -(1 << 30), i32::MAX]);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let block = PcmBlock::from_float(2, vec![0.1, -0.3, 0.7, -0.9]);
        let first: Vec<i16> = convert(&block);
        let second: Vec<i16> = convert(&block);
        assert_eq!(first, second);
    }

    #[test]
    fn test_convert_into_offset() {
        let block = PcmBlock::from_int(BitDepth::I16, 1, vec![1, 2, 3, 4]);
        let mut dst = [0i16; 2];
        convert_into(&block, 2, &mut dst);
        assert_eq!(dst, [3, 4]);
    }

    #[test]
    fn test_check_format() {
        assert!(check_format::<i16>(SampleFormat::S16).is_ok());
        assert!(check_format::<f32>(SampleFormat::S32).is_err());
        assert!(check_format::<i32>(SampleFormat::Undefined).is_err());
    }
}
