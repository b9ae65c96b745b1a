use crate::core::block::alloc_samples;
use crate::core::{BitDepth, PcmBlock, StreamInfo};
use crate::detect::CodecKind;
use crate::error::{AudioError, AudioResult};
use hound::WavReader;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// WAV decoder over an uncompressed RIFF/WAVE data chunk
pub struct WavDecoder {
    reader: WavReader<BufReader<File>>,
    info: StreamInfo,
    /// Next frame the reader will yield
    frame: u64,
}

impl WavDecoder {
    /// Open and parse the `fmt ` and `data` chunks of a WAV file
    pub fn open<P: AsRef<Path>>(path: P) -> AudioResult<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| AudioError::CannotOpenFile {
            path: path.to_path_buf(),
            source,
        })?;

        let reader = WavReader::new(BufReader::new(file))?;
        let spec = reader.spec();

        let native_depth = match spec.sample_format {
            hound::SampleFormat::Int => BitDepth::from_int_bits(spec.bits_per_sample)?,
            hound::SampleFormat::Float if spec.bits_per_sample == 32 => BitDepth::F32,
            hound::SampleFormat::Float => {
                return Err(AudioError::UnsupportedFormat(format!(
                    "{}-bit float WAV",
                    spec.bits_per_sample
                )));
            }
        };

        let info = StreamInfo::new(
            CodecKind::Wav,
            spec.sample_rate,
            spec.channels,
            native_depth,
            u64::from(reader.duration()),
        )?;

        debug!(
            "WAV {:?}: {} Hz, {} channels, {:?}, {} frames",
            path, info.sample_rate, info.channels, info.native_depth, info.total_frames
        );

        Ok(WavDecoder {
            reader,
            info,
            frame: 0,
        })
    }
}

impl super::Decoder for WavDecoder {
    fn info(&self) -> &StreamInfo {
        &self.info
    }

    fn decode_next(&mut self, max_frames: usize) -> AudioResult<PcmBlock> {
        let channels = self.info.channels;
        let remaining = self.info.total_frames.saturating_sub(self.frame);
        let frames = usize::try_from(remaining).map_or(max_frames, |r| r.min(max_frames));
        let len = frames * usize::from(channels);

        let block = match self.info.native_depth {
            BitDepth::F32 => {
                let mut samples = alloc_samples(len)?;
                for sample in self.reader.samples::<f32>().take(len) {
                    samples.push(sample?);
                }
                PcmBlock::from_float(channels, samples)
            }
            depth => {
                let mut samples = alloc_samples(len)?;
                for sample in self.reader.samples::<i32>().take(len) {
                    samples.push(sample?);
                }
                PcmBlock::from_int(depth, channels, samples)
            }
        };

        self.frame += block.frames() as u64;
        Ok(block)
    }

    fn seek_to_frame(&mut self, frame: u64) -> AudioResult<()> {
        let frame = frame.min(self.info.total_frames);
        let target = u32::try_from(frame).map_err(|_| AudioError::IndexOutOfBounds {
            position: frame,
            byte_count: self.info.total_frames,
        })?;

        self.reader.seek(target)?;
        self.frame = frame;
        Ok(())
    }
}
