#![allow(dead_code)]

use hound::{WavSpec, WavWriter};
use std::path::{Path, PathBuf};

/// Deterministic test signal: a sawtooth with a prime step
pub fn pattern(i: usize) -> i16 {
    ((i * 37) % 2000) as i16 - 1000
}

/// Write a 16-bit integer WAV of `frames` frames filled from `pattern`
pub fn write_pattern_wav(path: &Path, sample_rate: u32, channels: u16, frames: usize) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for i in 0..frames * usize::from(channels) {
        writer.write_sample(pattern(i)).unwrap();
    }
    writer.finalize().unwrap();
}

/// 1 second, 22050 Hz, mono, 16-bit
pub fn one_second_mono(dir: &Path) -> PathBuf {
    let path = dir.join("one_second.wav");
    write_pattern_wav(&path, 22050, 1, 22050);
    path
}

/// Bytes of one MPEG-1 Layer III frame at 128 kbps, 44.1 kHz, no padding
pub const MP3_FRAME_BYTES: usize = 417;

/// Frames decoded from each MPEG-1 Layer III frame
pub const MP3_FRAME_SAMPLES: u64 = 1152;

/// Write `frames` silent mono MPEG-1 Layer III frames.
///
/// Each frame has an all-zero side info and main data block, which decodes
/// to digital silence.
pub fn write_silent_mp3(path: &Path, frames: usize) {
    let mut data = Vec::with_capacity(frames * MP3_FRAME_BYTES);
    for _ in 0..frames {
        // sync, MPEG-1, layer III, no CRC / 128 kbps, 44100 Hz / mono
        data.extend_from_slice(&[0xFF, 0xFB, 0x90, 0xC0]);
        data.resize(data.len() + MP3_FRAME_BYTES - 4, 0);
    }
    std::fs::write(path, data).unwrap();
}

/// Write silent mono MPEG-1 Layer III frames where frame `corrupt` declares
/// more Huffman pairs than a granule holds
pub fn write_mp3_with_corrupt_frame(path: &Path, frames: usize, corrupt: usize) {
    write_silent_mp3(path, frames);
    let mut data = std::fs::read(path).unwrap();

    // big_values of granule 0 follows main_data_begin, private bits, scfsi
    // and part2_3_length: side info bits 30..39
    let side_info = corrupt * MP3_FRAME_BYTES + 4;
    data[side_info + 3] |= 0x03;
    data[side_info + 4] |= 0xFE;
    std::fs::write(path, data).unwrap();
}

/// Committed encoded fixture under `tests/data`
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Linear chirp from 220 Hz rising 400 Hz per second, amplitude 0.5
pub fn chirp(frame: usize, sample_rate: u32) -> f32 {
    let t = frame as f32 / sample_rate as f32;
    0.5 * (2.0 * std::f32::consts::PI * (220.0 + 400.0 * t) * t).sin()
}
