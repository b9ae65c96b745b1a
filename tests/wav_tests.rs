//! Public API behaviour against WAV files written on the fly

mod common;

use audio_cursor::{CodecKind, ErrorCode, Instance, SampleFormat, State};
use common::{one_second_mono, pattern, write_pattern_wav};
use std::thread;

#[test]
fn test_one_second_mono_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = one_second_mono(dir.path());

    let mut instance = Instance::open(&path, SampleFormat::S16).unwrap();
    assert_eq!(instance.state(), State::Ready);
    assert_eq!(instance.sample_rate().unwrap(), 22050);
    assert_eq!(instance.channels().unwrap(), 1);
    assert_eq!(instance.sample_format().unwrap(), SampleFormat::S16);
    assert_eq!(instance.byte_count().unwrap(), 44100);
    assert_eq!(instance.position().unwrap(), 0);

    let info = instance.info().unwrap();
    assert_eq!(info.codec, CodecKind::Wav);
    assert_eq!(info.total_frames, 22050);
    assert!((info.duration().as_secs_f64() - 1.0).abs() < 1e-9);
}

#[test]
fn test_first_block_matches_written_samples() {
    let dir = tempfile::tempdir().unwrap();
    let path = one_second_mono(dir.path());

    let mut instance = Instance::open(&path, SampleFormat::S16).unwrap();
    let mut buf = [0i16; 16];
    assert_eq!(instance.read(&mut buf).unwrap(), 32);

    let expected: Vec<i16> = (0..16).map(pattern).collect();
    assert_eq!(buf.to_vec(), expected);
    assert_eq!(instance.position().unwrap(), 32);
    assert_eq!(instance.last_error(), ErrorCode::Success);
}

#[test]
fn test_reads_advance_until_short_final_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.wav");
    write_pattern_wav(&path, 8000, 2, 1000);

    let mut instance = Instance::open(&path, SampleFormat::S16).unwrap();
    let byte_count = instance.byte_count().unwrap();
    assert_eq!(byte_count, 4000);

    // 300 samples per read: 600 bytes, which does not divide 4000
    let mut buf = vec![0i16; 300];
    let mut total = 0u64;
    let mut last = usize::MAX;
    let mut decoded = Vec::new();
    loop {
        let read = instance.read(&mut buf).unwrap();
        if read == 0 {
            break;
        }
        assert!(read <= last);
        last = read;
        decoded.extend_from_slice(&buf[..read / 2]);
        total += read as u64;
        assert_eq!(instance.position().unwrap(), total);
    }

    assert_eq!(total, byte_count);
    assert_eq!(last, 4000 % 600);
    assert_eq!(instance.state(), State::Ready);
    assert_eq!(instance.last_error(), ErrorCode::Success);

    let expected: Vec<i16> = (0..2000).map(pattern).collect();
    assert_eq!(decoded, expected);
}

#[test]
fn test_seek_then_read_matches_offset() {
    let dir = tempfile::tempdir().unwrap();
    let path = one_second_mono(dir.path());

    let mut instance = Instance::open(&path, SampleFormat::S16).unwrap();
    instance.set_position(16384).unwrap();
    assert_eq!(instance.position().unwrap(), 16384);

    let mut buf = [0i16; 8];
    instance.read(&mut buf).unwrap();
    let expected: Vec<i16> = (8192..8200).map(pattern).collect();
    assert_eq!(buf.to_vec(), expected);

    // back to the start
    instance.set_position(0).unwrap();
    instance.read(&mut buf).unwrap();
    let expected: Vec<i16> = (0..8).map(pattern).collect();
    assert_eq!(buf.to_vec(), expected);
}

#[test]
fn test_seek_errors_are_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let path = one_second_mono(dir.path());

    let mut instance = Instance::open(&path, SampleFormat::S16).unwrap();
    instance.set_position(100).unwrap();

    let err = instance.set_position(101).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParam);
    assert_eq!(instance.last_error(), ErrorCode::InvalidParam);

    let err = instance.set_position(44102).unwrap_err();
    assert_eq!(err.code(), ErrorCode::IndexOutOfBounds);
    assert_eq!(instance.last_error(), ErrorCode::IndexOutOfBounds);

    // cursor untouched and instance still usable
    assert_eq!(instance.state(), State::Ready);
    assert_eq!(instance.position().unwrap(), 100);
    assert_eq!(instance.last_error(), ErrorCode::Success);
}

#[test]
fn test_position_at_end_reads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = one_second_mono(dir.path());

    let mut instance = Instance::open(&path, SampleFormat::S16).unwrap();
    instance.set_position(44100).unwrap();

    let mut buf = [0i16; 16];
    assert_eq!(instance.read(&mut buf).unwrap(), 0);
    assert_eq!(instance.state(), State::Ready);
}

#[test]
fn test_output_formats_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = one_second_mono(dir.path());

    let mut s16 = Instance::open(&path, SampleFormat::S16).unwrap();
    let mut s32 = Instance::open(&path, SampleFormat::S32).unwrap();
    let mut f32 = Instance::open(&path, SampleFormat::F32).unwrap();

    assert_eq!(s32.byte_count().unwrap(), 88200);
    assert_eq!(f32.byte_count().unwrap(), 88200);

    let mut a = [0i16; 64];
    let mut b = [0i32; 64];
    let mut c = [0f32; 64];
    assert_eq!(s16.read(&mut a).unwrap(), 128);
    assert_eq!(s32.read(&mut b).unwrap(), 256);
    assert_eq!(f32.read(&mut c).unwrap(), 256);

    for i in 0..64 {
        assert_eq!(b[i], i32::from(a[i]) << 16);
        assert_eq!(c[i], f32::from(a[i]) / 32768.0);
    }
}

#[test]
fn test_unknown_extension_is_invalid_param() {
    let dir = tempfile::tempdir().unwrap();
    let wav = one_second_mono(dir.path());
    let flac = dir.path().join("one_second.flac");
    std::fs::copy(&wav, &flac).unwrap();

    let mut instance = Instance::new();
    let err = instance.load(&flac, SampleFormat::S16).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParam);
    assert_eq!(instance.state(), State::Error);
    assert_eq!(instance.last_error(), ErrorCode::InvalidParam);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let mut instance = Instance::new();
    let err = instance
        .load(dir.path().join("nowhere.wav"), SampleFormat::S16)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CannotOpenFile);
    assert_eq!(instance.state(), State::Error);
}

#[test]
fn test_uppercase_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("LOUD.WAV");
    write_pattern_wav(&path, 44100, 2, 10);

    let mut instance = Instance::open(&path, SampleFormat::S16).unwrap();
    assert_eq!(instance.channels().unwrap(), 2);
    assert_eq!(instance.byte_count().unwrap(), 40);
}

#[test]
fn test_release_twice_then_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = one_second_mono(dir.path());

    let mut instance = Instance::open(&path, SampleFormat::S16).unwrap();
    instance.release();
    instance.release();
    assert_eq!(instance.state(), State::Init);

    let mut buf = [0i16; 4];
    assert_eq!(instance.read(&mut buf).unwrap_err().code(), ErrorCode::InvalidState);

    instance.load(&path, SampleFormat::S16).unwrap();
    assert_eq!(instance.read(&mut buf).unwrap(), 8);
}

#[test]
fn test_instances_on_separate_threads() {
    let dir = tempfile::tempdir().unwrap();
    let path = one_second_mono(dir.path());

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let path = path.clone();
            thread::spawn(move || {
                let mut instance = Instance::open(&path, SampleFormat::S16).unwrap();
                let offset = n * 4096u64;
                instance.set_position(offset).unwrap();

                let mut buf = [0i16; 32];
                instance.read(&mut buf).unwrap();
                (offset, buf)
            })
        })
        .collect();

    for handle in handles {
        let (offset, buf) = handle.join().unwrap();
        let first = (offset / 2) as usize;
        let expected: Vec<i16> = (first..first + 32).map(pattern).collect();
        assert_eq!(buf.to_vec(), expected);
    }
}

#[test]
fn test_instance_moves_between_threads() {
    let dir = tempfile::tempdir().unwrap();
    let path = one_second_mono(dir.path());

    let mut instance = Instance::open(&path, SampleFormat::S16).unwrap();
    let mut buf = [0i16; 4];
    instance.read(&mut buf).unwrap();

    let position = thread::spawn(move || {
        let mut buf = [0i16; 4];
        instance.read(&mut buf).unwrap();
        instance.position().unwrap()
    })
    .join()
    .unwrap();

    assert_eq!(position, 16);
}
