//! Backend selection from file extension, checked against magic bytes

use crate::error::{AudioError, AudioResult};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Codec backend chosen for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    /// RIFF/WAVE PCM
    Wav,
    /// MPEG-1/2 Layer III
    Mp3,
    /// Ogg/Vorbis
    Vorbis,
}

impl CodecKind {
    /// Extension this codec is selected by
    pub fn extension(&self) -> &'static str {
        match self {
            CodecKind::Wav => "wav",
            CodecKind::Mp3 => "mp3",
            CodecKind::Vorbis => "ogg",
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodecKind::Wav => "WAV",
            CodecKind::Mp3 => "MP3",
            CodecKind::Vorbis => "Vorbis",
        };
        f.write_str(name)
    }
}

/// Select a backend by extension, case-insensitively
pub fn detect<P: AsRef<Path>>(path: P) -> AudioResult<CodecKind> {
    let path = path.as_ref();

    if path.as_os_str().len() < 3 {
        return Err(AudioError::InvalidParam(format!(
            "path {:?} is too short to carry an extension",
            path
        )));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => Ok(CodecKind::Wav),
        "mp3" => Ok(CodecKind::Mp3),
        "ogg" => Ok(CodecKind::Vorbis),
        _ => Err(AudioError::InvalidParam(format!(
            "{:?} has invalid extension, must be one of wav/mp3/ogg",
            path
        ))),
    }
}

/// Guess the codec from the first bytes of a file
pub fn sniff(header: &[u8]) -> Option<CodecKind> {
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WAVE" {
        return Some(CodecKind::Wav);
    }
    if header.starts_with(b"OggS") {
        return Some(CodecKind::Vorbis);
    }
    if header.starts_with(b"ID3") {
        return Some(CodecKind::Mp3);
    }
    // MPEG audio frame sync, layer III
    if header.len() >= 2
        && header[0] == 0xFF
        && header[1] & 0xE0 == 0xE0
        && header[1] & 0x06 == 0x02
    {
        return Some(CodecKind::Mp3);
    }
    None
}

/// Compare the file's magic bytes with the extension's choice.
///
/// Returns the codec the header looks like when it differs from `expected`.
/// Unreadable or unrecognised headers are not a mismatch.
pub fn magic_mismatch(path: &Path, expected: CodecKind) -> Option<CodecKind> {
    let mut header = [0u8; 12];
    let read = File::open(path)
        .and_then(|mut f| read_prefix(&mut f, &mut header))
        .ok()?;

    sniff(&header[..read]).filter(|&found| found != expected)
}

fn read_prefix(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
