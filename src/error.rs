use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;

/// Outcome code recorded on an instance after every operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    /// The last operation succeeded
    #[default]
    Success,
    /// Codec-internal fault that cannot be classified more precisely
    GenericError,
    /// Operation not allowed in the current instance state
    InvalidState,
    /// Invalid argument (bad extension, mismatched buffer, misaligned seek)
    InvalidParam,
    /// The file uses a format variant no backend implements
    Unsupported,
    /// A decode buffer could not be allocated
    OutOfMemory,
    /// The file could not be opened
    CannotOpenFile,
    /// A position beyond the end of the stream was requested
    IndexOutOfBounds,
}

/// Comprehensive error types for decoding operations
#[derive(Error, Debug)]
pub enum AudioError {
    /// IO error while reading an already opened stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file could not be opened at all
    #[error("Cannot open {path:?}: {source}")]
    CannotOpenFile {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Unsupported format variant
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Container headers could not be parsed
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// Decoding failed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Invalid argument supplied by the caller
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    /// Operation not valid in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Requested position lies past the end of the stream
    #[error("Position {position} is out of bounds (byte count {byte_count})")]
    IndexOutOfBounds {
        /// Requested byte position
        position: u64,
        /// Total decodable bytes
        byte_count: u64,
    },

    /// Allocation of a decode buffer failed
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

impl AudioError {
    /// Public outcome code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AudioError::Io(_) => ErrorCode::GenericError,
            AudioError::CannotOpenFile { .. } => ErrorCode::CannotOpenFile,
            AudioError::UnsupportedFormat(_) => ErrorCode::Unsupported,
            AudioError::MalformedContainer(_) => ErrorCode::GenericError,
            AudioError::DecodeError(_) => ErrorCode::GenericError,
            AudioError::InvalidParam(_) => ErrorCode::InvalidParam,
            AudioError::InvalidState(_) => ErrorCode::InvalidState,
            AudioError::IndexOutOfBounds { .. } => ErrorCode::IndexOutOfBounds,
            AudioError::OutOfMemory(_) => ErrorCode::OutOfMemory,
        }
    }

    /// Caller mistakes leave a ready instance usable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AudioError::InvalidParam(_)
                | AudioError::IndexOutOfBounds { .. }
                | AudioError::InvalidState(_)
        )
    }
}

impl From<symphonia::core::errors::Error> for AudioError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        use symphonia::core::errors::Error as SymphoniaError;

        match err {
            SymphoniaError::IoError(e) => AudioError::Io(e),
            SymphoniaError::Unsupported(what) => AudioError::UnsupportedFormat(what.to_string()),
            SymphoniaError::DecodeError(what) => AudioError::DecodeError(what.to_string()),
            SymphoniaError::SeekError(kind) => {
                AudioError::DecodeError(format!("seek failed: {kind:?}"))
            }
            e => AudioError::DecodeError(e.to_string()),
        }
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => AudioError::Io(e),
            hound::Error::FormatError(what) => AudioError::MalformedContainer(what.to_string()),
            hound::Error::Unsupported => {
                AudioError::UnsupportedFormat("WAV encoding not supported".to_string())
            }
            e => AudioError::MalformedContainer(e.to_string()),
        }
    }
}
