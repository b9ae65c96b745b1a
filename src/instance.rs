//! The decode session state machine exposed to callers

use crate::config::EngineConfig;
use crate::convert::{check_format, OutputSample};
use crate::core::{SampleFormat, State, StreamInfo};
use crate::error::{AudioError, AudioResult, ErrorCode};
use crate::stream::PcmStream;
use log::{debug, info, warn};
use std::path::Path;

/// One loaded audio source with a sticky last-error code.
///
/// Every operation records its outcome in [`Instance::last_error`]. A backend
/// failure moves the instance to [`State::Error`] and drops the backend;
/// caller mistakes such as a mismatched buffer type or a misaligned seek are
/// reported without leaving [`State::Ready`].
pub struct Instance {
    state: State,
    last_error: ErrorCode,
    config: EngineConfig,
    stream: Option<PcmStream>,
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

impl Instance {
    /// Create an empty instance
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty instance with custom settings
    pub fn with_config(config: EngineConfig) -> Self {
        Instance {
            state: State::Init,
            last_error: ErrorCode::Success,
            config,
            stream: None,
        }
    }

    /// Create an instance and load `path` into it
    pub fn open<P: AsRef<Path>>(path: P, format: SampleFormat) -> AudioResult<Self> {
        let mut instance = Self::new();
        instance.load(path, format)?;
        Ok(instance)
    }

    /// Load a file, replacing whatever was loaded before.
    ///
    /// The previous backend is released before the new file is opened.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, format: SampleFormat) -> AudioResult<()> {
        let path = path.as_ref();

        if self.stream.take().is_some() {
            debug!("releasing previous stream before loading {:?}", path);
        }
        self.state = State::Init;

        match PcmStream::open(path, format, &self.config) {
            Ok(stream) => {
                info!(
                    "loaded {:?}: {} {} Hz, {} channels, {} bytes of {}",
                    path,
                    stream.info().codec,
                    stream.info().sample_rate,
                    stream.info().channels,
                    stream.byte_count(),
                    format
                );
                self.stream = Some(stream);
                self.state = State::Ready;
                self.last_error = ErrorCode::Success;
                Ok(())
            }
            Err(e) => {
                warn!("failed to load {:?}: {}", path, e);
                self.state = State::Error;
                self.last_error = e.code();
                Err(e)
            }
        }
    }

    /// Outcome of the last operation
    pub fn last_error(&self) -> ErrorCode {
        self.last_error
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Sample rate in Hz
    pub fn sample_rate(&mut self) -> AudioResult<u32> {
        let result = self.ready().map(|s| s.info().sample_rate);
        self.record(result)
    }

    /// Output format chosen at load
    pub fn sample_format(&mut self) -> AudioResult<SampleFormat> {
        let result = self.ready().map(PcmStream::format);
        self.record(result)
    }

    /// Number of interleaved channels
    pub fn channels(&mut self) -> AudioResult<u16> {
        let result = self.ready().map(|s| s.info().channels);
        self.record(result)
    }

    /// Total decodable bytes in the output format
    pub fn byte_count(&mut self) -> AudioResult<u64> {
        let result = self.ready().map(PcmStream::byte_count);
        self.record(result)
    }

    /// Read cursor in output bytes
    pub fn position(&mut self) -> AudioResult<u64> {
        let result = self.ready().map(PcmStream::position);
        self.record(result)
    }

    /// Stream properties of the loaded file
    pub fn info(&mut self) -> AudioResult<StreamInfo> {
        let result = self.ready().map(|s| s.info().clone());
        self.record(result)
    }

    /// Move the read cursor.
    ///
    /// `position` must lie on a frame boundary (`InvalidParam` otherwise) and
    /// must not exceed the byte count (`IndexOutOfBounds` otherwise). The end
    /// of the stream itself is a valid position.
    pub fn set_position(&mut self, position: u64) -> AudioResult<()> {
        let result = self.ready_mut().and_then(|s| s.set_position(position));
        self.record(result)
    }

    /// Decode into `buf`, returning the number of bytes written.
    ///
    /// The element type of `buf` must match the format chosen at load.
    /// At the end of the stream fewer bytes than the buffer holds are
    /// returned, and `Ok(0)` once the cursor sits at the end.
    pub fn read<S: OutputSample>(&mut self, buf: &mut [S]) -> AudioResult<usize> {
        let result = self.ready_mut().and_then(|s| {
            check_format::<S>(s.format())?;
            s.read(buf)
        });
        self.record(result)
    }

    /// Release the backend and return to `Init`. Safe to call repeatedly.
    pub fn release(&mut self) {
        if self.stream.take().is_some() {
            debug!("released stream");
        }
        self.state = State::Init;
        self.last_error = ErrorCode::Success;
    }

    fn ready(&self) -> AudioResult<&PcmStream> {
        match (self.state, self.stream.as_ref()) {
            (State::Ready, Some(stream)) => Ok(stream),
            (state, _) => Err(AudioError::InvalidState(format!(
                "instance is {state:?}, not Ready"
            ))),
        }
    }

    fn ready_mut(&mut self) -> AudioResult<&mut PcmStream> {
        match (self.state, self.stream.as_mut()) {
            (State::Ready, Some(stream)) => Ok(stream),
            (state, _) => Err(AudioError::InvalidState(format!(
                "instance is {state:?}, not Ready"
            ))),
        }
    }

    fn record<T>(&mut self, result: AudioResult<T>) -> AudioResult<T> {
        match &result {
            Ok(_) => self.last_error = ErrorCode::Success,
            Err(e) => {
                self.last_error = e.code();
                if !e.is_recoverable() && self.state == State::Ready {
                    warn!("stream failed, instance unusable until reloaded: {}", e);
                    self.stream = None;
                    self.state = State::Error;
                }
            }
        }
        result
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        self.release();
    }
}
