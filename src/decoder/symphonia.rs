use crate::config::EngineConfig;
use crate::core::block::alloc_samples;
use crate::core::{BitDepth, PcmBlock, StreamInfo};
use crate::detect::CodecKind;
use crate::error::{AudioError, AudioResult};
use crate::seek::SeekIndex;
use log::{debug, trace, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{CodecType, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::{i24, u24, Sample};

/// Symphonia-based decoder for packetised compressed streams.
///
/// Opening scans every packet once to build a [`SeekIndex`], which yields the
/// exact frame count. Seeks resume a few packets ahead of the target so the
/// codec state is rebuilt, then decode forward and discard frames up to it.
pub struct PacketDecoder {
    path: PathBuf,
    codec: CodecKind,
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
    track_id: u32,
    info: StreamInfo,
    index: SeekIndex,
    /// Decoded frames not yet handed out
    carry: PcmBlock,
    finished: bool,
    conceal: bool,
    /// Trim encoder delay and padding from packets
    gapless: bool,
    /// Packets decoded and discarded ahead of a seek target
    preroll: usize,
}

/// A freshly probed reader positioned at the start of the stream
struct OpenedStream {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: u16,
    /// Whether the container states the encoder delay and padding
    exact_trim: bool,
}

impl PacketDecoder {
    /// Open a compressed file whose first audio track uses one of `accepted`.
    ///
    /// `preroll` is the number of packets a seek decodes ahead of the target
    /// before output is exact.
    pub fn open(
        path: &Path,
        codec: CodecKind,
        accepted: &[CodecType],
        preroll: usize,
        config: &EngineConfig,
    ) -> AudioResult<Self> {
        let mut gapless = true;
        let mut stream = open_stream(path, codec, accepted, gapless)?;
        if !stream.exact_trim {
            // Without a delay tag the trimmed length would be an estimate
            debug!("{} {:?} has no encoder delay tag, keeping whole packets", codec, path);
            gapless = false;
            stream = open_stream(path, codec, accepted, gapless)?;
        }

        let index = scan_packets(path, codec, accepted, gapless, stream.track_id)?;
        if index.is_empty() {
            return Err(AudioError::MalformedContainer(format!(
                "{codec} stream holds no audio packets"
            )));
        }

        let info = StreamInfo::new(
            codec,
            stream.sample_rate,
            stream.channels,
            BitDepth::F32,
            index.total_frames(),
        )?;

        debug!(
            "{} {:?}: {} Hz, {} channels, {} packets, {} frames",
            codec,
            path,
            info.sample_rate,
            info.channels,
            index.len(),
            info.total_frames
        );

        Ok(PacketDecoder {
            path: path.to_path_buf(),
            codec,
            reader: stream.reader,
            decoder: stream.decoder,
            track_id: stream.track_id,
            carry: PcmBlock::empty(info.native_depth, info.channels),
            info,
            index,
            finished: false,
            conceal: config.conceal_corrupt_packets,
            gapless,
            preroll,
        })
    }

    /// Packet index built at open
    pub fn index(&self) -> &SeekIndex {
        &self.index
    }

    /// Get the next decoded packet with its starting timestamp.
    ///
    /// Packets ending at or before `discard_before` are only decoded to prime
    /// the codec, so a decode fault in one of them is replaced with silence.
    fn next_block(&mut self, discard_before: u64) -> AudioResult<Option<(u64, PcmBlock)>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    self.finished = true;
                    return Ok(None);
                }
                Err(SymphoniaError::ResetRequired) => {
                    // A chained stream follows; only the first one is exposed
                    self.finished = true;
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            };

            // Only process packets from our audio track
            if packet.track_id() != self.track_id {
                continue;
            }

            let priming = packet.ts() + packet.dur() <= discard_before;

            let block = match self.decoder.decode(&packet) {
                Ok(decoded) => interleave(&decoded)?,
                Err(SymphoniaError::DecodeError(e)) if self.conceal || priming => {
                    warn!(
                        "{} packet at {} is corrupt ({}), substituting {} frames of silence",
                        self.codec,
                        packet.ts(),
                        e,
                        packet.dur()
                    );
                    let frames = usize::try_from(packet.dur()).unwrap_or(0);
                    PcmBlock::silence(self.info.native_depth, self.info.channels, frames)?
                }
                Err(e) => return Err(e.into()),
            };

            if block.is_empty() {
                continue;
            }

            trace!("decoded {} frames at ts {}", block.frames(), packet.ts());
            return Ok(Some((packet.ts(), block)));
        }
    }

    /// Reopen the file so decoding restarts from the first packet
    fn rewind(&mut self) -> AudioResult<()> {
        let accepted = [self.decoder.codec_params().codec];
        let stream = open_stream(&self.path, self.codec, &accepted, self.gapless)?;
        self.reader = stream.reader;
        self.decoder = stream.decoder;
        self.track_id = stream.track_id;
        self.finished = false;
        Ok(())
    }

    /// Decode forward until the carry starts exactly at `target_ts`.
    ///
    /// Returns `false` if the first decoded packet already lies past the
    /// target, meaning the reader was positioned too late.
    fn discard_until(&mut self, target_ts: u64) -> AudioResult<bool> {
        let mut first = true;

        while let Some((ts, mut block)) = self.next_block(target_ts)? {
            if first && ts > target_ts {
                return Ok(false);
            }
            first = false;

            let end = ts + block.frames() as u64;
            if end <= target_ts {
                continue;
            }

            block.skip_frames(usize::try_from(target_ts.saturating_sub(ts)).unwrap_or(0));
            self.carry = block;
            return Ok(true);
        }

        Ok(true)
    }
}

impl super::Decoder for PacketDecoder {
    fn info(&self) -> &StreamInfo {
        &self.info
    }

    fn decode_next(&mut self, max_frames: usize) -> AudioResult<PcmBlock> {
        if self.carry.is_empty() {
            match self.next_block(0)? {
                Some((_, block)) => self.carry = block,
                None => return Ok(PcmBlock::empty(self.info.native_depth, self.info.channels)),
            }
        }

        Ok(self.carry.take_frames(max_frames))
    }

    fn seek_to_frame(&mut self, frame: u64) -> AudioResult<()> {
        self.carry = PcmBlock::empty(self.info.native_depth, self.info.channels);

        if frame >= self.info.total_frames {
            self.finished = true;
            return Ok(());
        }

        let first_ts = self.index.first_frame();
        let target_ts = first_ts + frame;

        let resume_ts = match self.index.seek_point(target_ts, self.preroll) {
            Some((pos, entry)) if pos > 0 => entry.ts,
            _ => {
                // Within the preroll of the first packet
                self.rewind()?;
                self.discard_until(target_ts)?;
                return Ok(());
            }
        };
        self.finished = false;

        let seeked = self.reader.seek(
            SeekMode::Accurate,
            SeekTo::TimeStamp {
                ts: resume_ts,
                track_id: self.track_id,
            },
        );

        let landed = match seeked {
            Ok(seeked_to) => {
                debug!(
                    "{} seek to frame {}: resume at ts {}, reader at {}",
                    self.codec, frame, resume_ts, seeked_to.actual_ts
                );
                self.decoder.reset();
                self.discard_until(target_ts)?
            }
            Err(e) => {
                warn!("{} seek failed ({}), decoding from the start", self.codec, e);
                false
            }
        };

        if !landed {
            self.rewind()?;
            self.discard_until(target_ts)?;
        }

        Ok(())
    }
}

fn open_stream(
    path: &Path,
    codec: CodecKind,
    accepted: &[CodecType],
    gapless: bool,
) -> AudioResult<OpenedStream> {
    // Open the file
    let file = Box::new(File::open(path).map_err(|source| AudioError::CannotOpenFile {
        path: path.to_path_buf(),
        source,
    })?);

    // Create media source stream
    let mss = MediaSourceStream::new(file, Default::default());

    let mut hint = Hint::new();
    hint.with_extension(codec.extension());

    let format_opts = FormatOptions {
        enable_gapless: gapless,
        ..Default::default()
    };

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &MetadataOptions::default())
        .map_err(|e| match e {
            SymphoniaError::IoError(e) if e.kind() != std::io::ErrorKind::UnexpectedEof => {
                AudioError::Io(e)
            }
            e => AudioError::MalformedContainer(format!("not a readable {codec} stream: {e}")),
        })?;

    let reader = probed.format;

    // Find the first audio track
    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::MalformedContainer("No audio track found".to_string()))?;

    if !accepted.contains(&track.codec_params.codec) {
        let name = symphonia::default::get_codecs()
            .get_codec(track.codec_params.codec)
            .map_or("unknown", |d| d.short_name);
        return Err(AudioError::UnsupportedFormat(format!(
            "{name} stream where {codec} was expected"
        )));
    }

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AudioError::MalformedContainer("Unknown sample rate".to_string()))?;

    let channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .ok_or_else(|| AudioError::MalformedContainer("Unknown channel count".to_string()))?;
    let channels = u16::try_from(channels)
        .map_err(|_| AudioError::UnsupportedFormat(format!("{channels} channels")))?;

    // MPEG streams only state their delay in a LAME tag; otherwise the
    // demuxer would trim to a length estimated from the bitrate
    let exact_trim = match codec {
        CodecKind::Mp3 => track.codec_params.delay.is_some(),
        _ => true,
    };

    let track_id = track.id;

    let decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())?;

    Ok(OpenedStream {
        reader,
        decoder,
        track_id,
        sample_rate,
        channels,
        exact_trim,
    })
}

/// Demux every packet of `track_id` without decoding, recording timestamps
fn scan_packets(
    path: &Path,
    codec: CodecKind,
    accepted: &[CodecType],
    gapless: bool,
    track_id: u32,
) -> AudioResult<SeekIndex> {
    let mut stream = open_stream(path, codec, accepted, gapless)?;
    let mut index = SeekIndex::new();

    loop {
        match stream.reader.next_packet() {
            Ok(packet) if packet.track_id() == track_id => index.push(packet.ts(), packet.dur())?,
            Ok(_) => {}
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(index)
}

/// Convert a decoded buffer into an interleaved native block
fn interleave(buffer: &AudioBufferRef<'_>) -> AudioResult<PcmBlock> {
    let channels = buffer.spec().channels.count() as u16;

    let block = match buffer {
        AudioBufferRef::F32(buf) => PcmBlock::from_float(channels, interleave_with(buf, |s| s)?),
        AudioBufferRef::F64(buf) => {
            PcmBlock::from_float(channels, interleave_with(buf, |s: f64| s as f32)?)
        }
        AudioBufferRef::S8(buf) => {
            PcmBlock::from_int(BitDepth::I8, channels, interleave_with(buf, i32::from)?)
        }
        AudioBufferRef::U8(buf) => PcmBlock::from_int(
            BitDepth::I8,
            channels,
            interleave_with(buf, |s: u8| i32::from(s) - 0x80)?,
        ),
        AudioBufferRef::S16(buf) => {
            PcmBlock::from_int(BitDepth::I16, channels, interleave_with(buf, i32::from)?)
        }
        AudioBufferRef::U16(buf) => PcmBlock::from_int(
            BitDepth::I16,
            channels,
            interleave_with(buf, |s: u16| i32::from(s) - 0x8000)?,
        ),
        AudioBufferRef::S24(buf) => PcmBlock::from_int(
            BitDepth::I24,
            channels,
            interleave_with(buf, |s: i24| s.inner())?,
        ),
        AudioBufferRef::U24(buf) => PcmBlock::from_int(
            BitDepth::I24,
            channels,
            interleave_with(buf, |s: u24| s.inner() as i32 - 0x80_0000)?,
        ),
        AudioBufferRef::S32(buf) => {
            PcmBlock::from_int(BitDepth::I32, channels, interleave_with(buf, |s| s)?)
        }
        AudioBufferRef::U32(buf) => PcmBlock::from_int(
            BitDepth::I32,
            channels,
            interleave_with(buf, |s: u32| (s ^ 0x8000_0000) as i32)?,
        ),
    };

    Ok(block)
}

fn interleave_with<T, U, F>(buf: &AudioBuffer<T>, convert: F) -> AudioResult<Vec<U>>
where
    T: Sample,
    F: Fn(T) -> U,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    let mut output = alloc_samples(frames * channels)?;

    for frame in 0..frames {
        for ch in 0..channels {
            output.push(convert(buf.chan(ch)[frame]));
        }
    }

    Ok(output)
}
