//! audio-cursor command line interface
//!
//! Thin demo over the library: print stream metadata and dump decoded samples.

use audio_cursor::{Instance, OutputSample, SampleFormat};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "audio-cursor")]
#[command(about = "Decode WAV, MP3 and Ogg/Vorbis files to raw samples", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    S16,
    S32,
    F32,
}

impl From<Format> for SampleFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::S16 => SampleFormat::S16,
            Format::S32 => SampleFormat::S32,
            Format::F32 => SampleFormat::F32,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print sample rate, channels, byte count and format
    Probe {
        /// Input audio file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output sample format
        #[arg(short, long, value_enum, default_value = "s16")]
        format: Format,
    },

    /// Print blocks of samples from the start, then after a seek
    Dump {
        /// Input audio file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output sample format
        #[arg(short, long, value_enum, default_value = "s16")]
        format: Format,

        /// Number of reads before and after the seek
        #[arg(short, long, default_value = "16")]
        blocks: usize,

        /// Samples per read
        #[arg(short = 'l', long, default_value = "16")]
        block_len: usize,

        /// Byte position to seek to
        #[arg(short, long)]
        seek: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    info!("audio-cursor {}", audio_cursor::VERSION);

    match cli.command {
        Commands::Probe { input, format } => {
            let mut instance = Instance::open(&input, format.into())?;
            println!(
                "{} {} {} {}",
                instance.sample_rate()?,
                instance.channels()?,
                instance.byte_count()?,
                instance.sample_format()?
            );
        }
        Commands::Dump {
            input,
            format,
            blocks,
            block_len,
            seek,
        } => {
            let mut instance = Instance::open(&input, format.into())?;
            match format {
                Format::S16 => dump::<i16>(&mut instance, blocks, block_len, seek)?,
                Format::S32 => dump::<i32>(&mut instance, blocks, block_len, seek)?,
                Format::F32 => dump::<f32>(&mut instance, blocks, block_len, seek)?,
            }
            instance.release();
        }
    }

    Ok(())
}

fn dump<S: OutputSample + Display>(
    instance: &mut Instance,
    blocks: usize,
    block_len: usize,
    seek: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut buf = vec![S::default(); block_len];

    print_blocks(instance, &mut buf, blocks)?;

    if let Some(position) = seek {
        println!("Seeking...");
        instance.set_position(position)?;
        print_blocks(instance, &mut buf, blocks)?;
    }

    Ok(())
}

fn print_blocks<S: OutputSample + Display>(
    instance: &mut Instance,
    buf: &mut [S],
    blocks: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    for _ in 0..blocks {
        let read_bytes = instance.read(buf)?;
        let samples: Vec<String> = buf.iter().map(ToString::to_string).collect();
        println!("Read {} bytes: {}", read_bytes, samples.join(" "));
    }
    Ok(())
}
