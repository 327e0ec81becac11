use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full audio-to-subtitle pipeline on a video file
    Process {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Target language for the subtitles
        #[arg(short, long, default_value = "he")]
        target_lang: String,

        /// Source language hint; detected from the audio when omitted
        #[arg(short, long)]
        source_lang: Option<String>,

        /// Output SRT path; defaults to <input stem>_<target>.srt
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the transcription result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Extract mono 16 kHz WAV audio from a video file
    Extract {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Transcribe an audio file to subtitles
    Transcribe {
        /// Input audio file (mono 16 kHz WAV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output SRT file
        #[arg(short, long)]
        output: PathBuf,

        /// Target language for the subtitles
        #[arg(short, long, default_value = "he")]
        target_lang: String,

        /// Source language hint; detected from the audio when omitted
        #[arg(short, long)]
        source_lang: Option<String>,
    },

    /// Encode a saved transcription result (JSON) as an SRT file
    Srt {
        /// Input transcription JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output SRT file
        #[arg(short, long)]
        output: PathBuf,
    },
}
