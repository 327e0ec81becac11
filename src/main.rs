//! Capgen - Audio-to-Subtitle Pipeline
//!
//! Command-line entry point: extracts audio from video with ffmpeg,
//! transcribes or translates it through an OpenAI-compatible speech API,
//! and writes SRT subtitles.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use capgen::cli::{Args, Commands};
use capgen::config::Config;
use capgen::media::AudioExtractorFactory;
use capgen::pipeline::Pipeline;
use capgen::subtitle;
use capgen::transcribe::TranscriptionResult;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Process {
            input,
            target_lang,
            source_lang,
            output,
            json,
        } => {
            info!("Processing video file: {}", input.display());

            let pipeline = Pipeline::new(config);
            pipeline.check_availability().await?;

            let video = tokio::fs::File::open(&input).await?;
            let name_hint = input
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_else(|| "video".to_string());

            let result = pipeline
                .run(
                    Box::new(video),
                    &name_hint,
                    source_lang.as_deref(),
                    &target_lang,
                )
                .await?;

            let output_path = output.unwrap_or_else(|| {
                input.with_file_name(format!("{}_{}.srt", name_hint, target_lang))
            });
            tokio::fs::write(&output_path, &result.srt).await?;
            info!("Subtitles written to {}", output_path.display());

            if let Some(json_path) = json {
                let content = serde_json::to_string_pretty(&result.result)?;
                tokio::fs::write(&json_path, content).await?;
                info!("Transcription JSON written to {}", json_path.display());
            }

            if result.result.segments.is_empty() {
                info!("Run completed without captions (transcription degraded)");
            }
        }
        Commands::Extract { input, output } => {
            info!("Extracting audio from: {}", input.display());

            let extractor = AudioExtractorFactory::create_extractor(config.media);
            extractor.check_availability().await?;
            extractor.extract_file(&input, &output).await?;
        }
        Commands::Transcribe {
            input,
            output,
            target_lang,
            source_lang,
        } => {
            info!("Transcribing audio: {}", input.display());

            let pipeline = Pipeline::new(config);

            let wav = tokio::fs::read(&input).await?;
            let name_hint = input
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_else(|| "audio".to_string());

            let result = pipeline
                .run_audio(&wav, &name_hint, source_lang.as_deref(), &target_lang)
                .await?;

            tokio::fs::write(&output, &result.srt).await?;
            info!("Subtitles written to {}", output.display());
        }
        Commands::Srt { input, output } => {
            info!("Encoding transcription JSON to SRT: {}", input.display());

            let content = tokio::fs::read_to_string(&input).await?;
            let result: TranscriptionResult = serde_json::from_str(&content)?;

            subtitle::write_srt(&result.segments, &output).await?;
        }
    }

    info!("Capgen run completed");
    Ok(())
}

/// Setup logging to both console and a daily-rolling file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".capgen").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "capgen.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer().with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
