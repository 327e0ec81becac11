use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::{CapgenError, Result};
use crate::transcribe::Segment;

/// Encode an ordered segment sequence as SRT text.
///
/// Pure function of its input: the same segments always yield identical
/// output. The byte and file views below both delegate here so the two can
/// never diverge.
pub fn encode(segments: &[Segment]) -> String {
    let mut srt_content = String::new();

    for (index, segment) in segments.iter().enumerate() {
        let start_time = format_srt_time(segment.start);
        let end_time = format_srt_time(segment.end);

        srt_content.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            start_time,
            end_time,
            segment.text
        ));
    }

    srt_content
}

/// Encode segments as SRT bytes
pub fn encode_bytes(segments: &[Segment]) -> Vec<u8> {
    encode(segments).into_bytes()
}

/// Write segments as an SRT file
pub async fn write_srt<P: AsRef<Path>>(segments: &[Segment], output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("Generating SRT file: {}", output_path.display());

    fs::write(output_path, encode(segments))
        .await
        .map_err(CapgenError::Io)?;

    info!("SRT file generated successfully");
    Ok(())
}

/// Format time in seconds to SRT time format (HH:MM:SS,mmm).
///
/// Each component is floor-truncated; no rounding carry is applied, so
/// 3.9995 renders as 00:00:03,999 rather than carrying into the seconds.
fn format_srt_time(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let millis = ((seconds % 1.0) * 1000.0).floor() as u64;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}
