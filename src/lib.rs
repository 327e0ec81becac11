//! Capgen - Audio-to-Subtitle Pipeline
//!
//! A pipeline that extracts audio from video using ffmpeg, transcribes or
//! translates the speech through an OpenAI-compatible speech API, applies a
//! per-segment translation pass, and serializes the result as SRT.

pub mod cli;
pub mod config;
pub mod error;
pub mod lang;
pub mod media;
pub mod pipeline;
pub mod speech;
pub mod storage;
pub mod subtitle;
pub mod transcribe;
pub mod translate;
