//! Storyboard voiceover synthesis
//!
//! Turns a storyboard into `voiceover.wav` plus `captions.srt`:
//! - Provider resolution (Groq, Vapi, placeholder)
//! - One synthesis request for the whole script
//! - Unconditional fallback to a bundled placeholder asset
//! - Fixed-slot SubRip captions, one cue per scene
//!
//! # Example
//!
//! ```rust,no_run
//! use onetake::config::VoiceoverConfig;
//! use onetake::voiceover::{SynthesisOptions, VoiceoverPipeline};
//! use onetake::Storyboard;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storyboard = Storyboard::load("demo.storyboard.json").await?;
//!     let pipeline = VoiceoverPipeline::new(&VoiceoverConfig::load()?)?;
//!     let result = pipeline
//!         .synthesize_voiceover("voice-output", &storyboard, SynthesisOptions::default())
//!         .await?;
//!     println!("{}", result.audio_path.display());
//!     Ok(())
//! }
//! ```

pub mod pipeline;
pub mod provider;
pub mod providers;
pub mod subtitle;

use std::path::PathBuf;

use thiserror::Error;

use crate::storyboard::StoryboardError;

pub use pipeline::{
    synthesize_voiceover, SynthesisOptions, SynthesisResult, VoiceoverPipeline, AUDIO_STEM,
    CAPTIONS_FILE,
};
pub use provider::{
    resolve_provider, AudioFormat, ProviderKind, ProviderSignals, SpeechProvider,
    SynthesisOutcome,
};
pub use providers::{GroqProvider, VapiProvider};
pub use subtitle::{
    format_srt_time, make_naive_srt, naive_cues, parse_srt, render_srt, CaptionCue,
    SCENE_DURATION_MS,
};

/// Fatal voiceover errors. Provider failures are never reported here.
#[derive(Error, Debug)]
pub enum VoiceoverError {
    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("placeholder audio {} could not be copied: {source}", .path.display())]
    Placeholder {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Storyboard(#[from] StoryboardError),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, VoiceoverError>;
