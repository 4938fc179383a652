//! `onetake` - storyboard voiceover synthesis
//!
//! # Features
//!
//! - **Provider fallback**: Groq, Vapi, then a bundled placeholder asset
//! - **Captions**: one fixed-length SubRip cue per storyboard scene
//! - **Explicit configuration**: defaults, TOML file and environment layered
//!   into one [`VoiceoverConfig`]
//!
//! # Example
//!
//! ```rust,no_run
//! use onetake::{synthesize_voiceover, Storyboard, SynthesisOptions, VoiceoverConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storyboard = Storyboard::load("amazon.demo.json").await?;
//!     let config = VoiceoverConfig::load()?;
//!     let result =
//!         synthesize_voiceover("voice-output", &storyboard, &config, SynthesisOptions::default())
//!             .await?;
//!     println!("{} via {}", result.audio_path.display(), result.provider);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod storyboard;
pub mod voiceover;

pub use config::VoiceoverConfig;
pub use storyboard::{Scene, Storyboard, StoryboardError};
pub use voiceover::{
    synthesize_voiceover, ProviderKind, SynthesisOptions, SynthesisResult, VoiceoverError,
    VoiceoverPipeline,
};
