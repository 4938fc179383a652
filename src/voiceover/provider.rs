//! Speech provider trait and provider selection.
//!
//! A [`SpeechProvider`] turns a full narration script into raw audio bytes.
//! Providers never return `Err`: every failure is reported as
//! [`SynthesisOutcome::Failed`] so the pipeline can branch on it directly.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Closed set of voiceover providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq hosted speech API
    Groq,
    /// Vapi-compatible TTS endpoint
    Vapi,
    /// Bundled placeholder asset, no network
    Placeholder,
}

impl ProviderKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Vapi => "vapi",
            Self::Placeholder => "placeholder",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "vapi" => Ok(Self::Vapi),
            "placeholder" => Ok(Self::Placeholder),
            other => Err(format!(
                "unknown provider '{other}' (expected groq, vapi or placeholder)"
            )),
        }
    }
}

/// Audio container emitted by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Wav,
    Mp3,
}

impl AudioFormat {
    /// File extension for this format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }
}

/// Result of one synthesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    /// Raw audio in the given container
    Audio { bytes: Bytes, format: AudioFormat },
    /// Any failure: transport, auth, status, empty body
    Failed { reason: String },
}

impl SynthesisOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// Network speech backend.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Which provider this is
    fn kind(&self) -> ProviderKind;

    /// Synthesize the whole script in a single request.
    async fn synthesize(&self, script: &str) -> SynthesisOutcome;
}

/// Which provider signals are configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderSignals {
    /// A Groq credential is present
    pub groq_credential: bool,
    /// A Vapi endpoint URL is present
    pub vapi_endpoint: bool,
}

/// Pick the provider to attempt first.
///
/// An explicit request always wins. Otherwise Groq is preferred when its
/// credential is present, then Vapi when its endpoint is, then the placeholder.
#[must_use]
pub fn resolve_provider(requested: Option<ProviderKind>, signals: ProviderSignals) -> ProviderKind {
    if let Some(kind) = requested {
        return kind;
    }
    if signals.groq_credential {
        ProviderKind::Groq
    } else if signals.vapi_endpoint {
        ProviderKind::Vapi
    } else {
        ProviderKind::Placeholder
    }
}
