//! Storyboard input model
//!
//! Storyboards are produced upstream by the scan/storyboard generator and
//! arrive as JSON. Only `scenes[].narration` and `scenes[].voiceover` are
//! consumed here; the remaining generator fields are tolerated.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Storyboard loading errors
#[derive(Error, Debug)]
pub enum StoryboardError {
    #[error("failed to read storyboard {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed storyboard: {0}")]
    Json(#[from] serde_json::Error),
}

/// One narrative unit of a storyboard.
///
/// Generator metadata (`id`, `title`, `duration_seconds`) is kept as raw JSON
/// so that any value the generator emits is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene identifier assigned by the generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Human-readable scene title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    /// Generator's duration hint; not used for caption timing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<Value>,
    /// Narration text
    pub narration: String,
    /// Spoken override for `narration`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voiceover: Option<String>,
}

impl Scene {
    /// Create a scene with narration only
    #[must_use]
    pub fn new(narration: impl Into<String>) -> Self {
        Self {
            narration: narration.into(),
            ..Default::default()
        }
    }

    /// Set the voiceover override
    #[must_use]
    pub fn with_voiceover(mut self, voiceover: impl Into<String>) -> Self {
        self.voiceover = Some(voiceover.into());
        self
    }

    /// Text that should be spoken for this scene.
    ///
    /// `voiceover` wins when present and non-empty, otherwise `narration`.
    /// Returned verbatim; callers decide on normalization.
    #[must_use]
    pub fn spoken_text(&self) -> &str {
        match self.voiceover.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => &self.narration,
        }
    }
}

/// Ordered collection of scenes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storyboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub scenes: Vec<Scene>,
}

impl Storyboard {
    #[must_use]
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self {
            product_name: None,
            scenes,
        }
    }

    /// Parse a storyboard from JSON text.
    ///
    /// A missing or non-array `scenes` field is rejected.
    pub fn from_json(json: &str) -> Result<Self, StoryboardError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a storyboard JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoryboardError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoryboardError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json(&json)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Full narration script sent to speech backends.
    ///
    /// Scene texts are joined by a blank line and are not whitespace-normalized.
    #[must_use]
    pub fn script(&self) -> String {
        self.scenes
            .iter()
            .map(Scene::spoken_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
