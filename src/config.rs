//! Voiceover configuration.
//!
//! Layers, lowest precedence first: built-in defaults, the optional
//! `~/.config/onetake/config.toml`, then environment variables. The CLI
//! applies its flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::voiceover::ProviderSignals;

/// Groq speech API endpoint
pub const GROQ_SPEECH_URL: &str = "https://api.groq.com/openai/v1/audio/speech";

/// Groq speech settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GroqConfig {
    /// API key (`GROQ_API_KEY`)
    pub api_key: Option<String>,
    pub model: String,
    pub voice: String,
    pub base_url: String,
}

impl GroqConfig {
    /// The API key, unless unset or blank
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "playai-tts".to_string(),
            voice: "Chip-PlayAI".to_string(),
            base_url: GROQ_SPEECH_URL.to_string(),
        }
    }
}

/// Vapi-compatible TTS endpoint settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VapiConfig {
    /// Endpoint URL (`VAPI_TTS_URL`)
    pub url: Option<String>,
    /// Optional bearer token (`VAPI_API_KEY`)
    pub api_key: Option<String>,
}

impl VapiConfig {
    /// The endpoint URL, unless unset or blank
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

/// Everything the voiceover pipeline needs to pick and run a provider.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VoiceoverConfig {
    pub groq: GroqConfig,
    pub vapi: VapiConfig,
    /// Bundled audio copied when no network provider succeeds
    pub placeholder_asset: PathBuf,
    /// Per-request timeout for network providers; none by default
    pub request_timeout_secs: Option<u64>,
}

impl Default for VoiceoverConfig {
    fn default() -> Self {
        Self {
            groq: GroqConfig::default(),
            vapi: VapiConfig::default(),
            placeholder_asset: PathBuf::from("assets").join("beep.wav"),
            request_timeout_secs: None,
        }
    }
}

impl VoiceoverConfig {
    /// Defaults, then the user config file, then the process environment.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a TOML config file. A missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        Self::from_toml(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay environment-style values. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| non_blank(Some(v.as_str())).is_some());

        if let Some(key) = get("GROQ_API_KEY") {
            self.groq.api_key = Some(key);
        }
        if let Some(url) = get("VAPI_TTS_URL") {
            self.vapi.url = Some(url);
        }
        if let Some(key) = get("VAPI_API_KEY") {
            self.vapi.api_key = Some(key);
        }
        if let Some(path) = get("ONETAKE_PLACEHOLDER") {
            self.placeholder_asset = PathBuf::from(path);
        }
    }

    /// Provider signals used for automatic selection
    #[must_use]
    pub fn signals(&self) -> ProviderSignals {
        ProviderSignals {
            groq_credential: self.groq.credential().is_some(),
            vapi_endpoint: self.vapi.endpoint().is_some(),
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `~/.config/onetake/config.toml`, if a config directory exists
fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("onetake").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_select_placeholder() {
        let config = VoiceoverConfig::default();
        assert_eq!(config.signals(), ProviderSignals::default());
        assert_eq!(config.placeholder_asset, PathBuf::from("assets/beep.wav"));
        assert_eq!(config.groq.model, "playai-tts");
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn env_sets_signals() {
        let mut config = VoiceoverConfig::default();
        config.apply_env(env(&[("GROQ_API_KEY", "gsk_test"), ("VAPI_TTS_URL", "http://tts")]));

        assert_eq!(config.groq.api_key.as_deref(), Some("gsk_test"));
        assert!(config.signals().groq_credential);
        assert!(config.signals().vapi_endpoint);
    }

    #[test]
    fn empty_env_value_is_unset() {
        let mut config = VoiceoverConfig::default();
        config.apply_env(env(&[("GROQ_API_KEY", "  ")]));
        assert!(!config.signals().groq_credential);
    }

    #[test]
    fn blank_file_values_are_unset() {
        let config = VoiceoverConfig::from_toml(
            "[groq]\napi_key = \"\"\n\n[vapi]\nurl = \"  \"\napi_key = \"\"\n",
        )
        .unwrap();

        assert_eq!(config.signals(), ProviderSignals::default());
        assert_eq!(config.groq.credential(), None);
        assert_eq!(config.vapi.bearer(), None);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
placeholder_asset = "/opt/onetake/silence.wav"
request_timeout_secs = 30

[groq]
voice = "Fritz-PlayAI"
"#;
        let config = VoiceoverConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.groq.voice, "Fritz-PlayAI");
        assert_eq!(config.groq.model, "playai-tts");
        assert_eq!(config.placeholder_asset, PathBuf::from("/opt/onetake/silence.wav"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn env_overrides_file() {
        let mut config = VoiceoverConfig::from_toml("[vapi]\nurl = \"http://file\"\n").unwrap();
        config.apply_env(env(&[("VAPI_TTS_URL", "http://env")]));
        assert_eq!(config.vapi.url.as_deref(), Some("http://env"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = VoiceoverConfig::from_file(Path::new("/no/such/config.toml")).unwrap();
        assert_eq!(config, VoiceoverConfig::default());
    }

    #[test]
    fn invalid_toml_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "groq = 5").unwrap();

        let err = VoiceoverConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
