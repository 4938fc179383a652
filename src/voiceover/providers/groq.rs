//! Groq hosted speech synthesis (`/openai/v1/audio/speech`).

use async_trait::async_trait;
use tracing::debug;

use super::{audio_response, http_client};
use crate::config::GroqConfig;
use crate::voiceover::provider::{AudioFormat, ProviderKind, SpeechProvider, SynthesisOutcome};

pub struct GroqProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    voice: String,
    url: String,
}

impl GroqProvider {
    /// Returns `None` when no API key is configured.
    pub fn from_config(
        config: &GroqConfig,
        timeout: Option<std::time::Duration>,
    ) -> reqwest::Result<Option<Self>> {
        let Some(api_key) = config.credential() else {
            return Ok(None);
        };

        Ok(Some(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            voice: config.voice.clone(),
            url: config.base_url.clone(),
        }))
    }

    fn request_body(&self, script: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "voice": self.voice,
            "input": script,
            "response_format": AudioFormat::Wav.extension(),
        })
    }
}

#[async_trait]
impl SpeechProvider for GroqProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Groq
    }

    async fn synthesize(&self, script: &str) -> SynthesisOutcome {
        debug!(
            "Groq TTS request: model={} voice={} chars={}",
            self.model,
            self.voice,
            script.chars().count()
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(script))
            .send()
            .await;

        audio_response("groq", response, AudioFormat::Wav).await
    }
}
