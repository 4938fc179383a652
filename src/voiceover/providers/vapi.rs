//! Vapi-compatible TTS endpoint.
//!
//! `POST <url>` with `{"text": ...}`; the response body is WAV audio.

use async_trait::async_trait;
use tracing::debug;

use super::{audio_response, http_client};
use crate::config::VapiConfig;
use crate::voiceover::provider::{AudioFormat, ProviderKind, SpeechProvider, SynthesisOutcome};

pub struct VapiProvider {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl VapiProvider {
    /// Returns `None` when no endpoint URL is configured.
    pub fn from_config(
        config: &VapiConfig,
        timeout: Option<std::time::Duration>,
    ) -> reqwest::Result<Option<Self>> {
        let Some(url) = config.endpoint() else {
            return Ok(None);
        };

        Ok(Some(Self {
            client: http_client(timeout)?,
            url: url.to_string(),
            api_key: config.bearer().map(str::to_string),
        }))
    }
}

#[async_trait]
impl SpeechProvider for VapiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Vapi
    }

    async fn synthesize(&self, script: &str) -> SynthesisOutcome {
        debug!("Vapi TTS request to {} ({} chars)", self.url, script.chars().count());

        let mut request = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": script }));
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        audio_response("vapi", request.send().await, AudioFormat::Wav).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_url_means_no_provider() {
        assert!(VapiProvider::from_config(&VapiConfig::default(), None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn blank_url_means_no_provider() {
        let config = VapiConfig {
            url: Some(" ".to_string()),
            api_key: Some("key".to_string()),
        };
        assert!(VapiProvider::from_config(&config, None).unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_url_is_failure() {
        let config = VapiConfig {
            url: Some("not a url".to_string()),
            api_key: None,
        };
        let provider = VapiProvider::from_config(&config, None).unwrap().unwrap();

        assert!(matches!(
            provider.synthesize("Hello").await,
            SynthesisOutcome::Failed { .. }
        ));
    }
}
