//! Network speech backends.

pub mod groq;
pub mod vapi;

pub use groq::GroqProvider;
pub use vapi::VapiProvider;

use std::time::Duration;

use super::provider::{AudioFormat, SynthesisOutcome};

/// Shared HTTP client; no timeout unless configured.
pub(crate) fn http_client(timeout: Option<Duration>) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Turn a completed request into an outcome.
///
/// Non-2xx statuses and empty bodies are failures.
pub(crate) async fn audio_response(
    provider: &str,
    response: reqwest::Result<reqwest::Response>,
    format: AudioFormat,
) -> SynthesisOutcome {
    let response = match response {
        Ok(r) => r,
        Err(e) => return SynthesisOutcome::failed(format!("{provider} request failed: {e}")),
    };

    let status = response.status();
    if !status.is_success() {
        let error = response.text().await.unwrap_or_default();
        return SynthesisOutcome::failed(format!("{provider} API error ({status}): {error}"));
    }

    match response.bytes().await {
        Ok(bytes) if bytes.is_empty() => {
            SynthesisOutcome::failed(format!("{provider} returned an empty audio body"))
        }
        Ok(bytes) => SynthesisOutcome::Audio { bytes, format },
        Err(e) => SynthesisOutcome::failed(format!("{provider} response read failed: {e}")),
    }
}
