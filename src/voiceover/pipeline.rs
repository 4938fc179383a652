//! Voiceover pipeline: resolve provider -> synthesize -> fall back -> write
//!
//! Both output files are staged next to their final name and renamed into
//! place, so a failed call never leaves a half-written file behind.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tracing::{debug, info, warn};

use super::provider::{
    resolve_provider, AudioFormat, ProviderKind, ProviderSignals, SpeechProvider,
    SynthesisOutcome,
};
use super::providers::{GroqProvider, VapiProvider};
use super::subtitle::make_naive_srt;
use super::{Result, VoiceoverError};
use crate::config::VoiceoverConfig;
use crate::storyboard::Storyboard;

/// Audio file name without extension
pub const AUDIO_STEM: &str = "voiceover";
/// Caption file name
pub const CAPTIONS_FILE: &str = "captions.srt";

/// Per-call options
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthesisOptions {
    /// Provider to attempt first; resolved from configuration when unset
    pub provider: Option<ProviderKind>,
}

impl SynthesisOptions {
    #[must_use]
    pub fn with_provider(provider: ProviderKind) -> Self {
        Self {
            provider: Some(provider),
        }
    }
}

/// Files produced by one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisResult {
    pub audio_path: PathBuf,
    pub captions_path: PathBuf,
    /// Provider that actually produced the audio
    pub provider: ProviderKind,
}

/// Voiceover pipeline
pub struct VoiceoverPipeline {
    providers: Vec<Box<dyn SpeechProvider>>,
    signals: ProviderSignals,
    placeholder_asset: PathBuf,
}

impl VoiceoverPipeline {
    /// Build network providers for every backend the config enables.
    pub fn new(config: &VoiceoverConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        let mut providers: Vec<Box<dyn SpeechProvider>> = Vec::new();

        if let Some(groq) = GroqProvider::from_config(&config.groq, timeout)? {
            providers.push(Box::new(groq));
        }
        if let Some(vapi) = VapiProvider::from_config(&config.vapi, timeout)? {
            providers.push(Box::new(vapi));
        }

        Ok(Self {
            providers,
            signals: config.signals(),
            placeholder_asset: config.placeholder_asset.clone(),
        })
    }

    /// Pipeline with no network providers
    #[must_use]
    pub fn placeholder_only(placeholder_asset: impl Into<PathBuf>) -> Self {
        Self {
            providers: Vec::new(),
            signals: ProviderSignals::default(),
            placeholder_asset: placeholder_asset.into(),
        }
    }

    /// Register a provider, replacing any provider of the same kind.
    ///
    /// A registered provider counts as configured for automatic selection.
    #[must_use]
    pub fn with_provider(mut self, provider: Box<dyn SpeechProvider>) -> Self {
        let kind = provider.kind();
        self.providers.retain(|p| p.kind() != kind);
        match kind {
            ProviderKind::Groq => self.signals.groq_credential = true,
            ProviderKind::Vapi => self.signals.vapi_endpoint = true,
            ProviderKind::Placeholder => {}
        }
        self.providers.push(provider);
        self
    }

    #[must_use]
    pub fn signals(&self) -> ProviderSignals {
        self.signals
    }

    #[must_use]
    pub fn placeholder_asset(&self) -> &Path {
        &self.placeholder_asset
    }

    fn provider(&self, kind: ProviderKind) -> Option<&dyn SpeechProvider> {
        self.providers
            .iter()
            .find(|p| p.kind() == kind)
            .map(|p| &**p)
    }

    /// Load a storyboard file and synthesize it.
    pub async fn synthesize_from_file(
        &self,
        output_dir: impl AsRef<Path>,
        storyboard_path: impl AsRef<Path>,
        options: SynthesisOptions,
    ) -> Result<SynthesisResult> {
        let storyboard = Storyboard::load(storyboard_path).await?;
        self.synthesize_voiceover(output_dir, &storyboard, options)
            .await
    }

    /// Produce the audio and caption files for a storyboard.
    ///
    /// Provider failures fall back to the placeholder asset and are only
    /// logged. Errors are returned for an unusable output directory, a
    /// missing placeholder asset, or a failed write. On error neither
    /// output file from this run is left in place.
    pub async fn synthesize_voiceover(
        &self,
        output_dir: impl AsRef<Path>,
        storyboard: &Storyboard,
        options: SynthesisOptions,
    ) -> Result<SynthesisResult> {
        let out_dir = output_dir.as_ref();
        fs::create_dir_all(out_dir)
            .await
            .map_err(|source| VoiceoverError::OutputDir {
                path: out_dir.to_path_buf(),
                source,
            })?;

        let captions_path = out_dir.join(CAPTIONS_FILE);
        let captions = Staged::write(&captions_path, make_naive_srt(storyboard).as_bytes())
            .await
            .map_err(|source| VoiceoverError::Write {
                path: captions_path.clone(),
                source,
            })?;

        let mut kind = resolve_provider(options.provider, self.signals);
        debug!(
            "Resolved TTS provider {kind} (requested: {:?}, signals: {:?})",
            options.provider, self.signals
        );

        if storyboard.is_empty() && kind != ProviderKind::Placeholder {
            info!("Storyboard has no scenes, skipping {kind} TTS");
            kind = ProviderKind::Placeholder;
        }

        let network_audio = match kind {
            ProviderKind::Placeholder => None,
            kind => self.try_provider(kind, storyboard, out_dir).await,
        };

        let (audio, provider) = match network_audio {
            Some(staged) => (staged, kind),
            None => match self.stage_placeholder(out_dir).await {
                Ok(staged) => (staged, ProviderKind::Placeholder),
                Err(e) => {
                    captions.discard().await;
                    return Err(e);
                }
            },
        };

        // Both files are staged; place audio, then captions.
        let audio_path = audio.target.clone();
        if let Err(source) = audio.commit().await {
            captions.discard().await;
            return Err(VoiceoverError::Write {
                path: audio_path,
                source,
            });
        }
        if let Err(source) = captions.commit().await {
            let _ = fs::remove_file(&audio_path).await;
            return Err(VoiceoverError::Write {
                path: captions_path,
                source,
            });
        }

        info!(
            "{provider} voiceover written: {} ({} cues)",
            audio_path.display(),
            storyboard.scenes.len()
        );

        Ok(SynthesisResult {
            audio_path,
            captions_path,
            provider,
        })
    }

    /// Attempt one network provider. `None` means fall back.
    async fn try_provider(
        &self,
        kind: ProviderKind,
        storyboard: &Storyboard,
        out_dir: &Path,
    ) -> Option<Staged> {
        let Some(provider) = self.provider(kind) else {
            warn!("{kind} TTS is not configured, falling back to placeholder");
            return None;
        };

        let script = storyboard.script();
        match provider.synthesize(&script).await {
            SynthesisOutcome::Audio { bytes, format } => {
                let audio_path = audio_path(out_dir, format);
                match Staged::write(&audio_path, &bytes).await {
                    Ok(staged) => Some(staged),
                    Err(e) => {
                        warn!(
                            "{kind} TTS audio could not be written to {}, falling back to placeholder: {e}",
                            audio_path.display()
                        );
                        None
                    }
                }
            }
            SynthesisOutcome::Failed { reason } => {
                warn!("{kind} TTS failed, falling back to placeholder: {reason}");
                None
            }
        }
    }

    /// Copy the bundled placeholder asset next to the audio destination.
    async fn stage_placeholder(&self, out_dir: &Path) -> Result<Staged> {
        let source = &self.placeholder_asset;
        let format = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("mp3") => AudioFormat::Mp3,
            _ => AudioFormat::Wav,
        };

        Staged::copy(source, audio_path(out_dir, format))
            .await
            .map_err(|e| VoiceoverError::Placeholder {
                path: source.clone(),
                source: e,
            })
    }
}

/// Synthesize with a pipeline built from `config`.
pub async fn synthesize_voiceover(
    output_dir: impl AsRef<Path>,
    storyboard: &Storyboard,
    config: &VoiceoverConfig,
    options: SynthesisOptions,
) -> Result<SynthesisResult> {
    VoiceoverPipeline::new(config)?
        .synthesize_voiceover(output_dir, storyboard, options)
        .await
}

fn audio_path(out_dir: &Path, format: AudioFormat) -> PathBuf {
    out_dir.join(format!("{AUDIO_STEM}.{}", format.extension()))
}

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()))
}

/// A file written under a hidden sibling name, waiting to replace `target`.
struct Staged {
    staging: PathBuf,
    target: PathBuf,
}

impl Staged {
    async fn write(target: &Path, contents: &[u8]) -> std::io::Result<Self> {
        let staged = Self {
            staging: staging_path(target),
            target: target.to_path_buf(),
        };
        if let Err(e) = fs::write(&staged.staging, contents).await {
            staged.discard().await;
            return Err(e);
        }
        Ok(staged)
    }

    async fn copy(source: &Path, target: PathBuf) -> std::io::Result<Self> {
        let staged = Self {
            staging: staging_path(&target),
            target,
        };
        if let Err(e) = fs::copy(source, &staged.staging).await {
            staged.discard().await;
            return Err(e);
        }
        Ok(staged)
    }

    /// Rename over the target. The staging file is removed on failure.
    async fn commit(self) -> std::io::Result<()> {
        let renamed = fs::rename(&self.staging, &self.target).await;
        if renamed.is_err() {
            self.discard().await;
        }
        renamed
    }

    async fn discard(&self) {
        let _ = fs::remove_file(&self.staging).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::storyboard::Scene;

    struct Scripted(ProviderKind, SynthesisOutcome);

    #[async_trait]
    impl SpeechProvider for Scripted {
        fn kind(&self) -> ProviderKind {
            self.0
        }

        async fn synthesize(&self, _script: &str) -> SynthesisOutcome {
            self.1.clone()
        }
    }

    fn asset(dir: &Path) -> PathBuf {
        let path = dir.join("beep.wav");
        std::fs::write(&path, b"RIFF-placeholder").unwrap();
        path
    }

    fn storyboard() -> Storyboard {
        Storyboard::new(vec![Scene::new("Intro scene."), Scene::new("Outro scene.")])
    }

    #[test]
    fn staging_path_is_hidden_sibling() {
        let staging = staging_path(Path::new("/out/captions.srt"));
        assert_eq!(staging.parent(), Some(Path::new("/out")));
        let name = staging.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(".captions.srt."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn with_provider_sets_signal_and_replaces() {
        let pipeline = VoiceoverPipeline::placeholder_only("beep.wav")
            .with_provider(Box::new(Scripted(ProviderKind::Vapi, SynthesisOutcome::failed("a"))))
            .with_provider(Box::new(Scripted(ProviderKind::Vapi, SynthesisOutcome::failed("b"))));

        assert!(pipeline.signals().vapi_endpoint);
        assert!(!pipeline.signals().groq_credential);
        assert_eq!(pipeline.providers.len(), 1);
    }

    #[test]
    fn new_without_credentials_has_no_providers() {
        let pipeline = VoiceoverPipeline::new(&VoiceoverConfig::default()).unwrap();
        assert!(pipeline.providers.is_empty());
        assert_eq!(pipeline.placeholder_asset(), Path::new("assets/beep.wav"));
    }

    #[test]
    fn blank_credentials_build_no_providers() {
        let config = VoiceoverConfig::from_toml("[groq]\napi_key = \"\"\n[vapi]\nurl = \" \"\n").unwrap();
        let pipeline = VoiceoverPipeline::new(&config).unwrap();

        assert!(pipeline.providers.is_empty());
        assert_eq!(pipeline.signals(), ProviderSignals::default());
    }

    #[tokio::test]
    async fn provider_audio_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = VoiceoverPipeline::placeholder_only(asset(dir.path())).with_provider(
            Box::new(Scripted(
                ProviderKind::Groq,
                SynthesisOutcome::Audio {
                    bytes: Bytes::from_static(b"groq-audio"),
                    format: AudioFormat::Wav,
                },
            )),
        );

        let out = dir.path().join("out");
        let result = pipeline
            .synthesize_voiceover(&out, &storyboard(), SynthesisOptions::default())
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderKind::Groq);
        assert_eq!(result.audio_path, out.join("voiceover.wav"));
        assert_eq!(std::fs::read(&result.audio_path).unwrap(), b"groq-audio");
    }

    #[tokio::test]
    async fn unconfigured_explicit_provider_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = VoiceoverPipeline::placeholder_only(asset(dir.path()));

        let result = pipeline
            .synthesize_voiceover(
                dir.path().join("out"),
                &storyboard(),
                SynthesisOptions::with_provider(ProviderKind::Groq),
            )
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderKind::Placeholder);
        assert_eq!(std::fs::read(&result.audio_path).unwrap(), b"RIFF-placeholder");
    }

    #[tokio::test]
    async fn no_staging_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        VoiceoverPipeline::placeholder_only(asset(dir.path()))
            .synthesize_voiceover(&out, &storyboard(), SynthesisOptions::default())
            .await
            .unwrap();

        let mut names: Vec<String> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["captions.srt", "voiceover.wav"]);
    }

    #[tokio::test]
    async fn missing_asset_writes_no_captions() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let err = VoiceoverPipeline::placeholder_only(dir.path().join("missing.wav"))
            .synthesize_voiceover(&out, &storyboard(), SynthesisOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, VoiceoverError::Placeholder { .. }));
        assert!(!out.join(CAPTIONS_FILE).exists());
        assert!(!out.join("voiceover.wav").exists());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn failed_caption_rename_removes_placed_audio() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(out.join(CAPTIONS_FILE)).unwrap();

        let err = VoiceoverPipeline::placeholder_only(asset(dir.path()))
            .synthesize_voiceover(&out, &storyboard(), SynthesisOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, VoiceoverError::Write { ref path, .. } if path.ends_with(CAPTIONS_FILE)));
        assert!(!out.join("voiceover.wav").exists());
        let names: Vec<String> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![CAPTIONS_FILE]);
    }
}
