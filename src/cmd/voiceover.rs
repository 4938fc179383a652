use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use onetake::{ProviderKind, Storyboard, SynthesisOptions, VoiceoverConfig, VoiceoverPipeline};

pub async fn cmd_voiceover(
    storyboard_path: &Path,
    out: &Path,
    provider: Option<ProviderKind>,
    placeholder: Option<PathBuf>,
    timeout: Option<u64>,
) -> Result<()> {
    let storyboard = Storyboard::load(storyboard_path)
        .await
        .with_context(|| format!("cannot use storyboard {}", storyboard_path.display()))?;

    let mut config = VoiceoverConfig::load()?;
    if let Some(path) = placeholder {
        config.placeholder_asset = path;
    }
    if let Some(secs) = timeout {
        config.request_timeout_secs = Some(secs);
    }

    eprintln!(
        "🎙️  Generating voiceover for {} scenes",
        storyboard.scenes.len()
    );
    if let Some(kind) = provider {
        eprintln!("   Provider: {kind} (requested)");
    }

    let pipeline = VoiceoverPipeline::new(&config)?;

    let start = std::time::Instant::now();
    let result = pipeline
        .synthesize_voiceover(out, &storyboard, SynthesisOptions { provider })
        .await
        .context("voiceover generation failed")?;
    let elapsed = start.elapsed();

    println!(
        "✅ Voiceover generated via {} in {:.1}s",
        result.provider,
        elapsed.as_secs_f64()
    );
    println!("   Audio file: {}", result.audio_path.display());
    println!("   Captions file: {}", result.captions_path.display());

    Ok(())
}
