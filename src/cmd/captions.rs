use std::path::Path;

use anyhow::{Context, Result};

use onetake::voiceover::make_naive_srt;
use onetake::Storyboard;

async fn load(path: &Path) -> Result<Storyboard> {
    Storyboard::load(path)
        .await
        .with_context(|| format!("cannot use storyboard {}", path.display()))
}

pub async fn cmd_captions(storyboard_path: &Path, output: Option<&Path>) -> Result<()> {
    let storyboard = load(storyboard_path).await?;
    let srt = make_naive_srt(&storyboard);

    if let Some(path) = output {
        tokio::fs::write(path, &srt)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("📄 Saved {} cues to: {}", storyboard.scenes.len(), path.display());
    } else {
        print!("{srt}");
    }

    Ok(())
}

pub async fn cmd_script(storyboard_path: &Path) -> Result<()> {
    let storyboard = load(storyboard_path).await?;
    println!("{}", storyboard.script());
    Ok(())
}
