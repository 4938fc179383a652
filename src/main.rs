//! `onetake` CLI - storyboard voiceover and captions

mod cmd;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use onetake::ProviderKind;

#[derive(Parser)]
#[command(name = "onetake")]
#[command(about = "Storyboard voiceover synthesis with SubRip captions")]
#[command(version)]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize voiceover audio and captions for a storyboard
    Voiceover {
        /// Storyboard JSON file
        storyboard: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long, default_value = "voice-output")]
        out: PathBuf,

        /// Provider to try first: groq, vapi or placeholder
        #[arg(short, long)]
        provider: Option<ProviderKind>,

        /// Placeholder audio copied when no provider succeeds
        #[arg(long)]
        placeholder: Option<PathBuf>,

        /// Request timeout for network providers, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Print SubRip captions for a storyboard without synthesizing audio
    Captions {
        /// Storyboard JSON file
        storyboard: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the narration script sent to speech providers
    Script {
        /// Storyboard JSON file
        storyboard: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::Voiceover {
            storyboard,
            out,
            provider,
            placeholder,
            timeout,
        } => {
            cmd::voiceover::cmd_voiceover(&storyboard, &out, provider, placeholder, timeout)
                .await?;
        }
        Commands::Captions { storyboard, output } => {
            cmd::captions::cmd_captions(&storyboard, output.as_deref()).await?;
        }
        Commands::Script { storyboard } => {
            cmd::captions::cmd_script(&storyboard).await?;
        }
    }

    Ok(())
}
