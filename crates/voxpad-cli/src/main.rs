//! CLI entry point - the composition root.
//!
//! This is the only place where the speech service is wired together:
//! engine probe, event printer, and command dispatch. Everything below
//! the port boundary lives in `voxpad-speech`.

#![deny(unused_crate_dependencies)]

mod commands;
mod progress;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use voxpad_core::{NoopEmitter, SpeechPlaybackPort};
use voxpad_speech::{SpeechService, probe_report};

use commands::{Cli, Commands};
use progress::ProgressPrinter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Read {
            file,
            text,
            rate,
            voice,
        } => read(file, text, rate, voice).await,
        Commands::Voices => voices().await,
        Commands::CheckDeps => {
            check_deps();
            Ok(())
        }
    }
}

/// `voxpad read`: start a session and hand control to the prompt.
async fn read(
    file: Option<PathBuf>,
    text: Option<String>,
    rate: Option<u32>,
    voice: Option<String>,
) -> anyhow::Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("provide a FILE to read, or --text"),
    };

    let service = Arc::new(SpeechService::new(Arc::new(ProgressPrinter::new())));

    // Apply one-shot settings before the session starts speaking.
    if let Some(rate) = rate {
        service.set_rate(rate).await?;
    }
    if let Some(ref voice) = voice {
        service.set_voice(voice).await?;
    }

    service.start_all(&text).await?;
    repl::run(service).await
}

/// `voxpad voices`: list selectable voices, the default sentinel first.
async fn voices() -> anyhow::Result<()> {
    let service = SpeechService::new(Arc::new(NoopEmitter::new()));
    for voice in service.list_voices().await? {
        println!("{:<24} {}", voice.id, voice.name);
    }
    Ok(())
}

/// `voxpad check-deps`: report which speech programs are on `PATH`.
fn check_deps() {
    let report = probe_report();
    let mut any_found = false;

    println!("Speech programs:");
    for (program, path) in report {
        match path {
            Some(path) => {
                any_found = true;
                println!("  [ok]      {program:<10} {}", path.display());
            }
            None => println!("  [missing] {program}"),
        }
    }

    if !any_found {
        println!();
        println!("No speech program found. Install espeak-ng (Linux) or use macOS 'say'.");
    }
}
