//! CLI command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line interface definition for the voxpad speech reader.
#[derive(Parser)]
#[command(name = "voxpad")]
#[command(about = "Read text aloud with pausable, resumable playback")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Read a file aloud and control playback interactively
    Read {
        /// File to read aloud
        file: Option<PathBuf>,

        /// Read this text instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Speaking rate in words per minute (90-280)
        #[arg(long)]
        rate: Option<u32>,

        /// Voice id (see `voxpad voices`)
        #[arg(long)]
        voice: Option<String>,
    },

    /// List available voices
    Voices,

    /// Check which speech programs are installed
    CheckDeps,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn read_accepts_file_and_settings() {
        let cli = Cli::parse_from(["voxpad", "read", "notes.txt", "--rate", "200"]);
        let Commands::Read { file, text, rate, voice } = cli.command else {
            panic!("expected read command");
        };
        assert_eq!(file, Some(PathBuf::from("notes.txt")));
        assert_eq!(text, None);
        assert_eq!(rate, Some(200));
        assert_eq!(voice, None);
    }

    #[test]
    fn read_text_conflicts_with_file() {
        let result = Cli::try_parse_from(["voxpad", "read", "notes.txt", "--text", "Hello."]);
        assert!(result.is_err());
    }

    #[test]
    fn voices_and_check_deps_parse() {
        assert!(matches!(
            Cli::parse_from(["voxpad", "voices"]).command,
            Commands::Voices
        ));
        assert!(matches!(
            Cli::parse_from(["voxpad", "check-deps"]).command,
            Commands::CheckDeps
        ));
    }
}
