//! CLI definitions for PageVoice.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use pagevoice_protocols::ControlKind;

pub(crate) const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// PageVoice CLI.
#[derive(Parser)]
#[command(name = "pagevoice")]
#[command(about = "Voice and text commands for web pages")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Drive a JSON page snapshot instead of the configured backend
    #[arg(long, global = true, env = "PAGEVOICE_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run one command against the page and print the result as JSON
    Run {
        /// Command text, e.g. "search for running shoes"
        text: String,

        /// Transcription confidence to attach to the command
        #[arg(long, default_value_t = 1.0)]
        confidence: f32,
    },

    /// List the controls discovered on the page
    Discover {
        /// Control kind to look for
        #[arg(value_enum)]
        kind: KindArg,
    },

    /// Serve the browser extension over native messaging on stdin/stdout
    Serve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum KindArg {
    Search,
    Filter,
    Nav,
}

impl From<KindArg> for ControlKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Search => ControlKind::SearchInput,
            KindArg::Filter => ControlKind::FilterControl,
            KindArg::Nav => ControlKind::NavControl,
        }
    }
}
