use std::path::PathBuf;

use clap::{ArgAction, Parser};
use shiori_core::config::AppConfig;
use shiori_core::render::DocumentVariant;

/// Look up an anime or manga on AniList and save it as a note in your vault.
#[derive(Debug, Parser)]
#[command(name = "shiori", version, about)]
pub struct Cli {
    /// Config file to use instead of the one in the platform config directory.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Vault folder that receives Anime/ and Manga/.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Field set written into the note: minimal or extended.
    #[arg(long, value_name = "VARIANT")]
    pub variant: Option<DocumentVariant>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(output) = &self.output {
            config.output.root = output.clone();
        }
        if let Some(variant) = self.variant {
            config.render.variant = variant;
        }
    }

    /// Default log filter for the chosen verbosity. `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "shiori=info,shiori_api=info,shiori_core=info,shiori_cli=info",
            1 => "shiori=debug,shiori_api=debug,shiori_core=debug,shiori_cli=debug",
            _ => "shiori=trace,shiori_api=trace,shiori_core=trace,shiori_cli=trace",
        }
    }
}
