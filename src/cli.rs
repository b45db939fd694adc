//! Shared command-line handling for the generator binaries

use anyhow::Result;
use clap::{Command, CommandFactory, FromArgMatches, Parser};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author = "法遵部 / 風控部")]
#[command(version)]
#[command(about = "Generate the AML risk event summary model charter documents", long_about = None)]
pub struct GeneratorArgs {
    /// Write to PATH instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the content model as JSON instead of writing a file
    #[arg(long)]
    pub outline: bool,
}

impl GeneratorArgs {
    /// Parse the process arguments, with `about` as the `--help` summary.
    pub fn parse_for(about: &'static str) -> Self {
        let matches = Self::command_for(about).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    fn command_for(about: &'static str) -> Command {
        Self::command().about(about)
    }

    pub fn output_path(&self, default: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default))
    }
}

/// Log to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

pub fn print_outline<T: Serialize>(model: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(model)?);
    Ok(())
}
