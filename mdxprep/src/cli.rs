use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for mdxprep
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Prepare MDX page content: table of contents and full-width sections"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Later files override earlier ones.
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the mdxprep CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Prepare a content tree: table of contents plus wrapped sections.
  Prepare {
    #[command(flatten)]
    io: IoArgs,
  },

  /// Print only the table of contents of a content tree.
  Toc {
    #[command(flatten)]
    io: IoArgs,
  },

  /// List the challenge blocks found in a content tree.
  Challenges {
    #[command(flatten)]
    io: IoArgs,
  },

  /// Initialize a new mdxprep configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "mdxprep.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Print the content format version used to invalidate prepared caches.
  FormatVersion,
}

/// Input and output locations shared by the content commands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct IoArgs {
  /// JSON content tree to read. Reads stdin when omitted.
  #[arg(short, long)]
  pub input: Option<PathBuf>,

  /// File to write the result to. Writes stdout when omitted.
  #[arg(short, long)]
  pub output: Option<PathBuf>,
}

impl Cli {
  /// Parse command line arguments.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
