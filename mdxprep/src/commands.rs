//! Subcommand implementations.
//!
//! Each content command is split into a pure `*_document` function producing
//! a JSON value and the I/O around it, so the former can be tested without
//! touching stdin or stdout.
use std::{
  fs,
  io::{self, Read, Write},
  path::Path,
};

use color_eyre::eyre::{Context, Result, bail};
use log::{debug, info};
use mdxprep_config::{Config, ConfigFormat};
use mdxprep_core::{
  CONTENT_FORMAT_VERSION,
  ContentPreparer,
  find_challenge_blocks,
  nodes_from_json,
  table_of_contents,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::{Cli, Commands, IoArgs};

/// Run the parsed command line.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the command fails.
pub fn run(cli: &Cli) -> Result<()> {
  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => init_config(output, format, *force),

    Commands::FormatVersion => {
      write_output(None, &format!("{CONTENT_FORMAT_VERSION}\n"))
    },

    Commands::Prepare { io } => {
      let config = load_config(cli)?;
      run_content_command(io, &config, |input| prepare_document(&config, input))
    },

    Commands::Toc { io } => {
      let config = load_config(cli)?;
      run_content_command(io, &config, |input| toc_document(&config, input))
    },

    Commands::Challenges { io } => {
      let config = load_config(cli)?;
      run_content_command(io, &config, challenges_document)
    },
  }
}

fn load_config(cli: &Cli) -> Result<Config> {
  let config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;
  debug!("Effective configuration: {config:?}");
  Ok(config)
}

fn run_content_command(
  io: &IoArgs,
  config: &Config,
  produce: impl FnOnce(&str) -> Result<Value>,
) -> Result<()> {
  let input = read_input(io.input.as_deref())?;
  let document = produce(&input)?;
  let mut rendered = to_json(&document, config.pretty)?;
  rendered.push('\n');
  write_output(io.output.as_deref(), &rendered)
}

/// Prepare a JSON content tree into `{version, toc, children}`, leaving out
/// the parts the configuration disables.
///
/// # Errors
///
/// Returns an error if the input is not a valid content tree.
pub fn prepare_document(config: &Config, input: &str) -> Result<Value> {
  let prepared = ContentPreparer::new(config.prepare_options())
    .prepare_json(input)
    .wrap_err("Failed to read content tree")?;

  info!(
    "Prepared {} section(s), {} wrapper(s), {} TOC entries",
    prepared.children.len(),
    prepared.wrapper_count(),
    prepared.toc.len()
  );

  let mut output = Map::new();
  if config.include_version {
    output.insert("version".to_owned(), serde_json::to_value(prepared.version)?);
  }
  if config.include_toc {
    output.insert("toc".to_owned(), serde_json::to_value(&prepared.toc)?);
  }
  output.insert(
    "children".to_owned(),
    serde_json::to_value(&prepared.children)?,
  );
  Ok(Value::Object(output))
}

/// Table of contents of a JSON content tree.
///
/// # Errors
///
/// Returns an error if the input is not a valid content tree.
pub fn toc_document(config: &Config, input: &str) -> Result<Value> {
  let nodes = nodes_from_json(input).wrap_err("Failed to read content tree")?;
  let toc = table_of_contents(&nodes, config.toc_depth);
  info!("Found {} TOC entries", toc.len());
  Ok(serde_json::to_value(toc)?)
}

/// Challenge blocks of a JSON content tree.
///
/// # Errors
///
/// Returns an error if the input is not a valid content tree.
pub fn challenges_document(input: &str) -> Result<Value> {
  let nodes = nodes_from_json(input).wrap_err("Failed to read content tree")?;
  let blocks = find_challenge_blocks(&nodes);
  info!(
    "Found {} challenge block(s) with {} challenge(s)",
    blocks.len(),
    blocks.iter().map(|b| b.challenges.len()).sum::<usize>()
  );
  Ok(serde_json::to_value(blocks)?)
}

/// Write a default configuration file.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn init_config(output: &Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  let format: ConfigFormat = format.parse()?;
  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!("Configuration file created successfully.");
  Ok(())
}

/// Serialize a value as JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
  let rendered = if pretty {
    serde_json::to_string_pretty(value)?
  } else {
    serde_json::to_string(value)?
  };
  Ok(rendered)
}

fn read_input(path: Option<&Path>) -> Result<String> {
  match path {
    Some(path) => {
      fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read input: {}", path.display()))
    },
    None => {
      let mut input = String::new();
      io::stdin()
        .read_to_string(&mut input)
        .wrap_err("Failed to read input from stdin")?;
      Ok(input)
    },
  }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
  match path {
    Some(path) => {
      fs::write(path, content)
        .wrap_err_with(|| format!("Failed to write output: {}", path.display()))?;
      info!("Wrote {}", path.display());
    },
    None => {
      let mut stdout = io::stdout().lock();
      stdout.write_all(content.as_bytes())?;
      stdout.flush()?;
    },
  }
  Ok(())
}
