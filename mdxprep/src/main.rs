use color_eyre::eyre::Result;
use log::LevelFilter;
use mdxprep::{cli::Cli, commands};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Logs go to stderr; stdout is reserved for command output
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  commands::run(&cli)
}
