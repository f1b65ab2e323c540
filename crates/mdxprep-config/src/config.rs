use std::{
  fmt,
  fs,
  path::{Path, PathBuf},
  str::FromStr,
};

use mdxprep_core::{DEFAULT_TOC_DEPTH, PrepareOptions};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for `toc_depth`. Header search recurses once per level.
pub const MAX_TOC_DEPTH: usize = 64;

/// File names searched, in order, when no config file is given.
const CONFIG_FILENAMES: [&str; 3] =
  ["mdxprep.toml", ".mdxprep.toml", "mdxprep.json"];

/// Configuration for mdxprep.
///
/// Fields are loaded from TOML or JSON config files and `--config KEY=VALUE`
/// overrides on top of the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Recursion budget when searching nested elements for headers.
  pub toc_depth: usize,

  /// Whether to pretty-print JSON output.
  pub pretty: bool,

  /// Whether `prepare` output includes the table of contents.
  pub include_toc: bool,

  /// Whether `prepare` output includes the content format version.
  pub include_version: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      toc_depth:       DEFAULT_TOC_DEPTH,
      pretty:          true,
      include_toc:     true,
      include_version: true,
    }
  }
}

/// One config file's worth of settings. Only keys present in the file are
/// set, so later files override earlier ones field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
  pub toc_depth:       Option<usize>,
  pub pretty:          Option<bool>,
  pub include_toc:     Option<bool>,
  pub include_version: Option<bool>,
}

impl ConfigLayer {
  /// Load a layer from a file (TOML or JSON, chosen by extension).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match ConfigFormat::from_path(path)? {
      ConfigFormat::Json => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      ConfigFormat::Toml => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
    }
  }
}

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
  Toml,
  Json,
}

impl ConfigFormat {
  /// Pick the format from a file extension.
  ///
  /// # Errors
  ///
  /// Returns an error if the path has no extension or an unsupported one.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let ext = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
      ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      ))
    })?;

    ext.parse().map_err(|_| {
      ConfigError::Config(format!(
        "Unsupported config file format: {}",
        path.display()
      ))
    })
  }
}

impl FromStr for ConfigFormat {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "toml" => Ok(Self::Toml),
      "json" => Ok(Self::Json),
      other => {
        Err(ConfigError::Config(format!(
          "Unknown config format '{other}', expected toml or json"
        )))
      },
    }
  }
}

impl fmt::Display for ConfigFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Toml => f.write_str("toml"),
      Self::Json => f.write_str("json"),
    }
  }
}

impl Config {
  /// Load configuration from a single file on top of the defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the
  /// resulting configuration is invalid.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let mut config = Self::default();
    config.merge(ConfigLayer::from_file(path)?);
    config.validate()?;
    Ok(config)
  }

  /// Load configuration from config files and overrides.
  ///
  /// Explicit files are merged in order. Without any, a config file in the
  /// working directory is used if one exists. Overrides are applied last.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is malformed,
  /// or the result fails validation.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if config_files.is_empty() {
      if let Some(discovered) = Self::find_config_file() {
        log::info!("Using discovered config file: {}", discovered.display());
        config.merge(ConfigLayer::from_file(&discovered)?);
      }
    } else {
      for path in config_files {
        config.merge(ConfigLayer::from_file(path)?);
      }
      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
    }

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Merge a layer into this config; fields set in the layer win.
  pub fn merge(&mut self, layer: ConfigLayer) {
    if let Some(toc_depth) = layer.toc_depth {
      self.toc_depth = toc_depth;
    }
    if let Some(pretty) = layer.pretty {
      self.pretty = pretty;
    }
    if let Some(include_toc) = layer.include_toc {
      self.include_toc = include_toc;
    }
    if let Some(include_version) = layer.include_version {
      self.include_version = include_version;
    }
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in KEY=VALUE format, names an
  /// unknown key, or has a value of the wrong type.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Set a single field by key.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys or unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "toc_depth" => self.toc_depth = parse_value(key, value)?,
      "pretty" => self.pretty = parse_value(key, value)?,
      "include_toc" => self.include_toc = parse_value(key, value)?,
      "include_version" => self.include_version = parse_value(key, value)?,
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }
    log::debug!("Applied config override {key}={value}");
    Ok(())
  }

  /// Check field ranges.
  ///
  /// # Errors
  ///
  /// Returns an error if `toc_depth` exceeds [`MAX_TOC_DEPTH`].
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.toc_depth > MAX_TOC_DEPTH {
      return Err(ConfigError::Config(format!(
        "toc_depth must be at most {MAX_TOC_DEPTH}, got {}",
        self.toc_depth
      )));
    }
    Ok(())
  }

  /// Options for the content preparer derived from this config.
  #[must_use]
  pub const fn prepare_options(&self) -> PrepareOptions {
    PrepareOptions {
      toc_depth: self.toc_depth,
    }
  }

  /// Search for a config file in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    Self::find_config_file_in(&cwd)
  }

  /// Search for a config file in `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|name| dir.join(name))
      .find(|path| path.is_file())
  }

  /// Serialize this config in the given format.
  ///
  /// # Errors
  ///
  /// Returns an error if serialization fails.
  pub fn render(&self, format: ConfigFormat) -> Result<String, ConfigError> {
    match format {
      ConfigFormat::Toml => Ok(toml::to_string_pretty(self)?),
      ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
    }
  }

  /// Write the default configuration to `path`.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be written.
  pub fn generate_default_config(
    format: ConfigFormat,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let mut content = Self::default().render(format)?;
    if !content.ends_with('\n') {
      content.push('\n');
    }
    fs::write(path, content)?;
    log::info!("Wrote default {format} configuration to {}", path.display());
    Ok(())
  }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
  T::Err: fmt::Display,
{
  value.parse().map_err(|e| {
    ConfigError::Config(format!("Invalid value '{value}' for '{key}': {e}"))
  })
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use super::*;

  #[test]
  fn test_config_merge_only_set_fields() {
    let mut base = Config::default();
    base.pretty = false;

    base.merge(ConfigLayer {
      toc_depth: Some(3),
      ..ConfigLayer::default()
    });

    assert_eq!(base.toc_depth, 3);
    // Unset in the layer, so untouched.
    assert!(!base.pretty);
    assert!(base.include_toc);
  }

  #[test]
  fn test_apply_overrides() {
    let mut config = Config::default();
    config
      .apply_overrides(&[
        "toc_depth=4".to_string(),
        " pretty = false ".to_string(),
      ])
      .unwrap();
    assert_eq!(config.toc_depth, 4);
    assert!(!config.pretty);
  }

  #[test]
  fn test_apply_override_errors() {
    let mut config = Config::default();
    assert!(config.apply_overrides(&["toc_depth".to_string()]).is_err());
    assert!(config.apply_override("toc_depth", "deep").is_err());
    assert!(config.apply_override("theme", "dark").is_err());
  }

  #[test]
  fn test_validate_toc_depth_bound() {
    let mut config = Config::default();
    config.toc_depth = MAX_TOC_DEPTH + 1;
    assert!(config.validate().is_err());
    config.toc_depth = MAX_TOC_DEPTH;
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_format_from_path() {
    assert_eq!(
      ConfigFormat::from_path(Path::new("a/mdxprep.TOML")).unwrap(),
      ConfigFormat::Toml
    );
    assert!(ConfigFormat::from_path(Path::new("mdxprep")).is_err());
    assert!(ConfigFormat::from_path(Path::new("mdxprep.yaml")).is_err());
  }

  #[test]
  fn test_prepare_options() {
    let mut config = Config::default();
    config.toc_depth = 2;
    assert_eq!(config.prepare_options().toc_depth, 2);
  }
}
