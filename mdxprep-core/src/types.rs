//! Output types of the content preparer.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wrap::Section;

/// A navigable heading reference for the page's table of contents.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TocEntry {
  /// Anchor reference, e.g. `#state-updates`.
  pub url:   String,
  /// Nesting depth. Headings use their level; synthetic sections use 2 or 3.
  pub depth: u8,
  /// Label shown in the navigation.
  pub text:  String,
}

impl TocEntry {
  #[must_use]
  pub fn new(url: impl Into<String>, depth: u8, text: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      depth,
      text: text.into(),
    }
  }

  /// The synthetic entry pointing at the top of the page.
  #[must_use]
  pub fn overview() -> Self {
    Self::new("#", 2, "Overview")
  }
}

/// Version of the prepared-content format.
///
/// Caches holding prepared output must treat entries written under a
/// different version as stale.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FormatVersion(u32);

impl FormatVersion {
  #[must_use]
  pub const fn new(version: u32) -> Self {
    Self(version)
  }

  #[must_use]
  pub const fn get(self) -> u32 {
    self.0
  }
}

impl fmt::Display for FormatVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Result of preparing a page's content.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PreparedContent {
  /// Format version the output was produced under.
  pub version: FormatVersion,

  /// Table of contents. Empty, or led by the "Overview" entry.
  pub toc: Vec<TocEntry>,

  /// Top-level sections in original order.
  pub children: Vec<Section>,
}

impl PreparedContent {
  /// Number of synthetic `MaxWidth` wrappers in the output.
  #[must_use]
  pub fn wrapper_count(&self) -> usize {
    self.children.iter().filter(|s| s.is_wrapper()).count()
  }
}
