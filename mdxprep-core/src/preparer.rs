//! The content preparer: TOC extraction plus full-width wrapping in one pass
//! over a page's top-level nodes.
use log::debug;

use crate::{
  error::PrepareResult,
  node::{ContentNode, nodes_from_json},
  toc::{DEFAULT_TOC_DEPTH, table_of_contents},
  types::{FormatVersion, PreparedContent},
  wrap::wrap_full_width,
};

/// Version of the prepared-content format.
///
/// Bump this whenever the shape of [`PreparedContent`] produced for a given
/// input changes, so that caches of prepared pages are rebuilt.
pub const CONTENT_FORMAT_VERSION: FormatVersion = FormatVersion::new(4);

/// Options for the content preparer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareOptions {
  /// Recursion budget when searching nested elements for headers.
  pub toc_depth: usize,
}

impl Default for PrepareOptions {
  fn default() -> Self {
    Self {
      toc_depth: DEFAULT_TOC_DEPTH,
    }
  }
}

/// Prepares raw page content for rendering.
#[derive(Debug, Clone, Default)]
pub struct ContentPreparer {
  options: PrepareOptions,
}

impl ContentPreparer {
  #[must_use]
  pub const fn new(options: PrepareOptions) -> Self {
    Self { options }
  }

  #[must_use]
  pub const fn options(&self) -> &PrepareOptions {
    &self.options
  }

  /// Extract the table of contents and wrap narrow runs. The input is only
  /// read; the output is freshly built.
  #[must_use]
  pub fn prepare(&self, raw: &[ContentNode]) -> PreparedContent {
    let toc = table_of_contents(raw, self.options.toc_depth);
    let children = wrap_full_width(raw);
    debug!(
      "Prepared {} node(s) into {} section(s) with {} TOC entries",
      raw.len(),
      children.len(),
      toc.len()
    );
    PreparedContent {
      version: CONTENT_FORMAT_VERSION,
      toc,
      children,
    }
  }

  /// Decode a JSON content tree and prepare it.
  ///
  /// # Errors
  ///
  /// Returns an error if the input is not valid JSON or not a content tree.
  pub fn prepare_json(&self, input: &str) -> PrepareResult<PreparedContent> {
    let nodes = nodes_from_json(input)?;
    Ok(self.prepare(&nodes))
  }
}

/// Prepare content with default options.
#[must_use]
pub fn prepare(raw: &[ContentNode]) -> PreparedContent {
  ContentPreparer::default().prepare(raw)
}
