//! # mdxprep-core
//!
//! Content preparation for MDX documentation pages. Given the top-level nodes
//! of a page, the preparer produces:
//!
//! - a flat **table of contents** gathered from headings and a few
//!   section-like components (`Challenges`, `Recap`, `TeamMember`), and
//! - the page's nodes regrouped so that runs of narrow content sit inside
//!   `MaxWidth` wrappers while full-width components (sandboxes,
//!   illustrations, challenge blocks) stay at the top level.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdxprep_core::{ContentNode, Element, prepare};
//!
//! let page: Vec<ContentNode> = vec![
//!   Element::new("h2").with_prop("id", "state").with_child("State").into(),
//!   Element::new("p").with_child("Components remember things.").into(),
//!   Element::new("Sandpack").into(),
//! ];
//!
//! let prepared = prepare(&page);
//! assert_eq!(prepared.toc.len(), 2); // "Overview" + "State"
//! assert_eq!(prepared.children.len(), 2); // one wrapper, then the sandbox
//! ```
//!
//! ## JSON input
//!
//! ```rust
//! use mdxprep_core::{ContentPreparer, PrepareOptions};
//!
//! let preparer = ContentPreparer::new(PrepareOptions { toc_depth: 4 });
//! let prepared = preparer
//!   .prepare_json(r#"["Hello", {"type": "Illustration", "props": {}}]"#)
//!   .expect("valid content tree");
//! assert_eq!(prepared.wrapper_count(), 1);
//! ```
//!
//! ## Challenges
//!
//! [`ChallengesBlock`] parses a challenge block's children into
//! [`Challenge`]s and [`ChallengeNavigator`] steps through them.

pub mod challenges;
mod error;
pub mod node;
mod preparer;
pub mod toc;
mod types;
pub mod wrap;

pub use crate::{
  challenges::{
    Challenge,
    ChallengeNavigator,
    ChallengesBlock,
    DEFAULT_CHALLENGES_TITLE,
    DEFAULT_RECIPES_TITLE,
    find_challenge_blocks,
    parse_challenges,
  },
  error::{PrepareError, PrepareResult},
  node::{
    ChildrenLayout,
    ContentNode,
    Element,
    NodeType,
    nodes_from_json,
    nodes_from_value,
  },
  preparer::{CONTENT_FORMAT_VERSION, ContentPreparer, PrepareOptions, prepare},
  toc::{DEFAULT_TOC_DEPTH, table_of_contents},
  types::{FormatVersion, PreparedContent, TocEntry},
  wrap::{Section, WrapperKey, wrap_full_width},
};
