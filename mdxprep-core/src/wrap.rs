//! Grouping of narrow content under `MaxWidth` wrappers.
//!
//! Everything except a handful of full-width types (sandboxes, illustrations,
//! challenge blocks) is rendered inside a width-constrained column. Adjacent
//! narrow nodes share one wrapper until a full-width node interrupts the run.
use std::{fmt, mem};

use log::debug;
use serde::{Serialize, Serializer};

use crate::node::{ContentNode, Element, NodeType};

/// Key of a synthetic wrapper, unique within one output sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKey {
  /// Wrapper flushed by the full-width sibling at this input index.
  Before(usize),
  /// Wrapper holding the trailing run.
  Last,
}

impl fmt::Display for WrapperKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Before(index) => write!(f, "{index}"),
      Self::Last => f.write_str("last"),
    }
  }
}

/// One top-level section of prepared output.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
  /// A synthetic `MaxWidth` wrapper around a non-empty run of narrow nodes.
  Narrow {
    key:   WrapperKey,
    nodes: Vec<ContentNode>,
  },
  /// An original full-width node, passed through unwrapped.
  FullWidth(Element),
}

impl Section {
  #[must_use]
  pub const fn is_wrapper(&self) -> bool {
    matches!(self, Self::Narrow { .. })
  }

  /// Render this section as a content node; wrappers become `MaxWidth`
  /// elements.
  #[must_use]
  pub fn to_node(&self) -> ContentNode {
    match self {
      Self::Narrow { key, nodes } => {
        ContentNode::Element(Element {
          key: Some(key.to_string()),
          children: nodes.clone(),
          ..Element::new(NodeType::MaxWidth)
        })
      },
      Self::FullWidth(element) => ContentNode::Element(element.clone()),
    }
  }

  /// The original nodes this section covers, in order.
  #[must_use]
  pub fn into_content(self) -> Vec<ContentNode> {
    match self {
      Self::Narrow { nodes, .. } => nodes,
      Self::FullWidth(element) => vec![ContentNode::Element(element)],
    }
  }
}

impl Serialize for Section {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.to_node().serialize(serializer)
  }
}

/// Fold accumulator: the pending narrow run and the sections emitted so far.
#[derive(Debug, Default)]
struct Wrapping {
  queue:    Vec<ContentNode>,
  sections: Vec<Section>,
}

impl Wrapping {
  fn queue(mut self, node: &ContentNode) -> Self {
    self.queue.push(node.clone());
    self
  }

  fn flush(mut self, key: WrapperKey) -> Self {
    if !self.queue.is_empty() {
      let nodes = mem::take(&mut self.queue);
      debug!("Wrapping {} narrow node(s) under key {key}", nodes.len());
      self.sections.push(Section::Narrow { key, nodes });
    }
    self
  }

  fn step(self, (index, node): (usize, &ContentNode)) -> Self {
    match node {
      ContentNode::Empty | ContentNode::Bool(_) => self,
      ContentNode::Text(_) | ContentNode::Number(_) => self.queue(node),
      ContentNode::Element(element) if element.kind.is_full_width() => {
        let mut next = self.flush(WrapperKey::Before(index));
        next.sections.push(Section::FullWidth(element.clone()));
        next
      },
      ContentNode::Element(_) => self.queue(node),
    }
  }
}

/// Split a sibling sequence into wrapped narrow runs and full-width nodes.
///
/// Relative order is preserved and every non-empty node lands in exactly one
/// section. Wrappers are only emitted for non-empty runs.
#[must_use]
pub fn wrap_full_width(nodes: &[ContentNode]) -> Vec<Section> {
  nodes
    .iter()
    .enumerate()
    .fold(Wrapping::default(), Wrapping::step)
    .flush(WrapperKey::Last)
    .sections
}
