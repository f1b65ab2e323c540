//! Table of contents extraction.
use log::{debug, warn};

use crate::{
  node::{ContentNode, Element, NodeType},
  types::TocEntry,
};

/// Default recursion budget for header extraction. Deep enough for any
/// realistic page.
pub const DEFAULT_TOC_DEPTH: usize = 10;

/// Build the table of contents for a node sequence.
///
/// Entries follow depth-first pre-order of the source tree. When at least one
/// header is found, a synthetic "Overview" entry is prepended.
#[must_use]
pub fn table_of_contents(nodes: &[ContentNode], depth: usize) -> Vec<TocEntry> {
  let mut entries = Vec::new();
  extract_headers(nodes, depth, &mut entries);
  if !entries.is_empty() {
    entries.insert(0, TocEntry::overview());
  }
  entries
}

/// Append the headers found in `nodes` to `out`.
///
/// Header nodes are not descended into. Other elements are searched while
/// `depth` allows, with the budget reduced by one per level.
pub fn extract_headers(
  nodes: &[ContentNode],
  depth: usize,
  out: &mut Vec<TocEntry>,
) {
  for element in nodes.iter().filter_map(ContentNode::as_element) {
    if let Some(entry) = header_entry(element) {
      out.push(entry);
    } else if !element.children.is_empty() {
      if depth > 0 {
        extract_headers(&element.children, depth - 1, out);
      } else {
        debug!(
          "Depth budget exhausted, not searching <{}> for headers",
          element.kind
        );
      }
    }
  }
}

/// The TOC entry contributed by a header element, or `None` for any other
/// element.
#[must_use]
pub fn header_entry(element: &Element) -> Option<TocEntry> {
  match &element.kind {
    NodeType::Heading(tag) => {
      Some(TocEntry::new(
        anchor(element, "id"),
        heading_depth(tag),
        element.text_content(),
      ))
    },
    NodeType::Challenges => Some(TocEntry::new("#challenges", 2, "Challenges")),
    NodeType::Recap => Some(TocEntry::new("#recap", 2, "Recap")),
    NodeType::TeamMember => {
      let name = element.prop_str("name").unwrap_or_else(|| {
        warn!("<TeamMember> without a name prop");
        ""
      });
      Some(TocEntry::new(anchor(element, "permalink"), 3, name))
    },
    NodeType::Sandpack
    | NodeType::FullWidth
    | NodeType::Illustration
    | NodeType::IllustrationBlock
    | NodeType::Recipes
    | NodeType::MaxWidth
    | NodeType::Solution
    | NodeType::Hint
    | NodeType::Other(_) => None,
  }
}

/// Heading level encoded in a tag such as `h2`.
///
/// The leading digits after the `h` are read as the level. A tag whose
/// suffix has no leading digits (a bare `h`) yields `0`, which downstream
/// navigation already treats as unindented.
#[must_use]
pub fn heading_depth(tag: &str) -> u8 {
  let suffix = tag.strip_prefix('h').unwrap_or(tag);
  let end = suffix
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(suffix.len());
  suffix[..end].parse().unwrap_or_else(|_| {
    warn!("Heading tag <{tag}> has no numeric level, using depth 0");
    0
  })
}

fn anchor(element: &Element, prop: &str) -> String {
  let target = element.prop_str(prop).unwrap_or_else(|| {
    warn!("<{}> without a {prop} prop, linking to page top", element.kind);
    ""
  });
  format!("#{target}")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn heading(tag: &str, id: &str, text: &str) -> ContentNode {
    Element::new(tag).with_prop("id", id).with_child(text).into()
  }

  #[test]
  fn test_heading_depth() {
    assert_eq!(heading_depth("h1"), 1);
    assert_eq!(heading_depth("h3"), 3);
    assert_eq!(heading_depth("h"), 0);
    assert_eq!(heading_depth("h2x"), 2);
  }

  #[test]
  fn test_no_headers_means_no_overview() {
    let nodes = vec![Element::new("p").with_child("body").into()];
    assert!(table_of_contents(&nodes, DEFAULT_TOC_DEPTH).is_empty());
  }

  #[test]
  fn test_challenges_counted_once() {
    let challenges = Element::new("Challenges")
      .with_child(heading("h3", "c1", "First"))
      .with_child(heading("h3", "c2", "Second"));
    let toc = table_of_contents(&[challenges.into()], DEFAULT_TOC_DEPTH);
    assert_eq!(toc, vec![
      TocEntry::overview(),
      TocEntry::new("#challenges", 2, "Challenges"),
    ]);
  }

  #[test]
  fn test_team_member_and_recap() {
    let nodes: Vec<ContentNode> = vec![
      Element::new("TeamMember")
        .with_prop("name", "Ada Lovelace")
        .with_prop("permalink", "ada-lovelace")
        .into(),
      Element::new("Recap").with_child("summary").into(),
    ];
    let toc = table_of_contents(&nodes, DEFAULT_TOC_DEPTH);
    assert_eq!(toc, vec![
      TocEntry::overview(),
      TocEntry::new("#ada-lovelace", 3, "Ada Lovelace"),
      TocEntry::new("#recap", 2, "Recap"),
    ]);
  }

  #[test]
  fn test_recursion_is_bounded_by_depth() {
    let nested = Element::new("section")
      .with_child(Element::new("div").with_child(heading("h2", "deep", "Deep")));

    let toc = table_of_contents(&[nested.clone().into()], 2);
    assert_eq!(toc, vec![
      TocEntry::overview(),
      TocEntry::new("#deep", 2, "Deep"),
    ]);

    let toc = table_of_contents(&[nested.into()], 1);
    assert!(toc.is_empty());
  }

  #[test]
  fn test_missing_id_links_to_top() {
    let node: ContentNode = Element::new("h2").with_child("Untitled").into();
    let mut out = Vec::new();
    extract_headers(&[node], DEFAULT_TOC_DEPTH, &mut out);
    assert_eq!(out, vec![TocEntry::new("#", 2, "Untitled")]);
  }
}
