//! Challenge blocks.
//!
//! A `Challenges` (or `Recipes`) block lists exercises as flat children:
//! an `h3` naming the challenge, free content, an optional `Hint` and a
//! closing `Solution`. This module groups those children into [`Challenge`]s
//! and provides [`ChallengeNavigator`], the state behind stepping through
//! them.
use std::mem;

use log::debug;
use serde::Serialize;

use crate::{
  error::{PrepareError, PrepareResult},
  node::{ContentNode, Element, NodeType},
};

/// One parsed challenge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Challenge {
  /// Anchor of the challenge's `h3`, if it had one.
  pub id:       Option<String>,
  /// Text of the challenge's `h3`, if it had one.
  pub name:     Option<String>,
  /// 1-based position within the block.
  pub order:    usize,
  pub content:  Vec<ContentNode>,
  pub solution: Element,
  pub hint:     Option<Element>,
}

#[derive(Debug, Default)]
struct PendingChallenge {
  id:      Option<String>,
  name:    Option<String>,
  hint:    Option<Element>,
  content: Vec<ContentNode>,
}

impl PendingChallenge {
  /// Whether anything has been collected since the last solution.
  fn has_content(&self) -> bool {
    self.name.is_some() || self.hint.is_some() || !self.content.is_empty()
  }

  fn finish(self, solution: Element, order: usize) -> Challenge {
    Challenge {
      id: self.id,
      name: self.name,
      order,
      content: self.content,
      solution,
      hint: self.hint,
    }
  }
}

/// Tag used to classify a challenge child. MDX tags the original component
/// name in `props.mdxType`; the node type is used when it is absent.
fn mdx_type(element: &Element) -> NodeType {
  element
    .prop_str("mdxType")
    .map_or_else(|| element.kind.clone(), NodeType::from)
}

/// Group the children of a challenges block into challenges.
///
/// Content after the last `Solution` does not belong to any challenge and is
/// dropped.
#[must_use]
pub fn parse_challenges(children: &[ContentNode]) -> Vec<Challenge> {
  let mut challenges = Vec::new();
  let mut pending = PendingChallenge::default();

  for node in children {
    let element = match node {
      ContentNode::Empty | ContentNode::Bool(_) => continue,
      ContentNode::Text(_) | ContentNode::Number(_) => {
        pending.content.push(node.clone());
        continue;
      },
      ContentNode::Element(element) => element,
    };

    match mdx_type(element) {
      NodeType::Solution => {
        let order = challenges.len() + 1;
        challenges.push(mem::take(&mut pending).finish(element.clone(), order));
      },
      NodeType::Hint => pending.hint = Some(element.clone()),
      NodeType::Heading(tag) if tag == "h3" => {
        pending.name = Some(element.text_content());
        pending.id = element.id().map(str::to_owned);
      },
      _ => pending.content.push(node.clone()),
    }
  }

  if pending.has_content() {
    debug!(
      "Dropping trailing challenge with no solution ({} node(s){}{})",
      pending.content.len(),
      if pending.name.is_some() { ", a title" } else { "" },
      if pending.hint.is_some() { ", a hint" } else { "" },
    );
  }

  challenges
}

/// Title of a challenges block without a `titleText` prop.
pub const DEFAULT_CHALLENGES_TITLE: &str = "Prueba algunos desafíos";

/// Title of a recipes block without a `titleText` prop.
pub const DEFAULT_RECIPES_TITLE: &str = "Prueba algunos ejemplos";

/// A parsed `Challenges` or `Recipes` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengesBlock {
  pub is_recipes: bool,
  pub title_text: String,
  pub title_id:   String,
  pub challenges: Vec<Challenge>,
}

impl ChallengesBlock {
  /// Parse a block element. Returns `None` for elements that are not
  /// challenge blocks.
  #[must_use]
  pub fn from_element(element: &Element) -> Option<Self> {
    let is_recipes = match element.kind {
      NodeType::Challenges => element.prop_flag("isRecipes"),
      NodeType::Recipes => true,
      _ => return None,
    };

    let (default_text, default_id) = if is_recipes {
      (DEFAULT_RECIPES_TITLE, "examples")
    } else {
      (DEFAULT_CHALLENGES_TITLE, "challenges")
    };

    Some(Self {
      is_recipes,
      title_text: element
        .prop_str("titleText")
        .unwrap_or(default_text)
        .to_owned(),
      title_id: element.prop_str("titleId").unwrap_or(default_id).to_owned(),
      challenges: parse_challenges(&element.children),
    })
  }

  /// Heading level of the block title: `h4` for recipes, `h2` otherwise.
  #[must_use]
  pub const fn heading_level(&self) -> u8 {
    if self.is_recipes { 4 } else { 2 }
  }

  /// Whether the challenge switcher is shown.
  #[must_use]
  pub fn shows_navigation(&self) -> bool {
    self.challenges.len() > 1
  }

  #[must_use]
  pub fn navigator(&self) -> ChallengeNavigator<'_> {
    ChallengeNavigator::new(&self.challenges)
  }
}

/// Find every challenge block in a tree, depth first.
#[must_use]
pub fn find_challenge_blocks(nodes: &[ContentNode]) -> Vec<ChallengesBlock> {
  let mut blocks = Vec::new();
  collect_blocks(nodes, &mut blocks);
  blocks
}

fn collect_blocks(nodes: &[ContentNode], out: &mut Vec<ChallengesBlock>) {
  for element in nodes.iter().filter_map(ContentNode::as_element) {
    if let Some(block) = ChallengesBlock::from_element(element) {
      out.push(block);
    } else {
      collect_blocks(&element.children, out);
    }
  }
}

/// Stepping state over a block's challenges.
///
/// Moving to another challenge hides its hint and solution again.
#[derive(Debug, Clone)]
pub struct ChallengeNavigator<'a> {
  challenges:    &'a [Challenge],
  active_index:  usize,
  show_hint:     bool,
  show_solution: bool,
  scroll_queued: bool,
}

impl<'a> ChallengeNavigator<'a> {
  #[must_use]
  pub const fn new(challenges: &'a [Challenge]) -> Self {
    Self {
      challenges,
      active_index: 0,
      show_hint: false,
      show_solution: false,
      scroll_queued: false,
    }
  }

  #[must_use]
  pub const fn active_index(&self) -> usize {
    self.active_index
  }

  #[must_use]
  pub const fn total(&self) -> usize {
    self.challenges.len()
  }

  /// The active challenge; `None` only for an empty block.
  #[must_use]
  pub fn current(&self) -> Option<&'a Challenge> {
    self.challenges.get(self.active_index)
  }

  #[must_use]
  pub const fn has_next(&self) -> bool {
    self.active_index + 1 < self.challenges.len()
  }

  #[must_use]
  pub fn next_challenge(&self) -> Option<&'a Challenge> {
    self.challenges.get(self.active_index + 1)
  }

  /// Jump to the challenge at `index`.
  ///
  /// # Errors
  ///
  /// Returns [`PrepareError::ChallengeOutOfRange`] if there is no challenge
  /// at `index`.
  pub fn select(&mut self, index: usize) -> PrepareResult<()> {
    if index >= self.total() {
      return Err(PrepareError::ChallengeOutOfRange {
        index,
        total: self.total(),
      });
    }
    self.active_index = index;
    self.reset_reveals();
    Ok(())
  }

  /// Move to the next challenge and queue a scroll back to the block title.
  /// Returns `false` if already on the last challenge.
  pub fn advance(&mut self) -> bool {
    if !self.has_next() {
      return false;
    }
    self.active_index += 1;
    self.reset_reveals();
    self.scroll_queued = true;
    true
  }

  /// Toggle the hint. A challenge without a hint stays hidden.
  pub fn toggle_hint(&mut self) -> bool {
    let has_hint = self.current().is_some_and(|c| c.hint.is_some());
    self.show_hint = has_hint && !self.show_hint;
    self.show_hint
  }

  pub fn toggle_solution(&mut self) -> bool {
    self.show_solution = self.current().is_some() && !self.show_solution;
    self.show_solution
  }

  #[must_use]
  pub const fn hint_visible(&self) -> bool {
    self.show_hint
  }

  #[must_use]
  pub const fn solution_visible(&self) -> bool {
    self.show_solution
  }

  /// Returns whether a scroll is pending and clears it.
  pub const fn take_queued_scroll(&mut self) -> bool {
    mem::replace(&mut self.scroll_queued, false)
  }

  const fn reset_reveals(&mut self) {
    self.show_hint = false;
    self.show_solution = false;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_pending_title_or_hint_counts_as_content() {
    let mut pending = PendingChallenge::default();
    assert!(!pending.has_content());

    pending.name = Some("Unfinished".to_owned());
    assert!(pending.has_content());

    let hint_only = PendingChallenge {
      hint: Some(Element::new("Hint")),
      ..PendingChallenge::default()
    };
    assert!(hint_only.has_content());
  }

  #[test]
  fn test_trailing_title_and_hint_are_dropped() {
    let children: Vec<ContentNode> = vec![
      Element::new("Solution").into(),
      Element::new("h3").with_prop("id", "late").into(),
      Element::new("Hint").into(),
    ];
    let challenges = parse_challenges(&children);
    assert_eq!(challenges.len(), 1);
    assert_eq!(challenges[0].name, None);
    assert!(challenges[0].hint.is_none());
  }
}
