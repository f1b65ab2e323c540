//! Content node model.
//!
//! Nodes mirror what an MDX parser hands to the page layer: primitives
//! (strings, numbers), empty slots (`null`, booleans) and elements carrying a
//! `type` tag, a `props` object and ordered children. The JSON shape is
//!
//! ```json
//! {"type": "h2", "key": "intro", "props": {"id": "intro", "children": ["Intro"]}}
//! ```
//!
//! `props.children` may hold a single node or an array. Nested arrays are
//! flattened in order, the same way MDX children are iterated. Decoding
//! remembers where `children` was written and in which shape, so an element
//! that is passed through encodes back to the same JSON.
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{PrepareError, PrepareResult};

/// Tag of an element node.
///
/// The tags the preparer and the challenges parser care about are closed
/// variants; everything else is carried through as [`NodeType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
  /// `h`, `h1`, `h2` or `h3`. The raw tag is kept because the TOC depth is
  /// derived from its suffix.
  Heading(String),
  Challenges,
  Recap,
  TeamMember,
  Sandpack,
  FullWidth,
  Illustration,
  IllustrationBlock,
  Recipes,
  MaxWidth,
  Solution,
  Hint,
  Other(String),
}

impl NodeType {
  /// Returns the tag as it appears in the source tree.
  #[must_use]
  pub fn as_str(&self) -> &str {
    match self {
      Self::Heading(tag) | Self::Other(tag) => tag,
      Self::Challenges => "Challenges",
      Self::Recap => "Recap",
      Self::TeamMember => "TeamMember",
      Self::Sandpack => "Sandpack",
      Self::FullWidth => "FullWidth",
      Self::Illustration => "Illustration",
      Self::IllustrationBlock => "IllustrationBlock",
      Self::Recipes => "Recipes",
      Self::MaxWidth => "MaxWidth",
      Self::Solution => "Solution",
      Self::Hint => "Hint",
    }
  }

  /// Whether nodes of this type are rendered edge to edge instead of inside
  /// a `MaxWidth` column.
  #[must_use]
  pub const fn is_full_width(&self) -> bool {
    match self {
      Self::Sandpack
      | Self::FullWidth
      | Self::Illustration
      | Self::IllustrationBlock
      | Self::Challenges
      | Self::Recipes => true,
      Self::Heading(_)
      | Self::Recap
      | Self::TeamMember
      | Self::MaxWidth
      | Self::Solution
      | Self::Hint
      | Self::Other(_) => false,
    }
  }

  /// Whether nodes of this type produce a table of contents entry.
  #[must_use]
  pub const fn is_header(&self) -> bool {
    match self {
      Self::Heading(_) | Self::Challenges | Self::Recap | Self::TeamMember => {
        true
      },
      Self::Sandpack
      | Self::FullWidth
      | Self::Illustration
      | Self::IllustrationBlock
      | Self::Recipes
      | Self::MaxWidth
      | Self::Solution
      | Self::Hint
      | Self::Other(_) => false,
    }
  }
}

impl From<&str> for NodeType {
  fn from(tag: &str) -> Self {
    match tag {
      "h" | "h1" | "h2" | "h3" => Self::Heading(tag.to_owned()),
      "Challenges" => Self::Challenges,
      "Recap" => Self::Recap,
      "TeamMember" => Self::TeamMember,
      "Sandpack" => Self::Sandpack,
      "FullWidth" => Self::FullWidth,
      "Illustration" => Self::Illustration,
      "IllustrationBlock" => Self::IllustrationBlock,
      "Recipes" => Self::Recipes,
      "MaxWidth" => Self::MaxWidth,
      "Solution" => Self::Solution,
      "Hint" => Self::Hint,
      other => Self::Other(other.to_owned()),
    }
  }
}

impl fmt::Display for NodeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How an element's `children` field was written in the source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildrenLayout {
  /// No `children` field. Encoding omits it while there are no children and
  /// writes a list otherwise.
  #[default]
  Derived,
  /// A single node rather than a list. `on_node` is set when the field sat on
  /// the node itself instead of inside `props`.
  Single { on_node: bool },
  /// A list, possibly empty.
  List { on_node: bool },
}

impl ChildrenLayout {
  const fn on_node(self) -> bool {
    match self {
      Self::Derived => false,
      Self::Single { on_node } | Self::List { on_node } => on_node,
    }
  }
}

/// An element node: a tag, its props and its children.
///
/// `props` never contains `children`; those are decoded into
/// [`Element::children`] and their source shape into
/// [`Element::children_layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
  pub kind:            NodeType,
  pub key:             Option<String>,
  pub props:           Map<String, Value>,
  pub children:        Vec<ContentNode>,
  pub children_layout: ChildrenLayout,
}

impl Element {
  /// Create an element with no props and no children.
  #[must_use]
  pub fn new(kind: impl Into<NodeType>) -> Self {
    Self {
      kind:            kind.into(),
      key:             None,
      props:           Map::new(),
      children:        Vec::new(),
      children_layout: ChildrenLayout::Derived,
    }
  }

  /// Set a prop, replacing any previous value.
  #[must_use]
  pub fn with_prop(mut self, name: &str, value: impl Into<Value>) -> Self {
    self.props.insert(name.to_owned(), value.into());
    self
  }

  /// Append a child node.
  #[must_use]
  pub fn with_child(mut self, child: impl Into<ContentNode>) -> Self {
    self.children.push(child.into());
    self
  }

  #[must_use]
  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = Some(key.into());
    self
  }

  /// String value of a prop, if present and a string.
  #[must_use]
  pub fn prop_str(&self, name: &str) -> Option<&str> {
    self.props.get(name).and_then(Value::as_str)
  }

  /// Boolean value of a prop. Missing or non-boolean props read as `false`.
  #[must_use]
  pub fn prop_flag(&self, name: &str) -> bool {
    self.props.get(name).and_then(Value::as_bool).unwrap_or(false)
  }

  #[must_use]
  pub fn id(&self) -> Option<&str> {
    self.prop_str("id")
  }

  /// Concatenated text of all descendant primitives, depth first.
  #[must_use]
  pub fn text_content(&self) -> String {
    let mut text = String::new();
    collect_text(&self.children, &mut text);
    text
  }

  /// JSON form of this element, `children` written back where and how it
  /// was read.
  #[must_use]
  pub fn to_value(&self) -> Value {
    let mut props = self.props.clone();
    let children = self.children_value();
    let on_node = self.children_layout.on_node();
    if !on_node && let Some(ref children) = children {
      props.insert("children".to_owned(), children.clone());
    }

    let mut object = Map::new();
    object.insert("type".to_owned(), Value::String(self.kind.to_string()));
    if let Some(ref key) = self.key {
      object.insert("key".to_owned(), Value::String(key.clone()));
    }
    object.insert("props".to_owned(), Value::Object(props));
    if on_node && let Some(children) = children {
      object.insert("children".to_owned(), children);
    }
    Value::Object(object)
  }

  fn children_value(&self) -> Option<Value> {
    match (self.children_layout, self.children.as_slice()) {
      (ChildrenLayout::Derived, []) => None,
      (ChildrenLayout::Single { .. }, [only]) => Some(only.to_value()),
      (_, children) => {
        Some(Value::Array(children.iter().map(ContentNode::to_value).collect()))
      },
    }
  }
}

impl Serialize for Element {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.to_value().serialize(serializer)
  }
}

fn collect_text(nodes: &[ContentNode], out: &mut String) {
  for node in nodes {
    match node {
      ContentNode::Empty | ContentNode::Bool(_) => {},
      ContentNode::Text(text) => out.push_str(text),
      ContentNode::Number(number) => out.push_str(&number.to_string()),
      ContentNode::Element(element) => collect_text(&element.children, out),
    }
  }
}

/// A single node of a content tree.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "Value")]
pub enum ContentNode {
  /// `null`. Renders nothing and is skipped by every pass.
  #[default]
  Empty,
  /// A boolean, left behind by conditional rendering. Skipped like
  /// [`ContentNode::Empty`].
  Bool(bool),
  Text(String),
  /// A number primitive, kept as written.
  Number(Number),
  Element(Element),
}

impl ContentNode {
  #[must_use]
  pub fn text(text: impl Into<String>) -> Self {
    Self::Text(text.into())
  }

  #[must_use]
  pub const fn as_element(&self) -> Option<&Element> {
    match self {
      Self::Element(element) => Some(element),
      Self::Empty | Self::Bool(_) | Self::Text(_) | Self::Number(_) => None,
    }
  }

  /// Whether this node renders nothing (`null` or a boolean).
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    matches!(self, Self::Empty | Self::Bool(_))
  }

  #[must_use]
  pub fn text_content(&self) -> String {
    match self {
      Self::Empty | Self::Bool(_) => String::new(),
      Self::Text(text) => text.clone(),
      Self::Number(number) => number.to_string(),
      Self::Element(element) => element.text_content(),
    }
  }

  #[must_use]
  pub fn to_value(&self) -> Value {
    match self {
      Self::Empty => Value::Null,
      Self::Bool(flag) => Value::Bool(*flag),
      Self::Text(text) => Value::String(text.clone()),
      Self::Number(number) => Value::Number(number.clone()),
      Self::Element(element) => element.to_value(),
    }
  }
}

impl From<Element> for ContentNode {
  fn from(element: Element) -> Self {
    Self::Element(element)
  }
}

impl From<&str> for ContentNode {
  fn from(text: &str) -> Self {
    Self::Text(text.to_owned())
  }
}

impl From<String> for ContentNode {
  fn from(text: String) -> Self {
    Self::Text(text)
  }
}

impl Serialize for ContentNode {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.to_value().serialize(serializer)
  }
}

impl TryFrom<Value> for ContentNode {
  type Error = PrepareError;

  fn try_from(value: Value) -> PrepareResult<Self> {
    match value {
      Value::Null => Ok(Self::Empty),
      Value::Bool(flag) => Ok(Self::Bool(flag)),
      Value::Number(number) => Ok(Self::Number(number)),
      Value::String(text) => Ok(Self::Text(text)),
      Value::Array(_) => {
        Err(PrepareError::InvalidNode(
          "found a sequence where a single node was expected".to_owned(),
        ))
      },
      Value::Object(object) => element_from_object(object).map(Self::Element),
    }
  }
}

/// Decode a JSON value into a flat node sequence.
///
/// Arrays at any nesting level are flattened in order; any other value
/// becomes a single node.
///
/// # Errors
///
/// Returns [`PrepareError::InvalidNode`] if an object has no string `type`
/// or a non-object `props`.
pub fn nodes_from_value(value: Value) -> PrepareResult<Vec<ContentNode>> {
  let mut nodes = Vec::new();
  push_flattened(value, &mut nodes)?;
  Ok(nodes)
}

/// Parse a JSON document into a flat node sequence.
///
/// # Errors
///
/// Returns an error if the input is not valid JSON or does not describe a
/// content tree.
pub fn nodes_from_json(input: &str) -> PrepareResult<Vec<ContentNode>> {
  let value: Value = serde_json::from_str(input)?;
  nodes_from_value(value)
}

fn push_flattened(
  value: Value,
  out: &mut Vec<ContentNode>,
) -> PrepareResult<()> {
  match value {
    Value::Array(items) => {
      for item in items {
        push_flattened(item, out)?;
      }
    },
    other => out.push(ContentNode::try_from(other)?),
  }
  Ok(())
}

fn element_from_object(mut object: Map<String, Value>) -> PrepareResult<Element> {
  let kind = match object.shift_remove("type") {
    Some(Value::String(tag)) => NodeType::from(tag.as_str()),
    Some(other) => {
      return Err(PrepareError::InvalidNode(format!(
        "node type must be a string, found {other}"
      )));
    },
    None => {
      return Err(PrepareError::InvalidNode(
        "object node is missing its type".to_owned(),
      ));
    },
  };

  let key = match object.shift_remove("key") {
    Some(Value::String(key)) => Some(key),
    Some(Value::Number(key)) => Some(key.to_string()),
    _ => None,
  };

  let mut props = match object.shift_remove("props") {
    Some(Value::Object(props)) => props,
    Some(Value::Null) | None => Map::new(),
    Some(other) => {
      return Err(PrepareError::InvalidNode(format!(
        "props of <{kind}> must be an object, found {other}"
      )));
    },
  };

  // Children normally live in props; a bare `children` field on the node
  // itself is accepted too.
  let (children, on_node) = match props.shift_remove("children") {
    Some(children) => (Some(children), false),
    None => (object.shift_remove("children"), true),
  };

  let children_layout = match children {
    None => ChildrenLayout::Derived,
    Some(Value::Array(_)) => ChildrenLayout::List { on_node },
    Some(_) => ChildrenLayout::Single { on_node },
  };

  Ok(Element {
    kind,
    key,
    props,
    children: children
      .map(nodes_from_value)
      .transpose()?
      .unwrap_or_default(),
    children_layout,
  })
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::panic, reason = "Fine in tests")]

  use serde_json::json;

  use super::*;

  #[test]
  fn test_tag_classification() {
    assert!(NodeType::from("Sandpack").is_full_width());
    assert!(NodeType::from("Challenges").is_full_width());
    assert!(NodeType::from("Challenges").is_header());
    assert!(!NodeType::from("Recap").is_full_width());
    assert!(NodeType::from("h2").is_header());
    assert!(!NodeType::from("h4").is_header());
    assert!(!NodeType::from("p").is_header());
    assert_eq!(NodeType::from("h4"), NodeType::Other("h4".to_owned()));
  }

  #[test]
  fn test_decode_element_with_single_child() {
    let node = ContentNode::try_from(
      json!({"type": "h2", "props": {"id": "intro", "children": "Intro"}}),
    )
    .unwrap();

    let element = node.as_element().unwrap();
    assert_eq!(element.kind, NodeType::Heading("h2".to_owned()));
    assert_eq!(element.id(), Some("intro"));
    assert_eq!(element.children, vec![ContentNode::text("Intro")]);
    assert_eq!(element.children_layout, ChildrenLayout::Single {
      on_node: false,
    });
    assert!(!element.props.contains_key("children"));
  }

  #[test]
  fn test_decode_flattens_nested_children() {
    let nodes = nodes_from_value(json!([
      "a",
      ["b", null, ["c"]],
      1,
      true
    ]))
    .unwrap();

    assert_eq!(nodes, vec![
      ContentNode::text("a"),
      ContentNode::text("b"),
      ContentNode::Empty,
      ContentNode::text("c"),
      ContentNode::Number(1.into()),
      ContentNode::Bool(true),
    ]);
    assert!(nodes[2].is_empty() && nodes[5].is_empty());
    assert_eq!(nodes[4].text_content(), "1");
  }

  #[test]
  fn test_decode_rejects_untyped_object() {
    let err = ContentNode::try_from(json!({"props": {}})).unwrap_err();
    assert!(matches!(err, PrepareError::InvalidNode(_)));
  }

  #[test]
  fn test_decode_accepts_node_level_children() {
    let node = ContentNode::try_from(
      json!({"type": "section", "children": [{"type": "p", "props": {}}]}),
    )
    .unwrap();
    assert_eq!(node.as_element().unwrap().children.len(), 1);
    assert_eq!(
      node.to_value(),
      json!({"type": "section", "props": {}, "children": [{"type": "p", "props": {}}]})
    );
  }

  #[test]
  fn test_decoded_nodes_encode_back_unchanged() {
    let source = json!([
      {"type": "Sandpack", "props": {"children": null}},
      42,
      -0.5,
      false,
      {"type": "p", "props": {"children": []}},
      {"type": "h2", "key": 3, "props": {"id": "a", "children": "A"}},
      {"type": "Hint", "props": {"children": {"type": "code", "props": {}}}},
      {"type": "ul", "props": {"className": "list", "children": [
        {"type": "li", "props": {"children": ["one"]}}
      ]}},
      {"type": "br", "props": {}}
    ]);

    let nodes = nodes_from_value(source.clone()).unwrap();
    let encoded: Vec<Value> = nodes.iter().map(ContentNode::to_value).collect();

    // Numeric keys are read as strings; everything else is untouched.
    let mut expected = source.as_array().unwrap().clone();
    expected[5]["key"] = json!("3");
    assert_eq!(encoded, expected);
  }

  #[test]
  fn test_single_child_layout_falls_back_to_list_when_children_grow() {
    let node = ContentNode::try_from(
      json!({"type": "p", "props": {"children": "one"}}),
    )
    .unwrap();
    let ContentNode::Element(element) = node else {
      panic!("expected an element");
    };

    let grown = element.with_child("two");
    assert_eq!(
      grown.to_value(),
      json!({"type": "p", "props": {"children": ["one", "two"]}})
    );
  }

  #[test]
  fn test_text_content_is_depth_first() {
    let element = Element::new("h2")
      .with_child("Use ")
      .with_child(Element::new("code").with_child("useState"))
      .with_child(ContentNode::Empty)
      .with_child(" today");
    assert_eq!(element.text_content(), "Use useState today");
  }

  #[test]
  fn test_to_value_restores_children_in_props() {
    let element = Element::new("Hint")
      .with_key("k1")
      .with_prop("title", "Stuck?")
      .with_child("Try again");
    assert_eq!(
      element.to_value(),
      json!({
        "type": "Hint",
        "key": "k1",
        "props": {"title": "Stuck?", "children": ["Try again"]}
      })
    );
  }
}
