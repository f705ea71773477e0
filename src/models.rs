use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed type tag for a decoded JSON value.
///
/// Produced once at classification time and carried on every node, so call
/// sites never re-derive a value's shape from the raw value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
  Object,
  Array,
  String,
  Number,
  Boolean,
  Null,
}

impl TypeTag {
  pub fn is_container(self) -> bool {
    matches!(self, TypeTag::Object | TypeTag::Array)
  }
}

/// Node kind as seen by tree widgets: every `TypeTag` plus the synthetic
/// `More` marker appended when a container is truncated at the fan-out cap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
  Object,
  Array,
  String,
  Number,
  Boolean,
  Null,
  More,
}

impl From<TypeTag> for NodeKind {
  fn from(tag: TypeTag) -> Self {
    match tag {
      TypeTag::Object => NodeKind::Object,
      TypeTag::Array => NodeKind::Array,
      TypeTag::String => NodeKind::String,
      TypeTag::Number => NodeKind::Number,
      TypeTag::Boolean => NodeKind::Boolean,
      TypeTag::Null => NodeKind::Null,
    }
  }
}

/// An addressable unit of the materialized tree.
///
/// Nodes are immutable values. Expansion results live in the session cache
/// keyed by `path`, never on the node, and `parent_path` is a non-owning
/// address: ancestry is resolved by path lookup, not pointer traversal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
  /// Dotted/bracketed address from the root, e.g. `root.users[3].name`.
  /// The root itself is the literal address `root`.
  pub path: String,
  /// Display label: object key, `[index]`, or the root marker.
  pub name: String,
  pub kind: NodeKind,
  /// Address of the owning node; empty for root.
  pub parent_path: String,
  pub is_array_item: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub index: Option<usize>,
  pub has_children: bool,
  pub is_leaf: bool,
  /// Short display string for leaves and container headers.
  pub preview: String,
  /// Object key sequence in insertion order, cached at construction.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub keys: Option<Vec<String>>,
  /// Array length, cached at construction.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub len: Option<usize>,
  /// Scalar payload. Container values are resolved by `path` against the
  /// session document instead of being cloned onto every node.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<Value>,
  /// More-node only: the container's true member count.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub total_items: Option<usize>,
}

/// The set of field paths the user has chosen to materialize as table
/// columns. Independent of the tree; insertion order is column order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldSelection {
  fields: Vec<String>,
}

impl FieldSelection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Flip the inclusion flag for `path`; returns the new state.
  pub fn toggle(&mut self, path: &str) -> bool {
    if self.contains(path) {
      self.deselect(path);
      false
    } else {
      self.fields.push(path.to_string());
      true
    }
  }

  pub fn select(&mut self, path: &str) {
    if !self.contains(path) {
      self.fields.push(path.to_string());
    }
  }

  pub fn deselect(&mut self, path: &str) {
    self.fields.retain(|f| f != path);
  }

  pub fn contains(&self, path: &str) -> bool {
    self.fields.iter().any(|f| f == path)
  }

  pub fn fields(&self) -> &[String] {
    &self.fields
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }
}
