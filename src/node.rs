use serde_json::Value;

use crate::models::{Node, NodeKind, TypeTag};

/// Build a tree node for one value without recursing into children.
///
/// Structural metadata (`keys` for objects, `len` for arrays) is cached at
/// construction so `has_children` never needs the raw value again. Children
/// stay unmaterialized until the session expands the node; a wide or deep
/// document only ever pays for the subtrees the user actually opens.
///
/// `array_slot` is the element index when the node is an array member.
pub fn build_node(
  path: &str,
  name: &str,
  tag: TypeTag,
  value: &Value,
  parent_path: &str,
  array_slot: Option<usize>,
  preview_max_chars: usize,
) -> Node {
  let (keys, len, has_children) = match (tag, value) {
    (TypeTag::Object, Value::Object(m)) => (
      Some(m.keys().cloned().collect::<Vec<_>>()),
      None,
      !m.is_empty(),
    ),
    (TypeTag::Array, Value::Array(a)) => (None, Some(a.len()), !a.is_empty()),
    // Null and scalars (and a null value mislabeled as a container) carry no
    // structural metadata.
    _ => (None, None, false),
  };

  let scalar = if tag.is_container() {
    None
  } else {
    Some(value.clone())
  };

  Node {
    path: path.to_string(),
    name: name.to_string(),
    kind: tag.into(),
    parent_path: parent_path.to_string(),
    is_array_item: array_slot.is_some(),
    index: array_slot,
    has_children,
    is_leaf: !has_children,
    preview: preview_for(value, preview_max_chars),
    keys,
    len,
    value: scalar,
    total_items: None,
  }
}

/// Synthetic terminal marker for a container truncated at the fan-out cap.
/// Never expandable, no underlying value; `total_items` is the true count.
pub(crate) fn build_more_node(parent_path: &str, tag: TypeTag, total_items: usize) -> Node {
  let name = match tag {
    TypeTag::Array => format!("[more… {total_items} items total]"),
    _ => format!("{{more… {total_items} keys total}}"),
  };
  Node {
    path: format!("{parent_path}.more"),
    name: name.clone(),
    kind: NodeKind::More,
    parent_path: parent_path.to_string(),
    is_array_item: false,
    index: None,
    has_children: false,
    is_leaf: true,
    preview: name,
    keys: None,
    len: None,
    value: None,
    total_items: Some(total_items),
  }
}

pub(crate) fn object_child_path(parent: &str, key: &str) -> String {
  format!("{parent}.{key}")
}

pub(crate) fn array_child_path(parent: &str, index: usize) -> String {
  format!("{parent}[{index}]")
}

/// Resolve a dotted/bracketed display path against the document root.
///
/// `root` addresses the document itself; `.key` and `[idx]` segments walk
/// down from there. Returns `None` when any segment is missing or lands on
/// a value of the wrong shape.
pub(crate) fn resolve_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
  let mut rest = path.strip_prefix("root")?;
  let mut cur = doc;
  while !rest.is_empty() {
    if let Some(r) = rest.strip_prefix('[') {
      let end = r.find(']')?;
      let idx: usize = r[..end].parse().ok()?;
      cur = cur.as_array()?.get(idx)?;
      rest = &r[end + 1..];
    } else if let Some(r) = rest.strip_prefix('.') {
      let end = r.find(|c| c == '.' || c == '[').unwrap_or(r.len());
      cur = cur.as_object()?.get(&r[..end])?;
      rest = &r[end..];
    } else {
      return None;
    }
  }
  Some(cur)
}

fn preview_for(value: &Value, max_chars: usize) -> String {
  match value {
    Value::Object(m) => {
      if m.is_empty() {
        "{} 0 keys".to_string()
      } else {
        format!("{{…}} {} keys", m.len())
      }
    }
    Value::Array(a) => {
      if a.is_empty() {
        "[] 0 items".to_string()
      } else {
        format!("[…] {} items", a.len())
      }
    }
    Value::String(s) => truncate_chars(s, max_chars),
    Value::Number(n) => n.to_string(),
    Value::Bool(b) => b.to_string(),
    Value::Null => "null".to_string(),
  }
}

pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
  if max == 0 {
    return String::new();
  }
  let mut out = String::new();
  for (i, ch) in s.chars().enumerate() {
    if i >= max {
      out.push('…');
      break;
    }
    out.push(ch);
  }
  out
}
