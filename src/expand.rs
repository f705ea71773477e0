use std::{collections::HashMap, sync::Arc, thread, time::Duration};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::warn;

use crate::{
  classify::classify,
  engine::{CoreError, CoreOptions, ParsedTree},
  models::{Node, TypeTag},
  node::{array_child_path, build_more_node, build_node, object_child_path, resolve_path},
};

/// One successfully parsed document and its lazily materialized tree.
///
/// The session owns the decoded document plus an expansion cache keyed by
/// node path; `Node` values themselves stay immutable. The whole session is
/// discarded and rebuilt on the next parse — there is no incremental update.
#[derive(Debug)]
pub struct TreeSession {
  id: String,
  generation: u64,
  root: Node,
  doc: Arc<Value>,
  fan_out_cap: usize,
  preview_max_chars: usize,
  expand_delay: Duration,
  cache: Mutex<HashMap<String, Arc<Vec<Node>>>>,
}

impl TreeSession {
  pub(crate) fn new(id: String, generation: u64, parsed: ParsedTree, options: &CoreOptions) -> Self {
    let ParsedTree {
      root,
      root_children,
      doc,
    } = parsed;
    // Root arrives pre-expanded so the initial view has something to show;
    // everything below stays lazy.
    let mut cache = HashMap::new();
    cache.insert(root.path.clone(), Arc::new(root_children));
    Self {
      id,
      generation,
      root,
      doc,
      fan_out_cap: options.fan_out_cap,
      preview_max_chars: options.preview_max_chars,
      expand_delay: Duration::from_millis(options.expand_delay_ms),
      cache: Mutex::new(cache),
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// Monotonic parse generation; see `ExplorerEngine::is_current`.
  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn root(&self) -> &Node {
    &self.root
  }

  /// Materialize the direct children of the node at `path`.
  ///
  /// Idempotent: the first call computes and caches the sequence, repeat
  /// calls return the cached sequence unchanged. Child order is always
  /// source order (array index order, object key insertion order). Never
  /// fails — a path that does not resolve, or a leaf, yields an empty
  /// sequence so one bad subtree cannot take down the surrounding view.
  pub fn expand(&self, path: &str) -> Arc<Vec<Node>> {
    if let Some(cached) = self.cache.lock().get(path) {
      return cached.clone();
    }
    if !self.expand_delay.is_zero() {
      // Yields control back to the caller's render loop between expansions.
      thread::sleep(self.expand_delay);
    }
    let children = match resolve_path(&self.doc, path) {
      Some(value) => expand_value(value, path, self.fan_out_cap, self.preview_max_chars),
      None => {
        warn!(path, "expansion failed: path did not resolve");
        Vec::new()
      }
    };
    let children = Arc::new(children);
    self
      .cache
      .lock()
      .entry(path.to_string())
      .or_insert_with(|| children.clone())
      .clone()
  }

  /// The decoded value at `path`, or `None` if the path does not resolve.
  pub fn value_at(&self, path: &str) -> Option<&Value> {
    resolve_path(&self.doc, path)
  }

  /// Rows for table projection: the array value at `path`, if it is one.
  pub fn rows_at(&self, path: &str) -> Option<&[Value]> {
    resolve_path(&self.doc, path)?.as_array().map(|a| a.as_slice())
  }

  /// Like `rows_at`, but strict: a path that does not resolve to an array
  /// is an error the caller can surface next to the table widget.
  pub fn require_rows(&self, path: &str) -> Result<&[Value], CoreError> {
    self.rows_at(path).ok_or_else(|| CoreError::ExpansionFailure {
      path: path.to_string(),
    })
  }
}

/// Materialize the direct children of `value`, capped at `cap` members with
/// one trailing more-node when the container is larger than the cap.
///
/// Shared by lazy expansion and the coordinator's eager root step so both
/// produce byte-identical child sequences.
pub(crate) fn expand_value(
  value: &Value,
  path: &str,
  cap: usize,
  preview_max_chars: usize,
) -> Vec<Node> {
  match value {
    Value::Array(items) => {
      let mut children: Vec<Node> = items
        .iter()
        .take(cap)
        .enumerate()
        .map(|(idx, item)| {
          build_node(
            &array_child_path(path, idx),
            &format!("[{idx}]"),
            classify(item),
            item,
            path,
            Some(idx),
            preview_max_chars,
          )
        })
        .collect();
      if items.len() > cap {
        children.push(build_more_node(path, TypeTag::Array, items.len()));
      }
      children
    }
    Value::Object(map) => {
      let mut children: Vec<Node> = map
        .iter()
        .take(cap)
        .map(|(key, val)| {
          build_node(
            &object_child_path(path, key),
            key,
            classify(val),
            val,
            path,
            None,
            preview_max_chars,
          )
        })
        .collect();
      if map.len() > cap {
        children.push(build_more_node(path, TypeTag::Object, map.len()));
      }
      children
    }
    _ => Vec::new(),
  }
}
