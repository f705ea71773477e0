use std::{
  path::Path,
  sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
  },
};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  classify::classify,
  expand::{expand_value, TreeSession},
  models::Node,
  node::build_node,
  worker::ParseWorker,
};

#[derive(Debug, Error)]
pub enum CoreError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("input is empty or whitespace only")]
  EmptyInput,
  #[error("input is not valid JSON: {message}")]
  Unparseable { message: String },
  #[error("could not materialize subtree at {path}")]
  ExpansionFailure { path: String },
  #[error("no parse worker attached")]
  WorkerUnavailable,
  #[error("parse worker failed: {0}")]
  WorkerFailure(String),
}

#[derive(Debug, Clone)]
pub struct CoreOptions {
  /// Maximum direct children materialized per container.
  pub fan_out_cap: usize,
  /// Inputs longer than this (in chars) prefer the background worker.
  pub worker_threshold_chars: usize,
  /// Artificial delay before each lazy expansion step, in milliseconds.
  /// 0 disables it.
  pub expand_delay_ms: u64,
  /// Char cap for scalar previews.
  pub preview_max_chars: usize,
}

impl Default for CoreOptions {
  fn default() -> Self {
    Self {
      fan_out_cap: 100,
      worker_threshold_chars: 50_000,
      expand_delay_ms: 0,
      preview_max_chars: 120,
    }
  }
}

/// Result of one parse run: the root node, its eagerly expanded first level,
/// and the decoded document. The worker path and the in-thread path both
/// produce exactly this shape for the same input.
#[derive(Debug)]
pub(crate) struct ParsedTree {
  pub root: Node,
  pub root_children: Vec<Node>,
  pub doc: Arc<Value>,
}

/// Owns the end-to-end parse request: input validation, strict decoding with
/// brace recovery, root materialization, and main-thread vs worker routing.
pub struct ExplorerEngine {
  options: CoreOptions,
  worker: Option<ParseWorker>,
  generation: AtomicU64,
}

impl ExplorerEngine {
  pub fn new(options: CoreOptions) -> Self {
    Self {
      options,
      worker: None,
      generation: AtomicU64::new(0),
    }
  }

  /// Attach a background parse worker; inputs over the size threshold are
  /// routed to it. The worker's lifecycle is owned by the caller side that
  /// spawned it, not by the engine.
  pub fn with_worker(mut self, worker: ParseWorker) -> Self {
    self.worker = Some(worker);
    self
  }

  pub fn options(&self) -> &CoreOptions {
    &self.options
  }

  /// Parse raw text into a fresh tree session.
  ///
  /// Large inputs prefer the attached worker; a missing or failing worker
  /// downgrades to in-thread execution with a log line, never a user-facing
  /// error. Routing is a performance decision only — both paths yield
  /// structurally identical trees.
  pub fn parse(&self, raw: &str) -> Result<TreeSession, CoreError> {
    if raw.trim().is_empty() {
      return Err(CoreError::EmptyInput);
    }
    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

    let parsed = if raw.len() > self.options.worker_threshold_chars {
      match &self.worker {
        Some(worker) => match worker.parse(raw) {
          Ok(tree) => tree,
          Err(e) => {
            warn!(error = %e, "parse worker failed, falling back to in-thread parse");
            parse_tree(raw, &self.options)?
          }
        },
        None => {
          warn!(
            chars = raw.len(),
            "large input but no worker attached, parsing in-thread"
          );
          parse_tree(raw, &self.options)?
        }
      }
    } else {
      parse_tree(raw, &self.options)?
    };

    Ok(TreeSession::new(
      Uuid::new_v4().to_string(),
      generation,
      parsed,
      &self.options,
    ))
  }

  /// Read a file to text and parse it (the file-upload entry point).
  pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<TreeSession, CoreError> {
    let raw = std::fs::read_to_string(path)?;
    self.parse(&raw)
  }

  /// Whether `session` came from the most recently started parse.
  ///
  /// There is no cancellation: overlapping parses each run to completion,
  /// and callers use this to discard a stale in-flight result instead of
  /// letting it overwrite a fresher one.
  pub fn is_current(&self, session: &TreeSession) -> bool {
    session.generation() == self.generation.load(Ordering::SeqCst)
  }
}

/// Decode `raw` and materialize the root plus exactly one eager level below
/// it. Deeper levels stay lazy.
pub(crate) fn parse_tree(raw: &str, options: &CoreOptions) -> Result<ParsedTree, CoreError> {
  let value = decode_lenient(raw)?;
  let tag = classify(&value);
  let root = build_node("root", "root", tag, &value, "", None, options.preview_max_chars);
  let root_children = expand_value(&value, "root", options.fan_out_cap, options.preview_max_chars);
  Ok(ParsedTree {
    root,
    root_children,
    doc: Arc::new(value),
  })
}

/// Strict decode first; on failure, retry on the span from the first `{` to
/// the last `}`. That recovers JSON embedded in surrounding prose or log
/// lines. The error always carries the strict decoder's message.
fn decode_lenient(raw: &str) -> Result<Value, CoreError> {
  match serde_json::from_str(raw) {
    Ok(v) => Ok(v),
    Err(strict_err) => {
      if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if end > start {
          if let Ok(v) = serde_json::from_str(&raw[start..=end]) {
            debug!(start, end, "strict decode failed, recovered embedded object");
            return Ok(v);
          }
        }
      }
      Err(CoreError::Unparseable {
        message: strict_err.to_string(),
      })
    }
  }
}
