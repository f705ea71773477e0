use std::{
  sync::mpsc::{channel, Receiver, Sender},
  thread,
};

use parking_lot::Mutex;
use tracing::debug;

use crate::engine::{parse_tree, CoreError, CoreOptions, ParsedTree};

/// Exactly one reply is sent per request; there are no partial or streaming
/// messages.
enum WorkerReply {
  Parsed(Box<ParsedTree>),
  Error(String),
}

/// A dedicated parse thread fed over a channel pair.
///
/// Used purely as an offload target for large inputs; it shares no mutable
/// state with the caller. The channel carries at most one in-flight request:
/// overlapping callers are serialized on the reply receiver so request and
/// reply stay paired.
pub struct ParseWorker {
  tx: Sender<String>,
  rx: Mutex<Receiver<WorkerReply>>,
}

impl ParseWorker {
  /// Spawn the worker thread. It parses with the same options as the
  /// in-thread path, so both routes produce structurally identical trees.
  /// The thread exits when the `ParseWorker` is dropped.
  pub fn spawn(options: CoreOptions) -> Self {
    let (req_tx, req_rx) = channel::<String>();
    let (reply_tx, reply_rx) = channel::<WorkerReply>();
    thread::spawn(move || {
      while let Ok(raw) = req_rx.recv() {
        let reply = match parse_tree(&raw, &options) {
          Ok(tree) => WorkerReply::Parsed(Box::new(tree)),
          Err(e) => WorkerReply::Error(e.to_string()),
        };
        if reply_tx.send(reply).is_err() {
          break;
        }
      }
      debug!("parse worker thread exiting");
    });
    Self {
      tx: req_tx,
      rx: Mutex::new(reply_rx),
    }
  }

  /// One request/response round trip. Any problem on the worker side —
  /// including a parse failure over there — surfaces as `WorkerFailure`;
  /// the engine retries in-thread and reports the authoritative error.
  pub(crate) fn parse(&self, raw: &str) -> Result<ParsedTree, CoreError> {
    let rx = self.rx.lock();
    self
      .tx
      .send(raw.to_string())
      .map_err(|_| CoreError::WorkerFailure("worker thread is gone".into()))?;
    match rx.recv() {
      Ok(WorkerReply::Parsed(tree)) => Ok(*tree),
      Ok(WorkerReply::Error(message)) => Err(CoreError::WorkerFailure(message)),
      Err(_) => Err(CoreError::WorkerFailure("worker thread is gone".into())),
    }
  }
}
