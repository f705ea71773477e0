mod classify;
mod engine;
mod expand;
mod models;
mod node;
mod table;
mod worker;

pub use crate::classify::classify;
pub use crate::engine::{CoreError, CoreOptions, ExplorerEngine};
pub use crate::expand::TreeSession;
pub use crate::models::{FieldSelection, Node, NodeKind, TypeTag};
pub use crate::node::build_node;
pub use crate::table::{
  display_scalar, export_column, header_label, is_complex, is_simple_array, project,
  suggest_fields, summarize_complex, EXPORT_UNDEFINED, MISSING_FIELD,
};
pub use crate::worker::ParseWorker;
