use serde_json::{Map, Value};

/// Cell value when a selected field is missing from a row.
pub const MISSING_FIELD: &str = "--";
/// Export line for rows that lack the requested column entirely.
pub const EXPORT_UNDEFINED: &str = "N/A";

/// Project array-of-object rows onto the selected field paths.
///
/// Each output row maps field path -> resolved value, with missing fields
/// normalized to `MISSING_FIELD`. Present-but-complex values are preserved
/// as-is for row storage; display goes through `summarize_complex`.
pub fn project(rows: &[Value], fields: &[String]) -> Vec<Map<String, Value>> {
  rows
    .iter()
    .map(|row| {
      let mut out = Map::new();
      for field in fields {
        let resolved = lookup_field(row, field)
          .cloned()
          .unwrap_or_else(|| Value::String(MISSING_FIELD.to_string()));
        out.insert(field.clone(), resolved);
      }
      out
    })
    .collect()
}

/// Segment-wise dotted traversal (`a.b.c` -> row.a.b.c), short-circuiting
/// when any intermediate segment is missing or not an object.
fn lookup_field<'a>(row: &'a Value, field: &str) -> Option<&'a Value> {
  let mut cur = row;
  for seg in field.split('.') {
    cur = cur.as_object()?.get(seg)?;
  }
  Some(cur)
}

/// Extract one column from projected rows as plain text, one line per row,
/// newline-joined. This is the exact blob handed to the clipboard
/// collaborator.
pub fn export_column(rows: &[Map<String, Value>], field: &str) -> String {
  rows
    .iter()
    .map(|row| match row.get(field) {
      None => EXPORT_UNDEFINED.to_string(),
      Some(v) if is_complex(v) => summarize_complex(v),
      Some(v) => display_scalar(v),
    })
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn is_complex(value: &Value) -> bool {
  matches!(value, Value::Object(_) | Value::Array(_))
}

/// One-line summary for container values shown in cells.
pub fn summarize_complex(value: &Value) -> String {
  match value {
    Value::Array(a) => format!("[list ({} items)]", a.len()),
    Value::Object(m) => format!("{{object ({} keys)}}", m.len()),
    other => display_scalar(other),
  }
}

/// Plain-text rendering for scalar cells: strings unquoted, null spelled
/// out.
pub fn display_scalar(value: &Value) -> String {
  match value {
    Value::Null => "null".to_string(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Column header shown for a dotted field path.
pub fn header_label(path: &str) -> String {
  path.replace('.', " › ").replace('_', " ")
}

/// Column candidates for an array of objects: the first element's keys, in
/// insertion order.
pub fn suggest_fields(rows: &[Value]) -> Vec<String> {
  match rows.first() {
    Some(Value::Object(m)) => m.keys().cloned().collect(),
    _ => Vec::new(),
  }
}

/// True when every element is scalar, i.e. the array renders as a plain
/// list rather than a table.
pub fn is_simple_array(rows: &[Value]) -> bool {
  !rows.is_empty() && rows.iter().all(|v| !is_complex(v))
}
