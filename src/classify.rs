use serde_json::Value;

use crate::models::TypeTag;

/// Map a decoded JSON value to its type tag.
///
/// Total over any `Value`, no side effects. The array arm comes before the
/// object arm, and `null` is matched explicitly so it is never reported as
/// an empty object.
pub fn classify(value: &Value) -> TypeTag {
  match value {
    Value::Array(_) => TypeTag::Array,
    Value::Null => TypeTag::Null,
    Value::Object(_) => TypeTag::Object,
    Value::String(_) => TypeTag::String,
    Value::Number(_) => TypeTag::Number,
    Value::Bool(_) => TypeTag::Boolean,
  }
}
