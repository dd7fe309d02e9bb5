use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a relation dialog writes picked entities back to the host entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// `tag_id` + `tag`
    #[default]
    Single,
    /// `tags: [...]`
    Multiple,
}

impl SelectionMode {
    pub fn is_multiple(self) -> bool {
        matches!(self, SelectionMode::Multiple)
    }
}

/// Name of the companion object field for a relation id field.
///
/// Everything from the first `_id` on is dropped: `tag_id` -> `tag`,
/// `parent_tag_id` -> `parent_tag`. Names without `_id` are returned as is.
pub fn derive_companion_field(id_field: &str) -> &str {
    match id_field.find("_id") {
        Some(pos) => &id_field[..pos],
        None => id_field,
    }
}

/// `id` of an entity, `None` when absent or null
pub fn entity_id(entity: &Value) -> Option<&Value> {
    entity.get("id").filter(|id| !id.is_null())
}

/// Two entities are the same when both carry an id and the ids match.
/// Entities without an id fall back to full value equality.
pub fn same_entity(a: &Value, b: &Value) -> bool {
    match (entity_id(a), entity_id(b)) {
        (Some(left), Some(right)) => left == right,
        _ => a == b,
    }
}

/// Null, empty string, empty array and empty object count as "no value"
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Sets the `selected` flag on an object entity. Scalars are left untouched.
pub fn mark_selected(entity: &mut Value) {
    if let Some(obj) = entity.as_object_mut() {
        obj.insert("selected".to_string(), Value::Bool(true));
    }
}

/// Human readable label: `name`, then `description`, then the id
pub fn entity_label(entity: &Value) -> String {
    for key in ["name", "description"] {
        if let Some(Value::String(s)) = entity.get(key) {
            if !s.is_empty() {
                return s.clone();
            }
        }
    }
    match entity_id(entity) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
