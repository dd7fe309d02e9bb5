use contracts::shared::relation::same_entity;
use leptos::prelude::*;
use serde_json::{Map, Value};

/// The caller's record a relation dialog writes into.
///
/// Reads of absent fields yield `None` / `[]`. Assignments create the
/// field; array edits on an absent or non-array field are ignored.
#[derive(Clone)]
pub struct HostEntity {
    fields: ArcRwSignal<Map<String, Value>>,
}

impl HostEntity {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields: ArcRwSignal::new(fields),
        }
    }

    /// Non-object values start as an empty record
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::new(fields),
            other => {
                log::warn!("host entity is not an object: {other}");
                Self::new(Map::new())
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        self.fields.with_untracked(|fields| fields.get(field).cloned())
    }

    /// Reactive read for views
    pub fn track(&self, field: &str) -> Option<Value> {
        self.fields.with(|fields| fields.get(field).cloned())
    }

    pub fn set(&self, field: &str, value: Value) {
        self.fields.update(|fields| {
            fields.insert(field.to_string(), value);
        });
    }

    /// Elements of an array field, `[]` when absent or not an array
    pub fn array(&self, field: &str) -> Vec<Value> {
        self.fields.with_untracked(|fields| match fields.get(field) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        })
    }

    /// Reactive `array`
    pub fn track_array(&self, field: &str) -> Vec<Value> {
        self.fields.with(|fields| match fields.get(field) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        })
    }

    pub fn has_array(&self, field: &str) -> bool {
        self.fields
            .with_untracked(|fields| matches!(fields.get(field), Some(Value::Array(_))))
    }

    pub fn array_contains(&self, field: &str, entity: &Value) -> bool {
        self.fields.with_untracked(|fields| match fields.get(field) {
            Some(Value::Array(items)) => items.iter().any(|item| same_entity(item, entity)),
            _ => false,
        })
    }

    /// Appends to an existing array field. Returns whether it was appended.
    pub fn push_to_array(&self, field: &str, entity: Value) -> bool {
        if !self.has_array(field) {
            log::debug!("`{field}` is not an array field, append ignored");
            return false;
        }
        self.fields.update(|fields| {
            if let Some(Value::Array(items)) = fields.get_mut(field) {
                items.push(entity);
            }
        });
        true
    }

    /// Removes the first element matching `entity`. Returns whether one was removed.
    pub fn remove_first_from_array(&self, field: &str, entity: &Value) -> bool {
        let position = self.fields.with_untracked(|fields| match fields.get(field) {
            Some(Value::Array(items)) => items.iter().position(|item| same_entity(item, entity)),
            _ => None,
        });
        let Some(index) = position else {
            return false;
        };
        self.fields.update(|fields| {
            if let Some(Value::Array(items)) = fields.get_mut(field) {
                items.remove(index);
            }
        });
        true
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.get_untracked())
    }

    /// Reactive `to_value`
    pub fn track_value(&self) -> Value {
        Value::Object(self.fields.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(value: Value) -> HostEntity {
        HostEntity::from_value(value)
    }

    #[test]
    fn test_absent_fields_read_as_nothing() {
        let host = entity(json!({"title": "Task"}));
        assert_eq!(host.get("tag"), None);
        assert!(host.array("tags").is_empty());
        assert!(!host.has_array("title"));
    }

    #[test]
    fn test_set_creates_field() {
        let host = entity(json!({}));
        host.set("tag_id", json!(5));
        assert_eq!(host.get("tag_id"), Some(json!(5)));
    }

    #[test]
    fn test_push_ignored_on_absent_array() {
        let host = entity(json!({"title": "Task"}));
        assert!(!host.push_to_array("tags", json!({"id": 1})));
        assert!(!host.push_to_array("title", json!({"id": 1})));
        assert_eq!(host.to_value(), json!({"title": "Task"}));
    }

    #[test]
    fn test_remove_first_from_array() {
        let host = entity(json!({"tags": [{"id": "a"}, {"id": "b"}, {"id": "a"}]}));

        assert!(host.remove_first_from_array("tags", &json!({"id": "a"})));
        assert_eq!(host.array("tags"), vec![json!({"id": "b"}), json!({"id": "a"})]);

        assert!(!host.remove_first_from_array("tags", &json!({"id": "c"})));
        assert!(!host.remove_first_from_array("missing", &json!({"id": "a"})));
    }

    #[test]
    fn test_non_object_value_starts_empty() {
        let host = entity(json!([1, 2]));
        assert_eq!(host.to_value(), json!({}));
    }
}
