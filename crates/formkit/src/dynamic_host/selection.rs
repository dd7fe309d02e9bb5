use contracts::shared::relation::same_entity;
use leptos::prelude::*;
use serde_json::Value;

/// The "currently selected entities" list shared by the dialog controller,
/// the renderer and the mounted content.
///
/// All clones observe the same list. There is no way to borrow the list
/// mutably from outside: callers read a copy or replace/edit it through
/// the methods below.
#[derive(Clone)]
pub struct Selection {
    items: ArcRwSignal<Vec<Value>>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self {
            items: ArcRwSignal::new(Vec::new()),
        }
    }

    /// Current list, without subscribing the caller
    pub fn get(&self) -> Vec<Value> {
        self.items.get_untracked()
    }

    /// Current list, tracked by the surrounding reactive scope (views)
    pub fn tracked(&self) -> Vec<Value> {
        self.items.get()
    }

    pub fn replace(&self, items: Vec<Value>) {
        self.items.set(items);
    }

    pub fn clear(&self) {
        self.items.set(Vec::new());
    }

    pub fn push(&self, entity: Value) {
        self.items.update(|items| items.push(entity));
    }

    /// Removes the first entity matching `entity`. Returns whether one was removed.
    pub fn remove_first(&self, entity: &Value) -> bool {
        let position = self
            .items
            .with_untracked(|items| items.iter().position(|item| same_entity(item, entity)));
        match position {
            Some(index) => {
                self.items.update(|items| {
                    items.remove(index);
                });
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, entity: &Value) -> bool {
        self.items
            .with_untracked(|items| items.iter().any(|item| same_entity(item, entity)))
    }

    /// Toggle used by list content: add when absent, remove when present
    pub fn toggle(&self, entity: Value) {
        if !self.remove_first(&entity) {
            self.push(entity);
        }
    }

    pub fn len(&self) -> usize {
        self.items.with_untracked(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clones_share_state() {
        let selection = Selection::new();
        let other = selection.clone();

        selection.replace(vec![json!({"id": 1})]);
        assert_eq!(other.get(), vec![json!({"id": 1})]);

        other.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_remove_first_only_one_occurrence() {
        let selection = Selection::new();
        let a = json!({"id": "a"});
        let b = json!({"id": "b"});
        selection.replace(vec![a.clone(), b.clone(), a.clone()]);

        assert!(selection.remove_first(&a));
        assert_eq!(selection.get(), vec![b.clone(), a.clone()]);

        assert!(!selection.remove_first(&json!({"id": "zzz"})));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_toggle() {
        let selection = Selection::new();
        selection.toggle(json!({"id": 1}));
        assert!(selection.contains(&json!({"id": 1, "selected": true})));
        selection.toggle(json!({"id": 1}));
        assert!(selection.is_empty());
    }
}
