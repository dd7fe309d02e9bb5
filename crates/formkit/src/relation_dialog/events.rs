use serde_json::Value;

/// Lifecycle of a relation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    /// Open; content requested but nothing is listened to (yet)
    Rendering,
    /// Open with mounted content and live subscriptions
    Listening,
}

impl DialogState {
    pub fn is_open(self) -> bool {
        !matches!(self, DialogState::Closed)
    }
}

/// Events a relation dialog emits to its caller
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    /// Edit content saved an entity
    Success(Value),
    /// Raw relation value after a single-mode pick (the id)
    Selected(Value),
    /// One entity was applied to the relation
    SelectModel(Value),
    /// The content finished picking; carries the full payload
    SelectionFinished(Vec<Value>),
}
