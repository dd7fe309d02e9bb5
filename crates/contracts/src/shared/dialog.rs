use super::content::DescriptorSet;
use super::relation::{derive_companion_field, SelectionMode};
use serde::{Deserialize, Serialize};

/// Binding of a selection dialog to one field of a host entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDialogConfig {
    /// `tag_id` in single mode, `tags` in multiple mode
    pub field: String,
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default = "default_close_on_overlay")]
    pub close_on_overlay: bool,
    #[serde(default)]
    pub descriptors: DescriptorSet,
}

fn default_close_on_overlay() -> bool {
    true
}

impl RelationDialogConfig {
    pub fn new(field: impl Into<String>, mode: SelectionMode, descriptors: DescriptorSet) -> Self {
        Self {
            field: field.into(),
            mode,
            close_on_overlay: true,
            descriptors,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Object field paired with `field` in single mode
    pub fn companion_field(&self) -> &str {
        derive_companion_field(&self.field)
    }
}
