//! Relation selection dialog
//!
//! Binds a selection dialog to one relation field of a host entity:
//! `tag_id` + `tag` in single mode, `tags` in multiple mode.
//!
//! ```rust,ignore
//! let config = RelationDialogConfig::new("tag_id", SelectionMode::Single, descriptors);
//! let slot = ContentSlot::new(registry);
//! let controller = RelationDialogController::new(config, Some(task.clone()), Some(slot.as_mount_point()));
//!
//! view! { <RelationField controller=controller target=slot label="Тег".to_string() /> }
//! ```

pub mod component;
pub mod controller;
pub mod events;
pub mod host_entity;

pub use component::{RelationDialog, RelationField};
pub use controller::RelationDialogController;
pub use events::{DialogEvent, DialogState};
pub use host_entity::HostEntity;
