use super::selection::Selection;
use crate::shared::channel::EventChannel;
use contracts::shared::content::ContentTypeId;
use leptos::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Payload of the select channel. `None` means "nothing to apply".
pub type SelectPayload = Option<Vec<Value>>;

/// Capabilities every piece of dynamically hosted content exposes.
///
/// The renderer configures content only through this trait, so an edit
/// form and a selectable list are treated the same way.
pub trait HostedContent: Send + Sync {
    fn set_model(&self, model: Option<Value>);

    fn set_is_modal(&self, is_modal: bool);

    /// Shared selection the content reads and edits
    fn bind_selection(&self, selection: Selection);

    /// List-specific surface; `None` for content that is not a list
    fn list_surface(&self) -> Option<&dyn ListSurface> {
        None
    }

    /// Emits the saved entity
    fn save_channel(&self) -> Option<EventChannel<Value>> {
        None
    }

    /// Emits the picked entities
    fn select_channel(&self) -> Option<EventChannel<SelectPayload>> {
        None
    }

    fn view(&self) -> AnyView;
}

/// Extra configuration accepted by list content
pub trait ListSurface: Send + Sync {
    fn set_multiple_select_enabled(&self, enabled: bool);
    fn set_is_selection_list(&self, is_selection_list: bool);
    fn set_load_data(&self, load_data: bool);
    fn set_filter(&self, filter: Map<String, Value>);
    fn set_models(&self, models: Vec<Value>);
    /// One-shot "preloaded data is in place" notification
    fn data_arrived(&self, nonce: Uuid);
}

pub type ContentFactory = Arc<dyn Fn() -> Option<Arc<dyn HostedContent>> + Send + Sync>;

/// Maps content type ids to constructors
#[derive(Clone, Default)]
pub struct ContentRegistry {
    factories: HashMap<ContentTypeId, ContentFactory>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, content_type: impl Into<ContentTypeId>, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn HostedContent> + Send + Sync + 'static,
    {
        self.factories
            .insert(content_type.into(), Arc::new(move || Some(factory())));
        self
    }

    /// Register a factory that may decline to build an instance
    pub fn register_fallible<F>(&mut self, content_type: impl Into<ContentTypeId>, factory: F) -> &mut Self
    where
        F: Fn() -> Option<Arc<dyn HostedContent>> + Send + Sync + 'static,
    {
        self.factories.insert(content_type.into(), Arc::new(factory));
        self
    }

    pub fn with<F>(mut self, content_type: impl Into<ContentTypeId>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn HostedContent> + Send + Sync + 'static,
    {
        self.register(content_type, factory);
        self
    }

    pub fn create(&self, content_type: &ContentTypeId) -> Option<Arc<dyn HostedContent>> {
        let factory = self.factories.get(content_type)?;
        factory()
    }
}
