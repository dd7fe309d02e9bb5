//! Recording content used by the unit tests of the host and the dialog.

use super::content::{ContentRegistry, HostedContent, ListSurface, SelectPayload};
use super::selection::Selection;
use crate::shared::channel::EventChannel;
use leptos::prelude::*;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Recorded {
    pub model: Option<Value>,
    pub is_modal: Option<bool>,
    pub multiple_select_enabled: Option<bool>,
    pub is_selection_list: Option<bool>,
    pub load_data: Option<bool>,
    pub filter: Option<Map<String, Value>>,
    pub models: Option<Vec<Value>>,
    pub nonces: Vec<Uuid>,
}

pub struct RecordingContent {
    is_list: bool,
    recorded: Mutex<Recorded>,
    selection: Mutex<Option<Selection>>,
    save: EventChannel<Value>,
    select: EventChannel<SelectPayload>,
}

impl RecordingContent {
    pub fn list() -> Self {
        Self::build(true)
    }

    pub fn form() -> Self {
        Self::build(false)
    }

    fn build(is_list: bool) -> Self {
        Self {
            is_list,
            recorded: Mutex::new(Recorded::default()),
            selection: Mutex::new(None),
            save: EventChannel::new(),
            select: EventChannel::new(),
        }
    }

    pub fn recorded(&self) -> Recorded {
        self.recorded.lock().unwrap().clone()
    }

    pub fn bound_selection(&self) -> Option<Selection> {
        self.selection.lock().unwrap().clone()
    }

    pub fn push_select(&self, payload: SelectPayload) {
        self.select.emit(&payload);
    }

    pub fn push_save(&self, entity: Value) {
        self.save.emit(&entity);
    }

    fn record(&self, f: impl FnOnce(&mut Recorded)) {
        f(&mut self.recorded.lock().unwrap());
    }
}

impl HostedContent for RecordingContent {
    fn set_model(&self, model: Option<Value>) {
        self.record(|r| r.model = model);
    }

    fn set_is_modal(&self, is_modal: bool) {
        self.record(|r| r.is_modal = Some(is_modal));
    }

    fn bind_selection(&self, selection: Selection) {
        *self.selection.lock().unwrap() = Some(selection);
    }

    fn list_surface(&self) -> Option<&dyn ListSurface> {
        if self.is_list {
            Some(self)
        } else {
            None
        }
    }

    fn save_channel(&self) -> Option<EventChannel<Value>> {
        Some(self.save.clone())
    }

    fn select_channel(&self) -> Option<EventChannel<SelectPayload>> {
        Some(self.select.clone())
    }

    fn view(&self) -> AnyView {
        ().into_any()
    }
}

impl ListSurface for RecordingContent {
    fn set_multiple_select_enabled(&self, enabled: bool) {
        self.record(|r| r.multiple_select_enabled = Some(enabled));
    }

    fn set_is_selection_list(&self, is_selection_list: bool) {
        self.record(|r| r.is_selection_list = Some(is_selection_list));
    }

    fn set_load_data(&self, load_data: bool) {
        self.record(|r| r.load_data = Some(load_data));
    }

    fn set_filter(&self, filter: Map<String, Value>) {
        self.record(|r| r.filter = Some(filter));
    }

    fn set_models(&self, models: Vec<Value>) {
        self.record(|r| r.models = Some(models));
    }

    fn data_arrived(&self, nonce: Uuid) {
        self.record(|r| r.nonces.push(nonce));
    }
}

pub const LIST: &str = "tag-list";
pub const FORM: &str = "tag-form";

/// Every instance built by the registry, in creation order
pub type Created = Arc<Mutex<Vec<Arc<RecordingContent>>>>;

/// Registry with a recording list (`tag-list`) and form (`tag-form`)
pub fn recording_registry() -> (ContentRegistry, Created) {
    let created: Created = Arc::new(Mutex::new(Vec::new()));
    let mut registry = ContentRegistry::new();
    for (id, is_list) in [(LIST, true), (FORM, false)] {
        let created = created.clone();
        registry.register(id, move || {
            let content = Arc::new(RecordingContent::build(is_list));
            created.lock().unwrap().push(content.clone());
            content as Arc<dyn HostedContent>
        });
    }
    (registry, created)
}

pub fn last_created(created: &Created) -> Arc<RecordingContent> {
    created.lock().unwrap().last().cloned().unwrap()
}
