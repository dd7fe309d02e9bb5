use super::api;
use crate::dynamic_host::{HostedContent, Selection};
use crate::shared::channel::EventChannel;
use leptos::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

/// Create/edit form for a simple named entity, hosted in a relation dialog.
///
/// Saving pushes the stored entity on the save channel; with an endpoint
/// the entity is posted first and the server's answer is pushed instead.
#[derive(Clone)]
pub struct EntityEditForm {
    title: String,
    endpoint: Option<String>,
    model: ArcRwSignal<Value>,
    is_modal: ArcRwSignal<bool>,
    saving: ArcRwSignal<bool>,
    error: ArcRwSignal<Option<String>>,
    save: EventChannel<Value>,
}

impl EntityEditForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            endpoint: None,
            model: ArcRwSignal::new(json!({})),
            is_modal: ArcRwSignal::new(false),
            saving: ArcRwSignal::new(false),
            error: ArcRwSignal::new(None),
            save: EventChannel::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn into_content(self) -> Arc<dyn HostedContent> {
        Arc::new(self)
    }

    pub fn model(&self) -> Value {
        self.model.get_untracked()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get_untracked()
    }

    pub fn set_name(&self, name: String) {
        self.model.update(|model| {
            if let Some(obj) = model.as_object_mut() {
                obj.insert("name".to_string(), Value::String(name));
            }
        });
    }

    fn validate(model: &Value) -> Result<(), &'static str> {
        let name = model.get("name").and_then(Value::as_str).unwrap_or_default();
        if name.trim().is_empty() {
            return Err("Наименование обязательно для заполнения");
        }
        Ok(())
    }

    pub fn save_command(&self) {
        let current = self.model.get_untracked();
        if let Err(msg) = Self::validate(&current) {
            self.error.set(Some(msg.to_string()));
            return;
        }
        self.error.set(None);

        let Some(endpoint) = self.endpoint.clone() else {
            self.save.emit(&current);
            return;
        };

        self.saving.set(true);
        let save = self.save.clone();
        let saving = self.saving.clone();
        let error = self.error.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match api::save_entity(&endpoint, &current).await {
                Ok(saved) => save.emit(&saved),
                Err(e) => error.set(Some(format!("Ошибка сохранения: {e}"))),
            }
            saving.set(false);
        });
    }
}

impl HostedContent for EntityEditForm {
    fn set_model(&self, model: Option<Value>) {
        self.model.set(model.unwrap_or_else(|| json!({})));
    }

    fn set_is_modal(&self, is_modal: bool) {
        self.is_modal.set(is_modal);
    }

    // A form has no selection to show.
    fn bind_selection(&self, _selection: Selection) {}

    fn save_channel(&self) -> Option<EventChannel<Value>> {
        Some(self.save.clone())
    }

    fn view(&self) -> AnyView {
        let this = self.clone();
        let title = self.title.clone();
        let model = self.model.clone();
        let error = self.error.clone();
        let saving = self.saving.clone();
        let is_modal = self.is_modal.clone();

        let on_input = {
            let this = this.clone();
            move |ev: leptos::ev::Event| this.set_name(event_target_value(&ev))
        };
        let on_save = move |_| this.save_command();

        view! {
            <div class=move || {
                if is_modal.get() { "details-container details-container--modal" } else { "details-container" }
            }>
                <h3 class="details-section__title">{title}</h3>
                {move || error.get().map(|msg| view! { <div class="form__error">{msg}</div> })}
                <div class="form__group">
                    <label class="form__label">"Наименование"</label>
                    <input
                        class="form__input"
                        type="text"
                        prop:value=move || {
                            model
                                .with(|m| m.get("name").and_then(Value::as_str).map(str::to_string))
                                .unwrap_or_default()
                        }
                        on:input=on_input
                    />
                </div>
                <div class="details-actions">
                    <button
                        class="button button--primary"
                        on:click=on_save
                        disabled=move || saving.get()
                    >
                        "Сохранить"
                    </button>
                </div>
            </div>
        }
        .into_any()
    }
}
