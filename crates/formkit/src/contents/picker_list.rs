use super::api;
use crate::dynamic_host::{HostedContent, ListSurface, SelectPayload, Selection};
use crate::shared::channel::EventChannel;
use contracts::shared::relation::{entity_id, entity_label, same_entity};
use leptos::prelude::*;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Selectable list of entities hosted in a relation dialog.
///
/// - single mode: click picks a row, double click confirms it
/// - multiple mode: click toggles rows, "Выбрать" confirms the selection
///
/// Data is either preloaded by the renderer (`set_models` + `data_arrived`)
/// or, with `load_data`, fetched from `endpoint` with the filter as query.
#[derive(Clone)]
pub struct EntityPickerList {
    title: String,
    endpoint: Option<String>,
    model: ArcRwSignal<Option<Value>>,
    is_modal: ArcRwSignal<bool>,
    multiple: ArcRwSignal<bool>,
    is_selection_list: ArcRwSignal<bool>,
    load_data: ArcRwSignal<bool>,
    filter: ArcRwSignal<Map<String, Value>>,
    items: ArcRwSignal<Vec<Value>>,
    loading: ArcRwSignal<bool>,
    error: ArcRwSignal<Option<String>>,
    fetch_started: ArcRwSignal<bool>,
    data_nonce: ArcRwSignal<Option<Uuid>>,
    selection: ArcRwSignal<Selection>,
    select: EventChannel<SelectPayload>,
}

impl EntityPickerList {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            endpoint: None,
            model: ArcRwSignal::new(None),
            is_modal: ArcRwSignal::new(false),
            multiple: ArcRwSignal::new(false),
            is_selection_list: ArcRwSignal::new(true),
            load_data: ArcRwSignal::new(false),
            filter: ArcRwSignal::new(Map::new()),
            items: ArcRwSignal::new(Vec::new()),
            loading: ArcRwSignal::new(false),
            error: ArcRwSignal::new(None),
            fetch_started: ArcRwSignal::new(false),
            data_nonce: ArcRwSignal::new(None),
            selection: ArcRwSignal::new(Selection::new()),
            select: EventChannel::new(),
        }
    }

    /// Endpoint used when the list loads its own data
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn into_content(self) -> Arc<dyn HostedContent> {
        Arc::new(self)
    }

    /// Model handed over by the descriptor (e.g. the record the list is opened for)
    pub fn model(&self) -> Option<Value> {
        self.model.get_untracked()
    }

    pub fn items(&self) -> Vec<Value> {
        self.items.get_untracked()
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple.get_untracked()
    }

    pub fn last_data_nonce(&self) -> Option<Uuid> {
        self.data_nonce.get_untracked()
    }

    fn current_selection(&self) -> Selection {
        self.selection.get_untracked()
    }

    /// Row click
    pub fn pick(&self, item: Value) {
        if !self.is_selection_list.get_untracked() {
            return;
        }
        let selection = self.current_selection();
        if self.is_multiple() {
            selection.toggle(item);
        } else {
            selection.replace(vec![item]);
        }
    }

    /// Push the current selection on the select channel
    pub fn confirm(&self) {
        let picked = self.current_selection().get();
        self.select.emit(&Some(picked));
    }

    /// Double click in single mode: pick and confirm in one go
    pub fn confirm_item(&self, item: Value) {
        if self.is_multiple() || !self.is_selection_list.get_untracked() {
            return;
        }
        self.current_selection().replace(vec![item.clone()]);
        self.select.emit(&Some(vec![item]));
    }

    /// Endpoint and filter of the single fetch the list performs. `None` when
    /// data is preloaded, no endpoint is set or the fetch already started.
    fn take_fetch_request(&self) -> Option<(String, Map<String, Value>)> {
        if !self.load_data.get_untracked() || self.fetch_started.get_untracked() {
            return None;
        }
        let Some(endpoint) = self.endpoint.clone() else {
            log::warn!("`{}` loads its own data but has no endpoint", self.title);
            return None;
        };
        self.fetch_started.set(true);
        self.loading.set(true);
        Some((endpoint, self.filter.get_untracked()))
    }

    fn ensure_loaded(&self) {
        let Some((endpoint, filter)) = self.take_fetch_request() else {
            return;
        };
        let items = self.items.clone();
        let loading = self.loading.clone();
        let error = self.error.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_entities(&endpoint, &filter).await {
                Ok(entities) => {
                    items.set(entities);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    }
}

impl HostedContent for EntityPickerList {
    fn set_model(&self, model: Option<Value>) {
        self.model.set(model);
    }

    fn set_is_modal(&self, is_modal: bool) {
        self.is_modal.set(is_modal);
    }

    fn bind_selection(&self, selection: Selection) {
        self.selection.set(selection);
    }

    fn list_surface(&self) -> Option<&dyn ListSurface> {
        Some(self)
    }

    fn select_channel(&self) -> Option<EventChannel<SelectPayload>> {
        Some(self.select.clone())
    }

    fn view(&self) -> AnyView {
        self.ensure_loaded();

        let this = self.clone();
        let title = self.title.clone();
        let is_modal = self.is_modal.clone();
        let loading = self.loading.clone();
        let error = self.error.clone();
        let selection = self.selection.clone();
        let multiple = self.multiple.clone();
        let can_confirm = {
            let selection = selection.clone();
            move || !selection.get().tracked().is_empty()
        };
        let on_confirm = {
            let this = this.clone();
            move |_| this.confirm()
        };

        view! {
            <div class=move || {
                if is_modal.get() { "picker-container picker-container--modal" } else { "picker-container" }
            }>
                <div class="picker-header">
                    <h3>{title}</h3>
                </div>

                <div class="picker-content">
                    {move || {
                        if loading.get() {
                            view! { <div class="picker-loading">"Загрузка..."</div> }.into_any()
                        } else if let Some(err) = error.get() {
                            view! {
                                <div class="picker-error">
                                    <p>"Ошибка загрузки: " {err}</p>
                                </div>
                            }.into_any()
                        } else {
                            let items = this.items.get();
                            if items.is_empty() {
                                view! {
                                    <div class="picker-empty">"Нет доступных элементов"</div>
                                }.into_any()
                            } else {
                                let multiple = multiple.get();
                                let selected = selection.get().tracked();
                                view! {
                                    <table class="picker-table">
                                        <thead>
                                            <tr>
                                                <th>"Наименование"</th>
                                                <th>"Код"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {items.into_iter().map(|item| {
                                                let is_selected = selected
                                                    .iter()
                                                    .any(|s| same_entity(s, &item));
                                                let code = entity_id(&item)
                                                    .map(|id| id.to_string())
                                                    .unwrap_or_default();
                                                let caption = entity_label(&item);
                                                let on_click = {
                                                    let this = this.clone();
                                                    let item = item.clone();
                                                    move |_| this.pick(item.clone())
                                                };
                                                let on_dblclick = {
                                                    let this = this.clone();
                                                    let item = item.clone();
                                                    move |_| this.confirm_item(item.clone())
                                                };
                                                view! {
                                                    <tr
                                                        class="picker-row"
                                                        class:selected=is_selected
                                                        on:click=on_click
                                                        on:dblclick=on_dblclick
                                                    >
                                                        <td>
                                                            {multiple.then(|| view! {
                                                                <input type="checkbox" prop:checked=is_selected />
                                                            })}
                                                            {caption}
                                                        </td>
                                                        <td>{code}</td>
                                                    </tr>
                                                }
                                            }).collect_view()}
                                        </tbody>
                                    </table>
                                }.into_any()
                            }
                        }
                    }}
                </div>

                <div class="picker-actions">
                    <button
                        class="button button--primary"
                        on:click=on_confirm
                        disabled=move || !can_confirm()
                    >
                        "Выбрать"
                    </button>
                </div>
            </div>
        }
        .into_any()
    }
}

impl ListSurface for EntityPickerList {
    fn set_multiple_select_enabled(&self, enabled: bool) {
        self.multiple.set(enabled);
    }

    fn set_is_selection_list(&self, is_selection_list: bool) {
        self.is_selection_list.set(is_selection_list);
    }

    fn set_load_data(&self, load_data: bool) {
        self.load_data.set(load_data);
    }

    fn set_filter(&self, filter: Map<String, Value>) {
        self.filter.set(filter);
    }

    fn set_models(&self, models: Vec<Value>) {
        self.items.set(models);
    }

    fn data_arrived(&self, nonce: Uuid) {
        self.loading.set(false);
        self.error.set(None);
        self.data_nonce.set(Some(nonce));
    }
}
