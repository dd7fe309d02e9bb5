use crate::contents::{EntityEditForm, EntityPickerList};
use crate::dynamic_host::{ContentRegistry, ContentSlot};
use crate::relation_dialog::{DialogEvent, HostEntity, RelationDialogController, RelationField};
use crate::shared::channel::SubscriptionSet;
use contracts::shared::content::{ContentDescriptor, DescriptorSet, ListOptions};
use contracts::shared::dialog::RelationDialogConfig;
use contracts::shared::relation::SelectionMode;
use leptos::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

const TAG_LIST: &str = "tag-list";
const TAG_FORM: &str = "tag-form";

/// Multiple-mode binding, in the form a page would ship it as configuration
const TAGS_DIALOG: &str = r#"{
    "field": "tags",
    "mode": "multiple",
    "descriptors": {
        "create-edit": { "contentType": "tag-form", "method": "create-edit" }
    }
}"#;

fn sample_tags() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Срочно"}),
        json!({"id": 2, "name": "Ошибка"}),
        json!({"id": 3, "name": "Доработка"}),
        json!({"id": 4, "name": "Документация"}),
    ]
}

fn registry() -> Arc<ContentRegistry> {
    Arc::new(
        ContentRegistry::new()
            .with(TAG_LIST, || EntityPickerList::new("Теги").into_content())
            .with(TAG_FORM, || EntityEditForm::new("Новый тег").into_content()),
    )
}

fn list_descriptor(multiple: bool) -> ContentDescriptor {
    ContentDescriptor::list(
        TAG_LIST,
        ListOptions {
            multiple_select_enabled: multiple,
            is_selection_list: true,
            models: Some(sample_tags()),
            ..Default::default()
        },
    )
}

fn single_config() -> RelationDialogConfig {
    RelationDialogConfig::new(
        "tag_id",
        SelectionMode::Single,
        DescriptorSet {
            list: Some(list_descriptor(false)),
            create_edit: Some(ContentDescriptor::create_edit(TAG_FORM, None)),
        },
    )
}

fn multiple_config() -> RelationDialogConfig {
    let mut config = RelationDialogConfig::from_json(TAGS_DIALOG).unwrap_or_else(|e| {
        log::error!("tags dialog configuration is invalid: {e}");
        RelationDialogConfig::new("tags", SelectionMode::Multiple, DescriptorSet::default())
    });
    config.descriptors.list = Some(list_descriptor(true));
    config
}

fn log_events(name: &'static str, controller: &RelationDialogController, subs: &mut SubscriptionSet) {
    subs.push(controller.subscribe(move |event: &DialogEvent| match event {
        DialogEvent::Success(entity) => log::info!("[{name}] saved: {entity}"),
        DialogEvent::Selected(id) => log::info!("[{name}] selected id: {id}"),
        DialogEvent::SelectModel(entity) => log::debug!("[{name}] applied: {entity}"),
        DialogEvent::SelectionFinished(entities) => {
            log::info!("[{name}] selection finished: {} item(s)", entities.len())
        }
    }));
}

#[component]
pub fn App() -> impl IntoView {
    let registry = registry();
    let task = HostEntity::from_value(json!({
        "title": "Разобрать входящие",
        "tag_id": null,
        "tag": null,
        "tags": [],
    }));

    let single_slot = ContentSlot::new(registry.clone());
    let single = RelationDialogController::new(
        single_config(),
        Some(task.clone()),
        Some(single_slot.as_mount_point()),
    );

    let multiple_slot = ContentSlot::new(registry);
    let multiple = RelationDialogController::new(
        multiple_config(),
        Some(task.clone()),
        Some(multiple_slot.as_mount_point()),
    );

    let mut subs = SubscriptionSet::new();
    log_events("tag_id", &single, &mut subs);
    log_events("tags", &multiple, &mut subs);
    on_cleanup(move || drop(subs));

    let preview = move || serde_json::to_string_pretty(&task.track_value()).unwrap_or_default();

    view! {
        <div class="page">
            <div class="page__header">
                <h2>"Задача"</h2>
            </div>
            <div class="page__content details-container">
                <RelationField
                    controller=single
                    target=single_slot
                    label="Тег".to_string()
                    allow_create=true
                />
                <RelationField
                    controller=multiple
                    target=multiple_slot
                    label="Теги".to_string()
                    allow_create=true
                />
                <pre class="json-preview">{preview}</pre>
            </div>
        </div>
    }
}
