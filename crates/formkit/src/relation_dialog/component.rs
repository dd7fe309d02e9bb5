use super::controller::RelationDialogController;
use crate::dynamic_host::ContentOutlet;
use crate::dynamic_host::ContentSlot;
use crate::shared::icons::icon;
use crate::shared::modal_frame::{CloseReason, ModalFrame};
use contracts::shared::content::DialogMethod;
use contracts::shared::relation::{entity_label, is_blank, SelectionMode};
use leptos::prelude::*;
use serde_json::Value;

/// Modal shell hosting the controller's content while the dialog is open
#[component]
pub fn RelationDialog(
    controller: RelationDialogController,
    /// Mounting point the controller renders into
    target: ContentSlot,
    #[prop(optional)]
    title: Option<String>,
    #[prop(optional)]
    modal_style: Option<String>,
) -> impl IntoView {
    let state = controller.state_signal();
    let close_on_overlay = controller.config().close_on_overlay;
    let on_close = Callback::new({
        let controller = controller.clone();
        move |reason: CloseReason| controller.close(reason)
    });

    view! {
        <Show when=move || state.get().is_open()>
            {
                let target = target.clone();
                let title = title.clone().unwrap_or_default();
                let modal_style = modal_style
                    .clone()
                    .unwrap_or_else(|| "max-width: min(1100px, 95vw); width: min(1100px, 95vw);".to_string());
                view! {
                    <ModalFrame
                        on_close=on_close
                        title=title
                        close_on_overlay=close_on_overlay
                        modal_style=modal_style
                        modal_class="relation-dialog-modal".to_string()
                    >
                        <ContentOutlet target=target />
                    </ModalFrame>
                }
            }
        </Show>
    }
}

/// Rows of a relation field. Arrays may hold the same entity twice, so the
/// position is part of the key.
fn keyed_rows(items: Vec<Value>) -> Vec<(usize, Value)> {
    items.into_iter().enumerate().collect()
}

fn row_key(row: &(usize, Value)) -> String {
    let (index, item) = row;
    format!("{index}:{item}")
}

/// Inline editor of one relation field: current value(s), remove buttons
/// (multiple mode), and buttons opening the list / create-edit dialog.
#[component]
pub fn RelationField(
    controller: RelationDialogController,
    target: ContentSlot,
    /// Field label
    label: String,
    /// Show the "create" button (needs a create-edit descriptor)
    #[prop(optional)]
    allow_create: bool,
) -> impl IntoView {
    let mode = controller.mode();
    let field = controller.field().to_string();
    let companion = controller.companion_field().to_string();
    let host = controller.host().cloned();

    let current_items = move || -> Vec<(usize, Value)> {
        let Some(host) = host.as_ref() else {
            return Vec::new();
        };
        let items: Vec<Value> = match mode {
            SelectionMode::Single => host
                .track(&companion)
                .filter(|value| !is_blank(value))
                .into_iter()
                .collect(),
            SelectionMode::Multiple => host.track_array(&field),
        };
        keyed_rows(items)
    };

    let open_list = {
        let controller = controller.clone();
        move |_| controller.show_modal(DialogMethod::List)
    };
    let open_create = {
        let controller = controller.clone();
        move |_| controller.show_modal(DialogMethod::CreateEdit)
    };

    let controller_for_items = controller.clone();
    let title = label.clone();

    view! {
        <div class="form__group relation-field">
            <label class="form__label">{label}</label>
            <div class="relation-field__value">
                <For
                    each=current_items
                    key=row_key
                    children=move |(_, item): (usize, Value)| {
                        let caption = entity_label(&item);
                        let controller = controller_for_items.clone();
                        view! {
                            <span class="badge relation-field__item">
                                {caption}
                                <Show when=move || mode.is_multiple()>
                                    <button
                                        class="button button--icon button--ghost"
                                        on:click={
                                            let controller = controller.clone();
                                            let item = item.clone();
                                            move |_| controller.delete_from_list(&item)
                                        }
                                    >
                                        {icon("x")}
                                    </button>
                                </Show>
                            </span>
                        }
                    }
                />
            </div>
            <div class="relation-field__actions">
                <button class="button button--secondary" on:click=open_list>
                    {icon("list")}
                    "Выбрать"
                </button>
                <Show when=move || allow_create>
                    <button class="button button--secondary" on:click=open_create.clone()>
                        {icon("plus")}
                        "Создать"
                    </button>
                </Show>
            </div>
            <RelationDialog controller=controller target=target title=title />
        </div>
    }
}
