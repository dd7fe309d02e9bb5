use super::events::{DialogEvent, DialogState};
use super::host_entity::HostEntity;
use crate::dynamic_host::{ContentRenderer, HostError, HostedContent, MountPoint, SelectPayload, Selection};
use crate::shared::channel::{EventChannel, Subscription, SubscriptionSet};
use crate::shared::modal_frame::CloseReason;
use contracts::shared::content::DialogMethod;
use contracts::shared::dialog::RelationDialogConfig;
use contracts::shared::relation::{entity_id, is_blank, mark_selected, SelectionMode};
use leptos::prelude::*;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

struct ControllerInner {
    config: RelationDialogConfig,
    host: Option<HostEntity>,
    mount_point: Option<Arc<dyn MountPoint>>,
    renderer: ContentRenderer,
    selection: Selection,
    state: ArcRwSignal<DialogState>,
    subscriptions: Mutex<SubscriptionSet>,
    events: EventChannel<DialogEvent>,
}

/// Selection dialog bound to one relation field of a host entity.
///
/// Single mode keeps `<name>_id` and `<name>` in sync; multiple mode keeps
/// the host array field and the tracked selection value-equal.
///
/// Cheap to clone: all clones drive the same dialog.
#[derive(Clone)]
pub struct RelationDialogController {
    inner: Arc<ControllerInner>,
}

impl RelationDialogController {
    pub fn new(
        config: RelationDialogConfig,
        host: Option<HostEntity>,
        mount_point: Option<Arc<dyn MountPoint>>,
    ) -> Self {
        let selection = Selection::new();
        Self {
            inner: Arc::new(ControllerInner {
                config,
                host,
                mount_point,
                renderer: ContentRenderer::new(),
                selection,
                state: ArcRwSignal::new(DialogState::Closed),
                subscriptions: Mutex::new(SubscriptionSet::new()),
                events: EventChannel::new(),
            }),
        }
    }

    fn from_weak(weak: &Weak<ControllerInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn config(&self) -> &RelationDialogConfig {
        &self.inner.config
    }

    pub fn mode(&self) -> SelectionMode {
        self.inner.config.mode
    }

    pub fn field(&self) -> &str {
        &self.inner.config.field
    }

    pub fn companion_field(&self) -> &str {
        self.inner.config.companion_field()
    }

    pub fn host(&self) -> Option<&HostEntity> {
        self.inner.host.as_ref()
    }

    pub fn renderer(&self) -> &ContentRenderer {
        &self.inner.renderer
    }

    /// Committed selection. Picks the content has not confirmed yet live in
    /// the renderer's working selection and never show up here.
    pub fn selected_elements(&self) -> Vec<Value> {
        self.inner.selection.get()
    }

    pub fn selection(&self) -> &Selection {
        &self.inner.selection
    }

    pub fn state(&self) -> DialogState {
        self.inner.state.get_untracked()
    }

    /// Reactive state for views
    pub fn state_signal(&self) -> ArcRwSignal<DialogState> {
        self.inner.state.clone()
    }

    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Upward events: `SelectModel`, `Selected`, `SelectionFinished`, `Success`
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&DialogEvent) + Send + Sync + 'static,
    {
        self.inner.events.subscribe(handler)
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions().len()
    }

    fn subscriptions(&self) -> MutexGuard<'_, SubscriptionSet> {
        self.inner
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn release_subscriptions(&self) {
        // Take the set out first: releasing may re-enter the controller.
        let mut released = std::mem::take(&mut *self.subscriptions());
        released.release_all();
    }

    fn emit(&self, event: DialogEvent) {
        self.inner.events.emit(&event);
    }

    /// Open the dialog with the list descriptor
    pub fn show_dialog(&self) {
        self.show_modal(DialogMethod::List);
    }

    /// Open the dialog with the descriptor for `method`, rendering from scratch.
    ///
    /// A missing descriptor or a failed render leaves the dialog open with
    /// nothing in it.
    pub fn show_modal(&self, method: DialogMethod) {
        self.release_subscriptions();
        self.inner.state.set(DialogState::Rendering);

        let Some(descriptor) = self.inner.config.descriptors.get(method) else {
            self.inner.renderer.discard();
            self.inner.renderer.report(HostError::DescriptorMissing(method));
            return;
        };

        let Some(instance) = self
            .inner
            .renderer
            .render(descriptor, self.inner.mount_point.clone())
        else {
            return;
        };

        self.seed_selection();
        self.listen(instance.as_ref());
        self.inner.state.set(DialogState::Listening);
    }

    /// Relation value as stored on the host: the array field in multiple
    /// mode, `[companion]` in single mode. `None` without a host entity.
    fn committed_selection(&self) -> Option<Vec<Value>> {
        let host = self.host()?;
        let committed: Vec<Value> = match self.mode() {
            SelectionMode::Single => host
                .get(self.companion_field())
                .filter(|value| !is_blank(value))
                .into_iter()
                .collect(),
            SelectionMode::Multiple => host.array(self.field()),
        };
        Some(committed)
    }

    fn reset_selection_to_host(&self) {
        if let Some(committed) = self.committed_selection() {
            self.inner.selection.replace(committed);
        }
    }

    /// Tracked selection follows the host; the content gets its own copy.
    fn seed_selection(&self) {
        let committed = self.committed_selection().unwrap_or_default();
        self.inner.selection.replace(committed.clone());
        if self.mode().is_multiple() || !committed.is_empty() {
            self.inner.renderer.set_selected_models(Some(committed));
        }
    }

    fn listen(&self, instance: &dyn HostedContent) {
        let weak = Arc::downgrade(&self.inner);
        let mut subscriptions = SubscriptionSet::new();

        if let Some(save) = instance.save_channel() {
            let weak = weak.clone();
            subscriptions.push(save.subscribe(move |entity: &Value| {
                if let Some(controller) = Self::from_weak(&weak) {
                    controller.on_save(entity.clone());
                }
            }));
        }

        if let Some(select) = instance.select_channel() {
            subscriptions.push(select.subscribe(move |payload: &SelectPayload| {
                if let Some(controller) = Self::from_weak(&weak) {
                    controller.on_select(payload.clone());
                }
            }));
        }

        *self.subscriptions() = subscriptions;
    }

    /// Close the dialog: release subscriptions, discard the mounted content
    /// and drop picks that were never confirmed.
    ///
    /// Overlay clicks are ignored when `close_on_overlay` is off. Escape counts
    /// as "selection finished" with the relation value left unchanged.
    pub fn close(&self, reason: CloseReason) {
        if !self.is_open() {
            return;
        }
        if reason == CloseReason::Overlay && !self.inner.config.close_on_overlay {
            return;
        }
        if reason == CloseReason::Escape {
            let unchanged = self
                .committed_selection()
                .unwrap_or_else(|| self.selected_elements());
            self.emit(DialogEvent::SelectionFinished(unchanged));
        }

        self.release_subscriptions();
        self.inner.renderer.discard();
        self.reset_selection_to_host();
        self.inner.state.set(DialogState::Closed);
        log::debug!("relation dialog `{}` closed ({reason:?})", self.field());
    }

    /// Save signal: forwarded as `Success`, the relation is left alone
    pub fn on_save(&self, entity: Value) {
        self.emit(DialogEvent::Success(entity));
    }

    /// Select signal.
    ///
    /// - `None`: ignored
    /// - multiple: host array and selection are cleared, then refilled one
    ///   entity at a time through `select_model_emit`
    /// - single: only the first entity is applied
    ///
    /// Then `SelectionFinished` carries the whole payload and the dialog closes.
    pub fn on_select(&self, payload: SelectPayload) {
        let Some(entities) = payload else {
            log::debug!("empty select payload for `{}` ignored", self.field());
            return;
        };

        match self.mode() {
            SelectionMode::Multiple => {
                if let Some(host) = self.host() {
                    host.set(self.field(), Value::Array(Vec::new()));
                }
                self.inner.selection.clear();
                for entity in &entities {
                    self.select_model_emit(entity.clone());
                }
            }
            SelectionMode::Single => {
                if entities.len() > 1 {
                    log::warn!(
                        "`{}` takes one entity, {} picked: keeping the first",
                        self.field(),
                        entities.len()
                    );
                }
                if let Some(first) = entities.first() {
                    self.select_model_emit(first.clone());
                }
            }
        }

        self.emit(DialogEvent::SelectionFinished(entities));
        self.close(CloseReason::SelectionFinished);
    }

    /// Apply one picked entity to the relation and emit `SelectModel`.
    ///
    /// Single mode writes the companion object and the id together and then
    /// emits `Selected(id)`. Multiple mode appends to the host array and to
    /// the selection; a collection already holding the entity is left as is.
    /// `SelectModel` is emitted even when neither collection changed, so it
    /// does not imply that the entity was appended.
    pub fn select_model_emit(&self, entity: Value) {
        let mut entity = entity;
        mark_selected(&mut entity);

        match self.mode() {
            SelectionMode::Single => {
                let id = entity_id(&entity).cloned().unwrap_or(Value::Null);
                if let Some(host) = self.host() {
                    host.set(self.companion_field(), entity.clone());
                    host.set(self.field(), id.clone());
                }
                self.emit(DialogEvent::SelectModel(entity));
                self.emit(DialogEvent::Selected(id));
            }
            SelectionMode::Multiple => {
                if let Some(host) = self.host() {
                    if host.array_contains(self.field(), &entity) {
                        log::debug!("`{}` already holds the entity", self.field());
                    } else {
                        host.push_to_array(self.field(), entity.clone());
                    }
                }
                if !self.inner.selection.contains(&entity) {
                    self.inner.selection.push(entity.clone());
                }
                self.emit(DialogEvent::SelectModel(entity));
            }
        }
    }

    /// Remove the first occurrence of `entity` from the host array field and
    /// from the selection, each on its own. Absent entities are ignored.
    pub fn delete_from_list(&self, entity: &Value) {
        if let Some(host) = self.host() {
            host.remove_first_from_array(self.field(), entity);
        }
        self.inner.selection.remove_first(entity);
        if self.inner.renderer.is_mounted() {
            self.inner.renderer.selection().remove_first(entity);
        }
    }
}
