use super::content::HostedContent;
use super::error::HostError;
use super::selection::Selection;
use super::slot::MountPoint;
use crate::shared::channel::EventChannel;
use contracts::shared::content::ContentDescriptor;
use leptos::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
struct Mounted {
    instance: Arc<dyn HostedContent>,
    mount_point: Arc<dyn MountPoint>,
}

/// Materializes content descriptors into a mounting point.
///
/// At most one instance is mounted per renderer: every `render` discards
/// what the previous call mounted and clears the target mounting point
/// before creating the new instance.
///
/// Failures never escape: they are logged, published on `diagnostics()`
/// and the call returns `None`.
#[derive(Clone)]
pub struct ContentRenderer {
    mounted: ArcRwSignal<Option<Mounted>>,
    selection: Selection,
    diagnostics: EventChannel<HostError>,
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRenderer {
    pub fn new() -> Self {
        Self {
            mounted: ArcRwSignal::new(None),
            selection: Selection::new(),
            diagnostics: EventChannel::new(),
        }
    }

    /// Working selection bound to the mounted content. Picks land here
    /// first; nothing outside the renderer reads it as committed state.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn diagnostics(&self) -> EventChannel<HostError> {
        self.diagnostics.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.with_untracked(Option::is_some)
    }

    pub fn mounted_instance(&self) -> Option<Arc<dyn HostedContent>> {
        self.mounted
            .with_untracked(|mounted| mounted.as_ref().map(|m| m.instance.clone()))
    }

    /// Mount `descriptor`. Returns `None` (and reports why) when nothing
    /// could be mounted.
    pub fn render(
        &self,
        descriptor: &ContentDescriptor,
        mount_point: Option<Arc<dyn MountPoint>>,
    ) -> Option<Arc<dyn HostedContent>> {
        match self.try_render(descriptor, mount_point) {
            Ok(instance) => Some(instance),
            Err(err) => {
                self.report(err);
                None
            }
        }
    }

    /// `render` without the reporting step
    pub fn try_render(
        &self,
        descriptor: &ContentDescriptor,
        mount_point: Option<Arc<dyn MountPoint>>,
    ) -> Result<Arc<dyn HostedContent>, HostError> {
        let mount_point = mount_point.ok_or(HostError::HostNotSet)?;

        self.discard();
        mount_point.clear();
        self.selection.clear();

        let content_type = descriptor.content_type();
        let instance = mount_point
            .create_instance(content_type)
            .ok_or_else(|| HostError::InstanceNotSet(content_type.clone()))?;

        instance.set_model(descriptor.config().model.clone());
        instance.bind_selection(self.selection.clone());

        if descriptor.is_list() {
            if let Err(err) = self.configure_list_capabilities(descriptor, instance.as_ref()) {
                self.report(err);
            }
        }

        instance.set_is_modal(true);

        log::debug!("mounted `{content_type}` ({})", descriptor.method());
        self.mounted.set(Some(Mounted {
            instance: instance.clone(),
            mount_point,
        }));
        Ok(instance)
    }

    fn configure_list_capabilities(
        &self,
        descriptor: &ContentDescriptor,
        instance: &dyn HostedContent,
    ) -> Result<(), HostError> {
        let incomplete = |reason| HostError::ConfigurationIncomplete {
            content_type: descriptor.content_type().clone(),
            reason,
        };
        let options = descriptor
            .config()
            .list
            .as_ref()
            .ok_or_else(|| incomplete("no list options"))?;
        let surface = instance
            .list_surface()
            .ok_or_else(|| incomplete("content has no list surface"))?;

        surface.set_multiple_select_enabled(options.multiple_select_enabled);
        surface.set_is_selection_list(options.is_selection_list);
        surface.set_load_data(options.load_data);
        surface.set_filter(options.effective_filter());

        if !options.selected_elements.is_empty() {
            self.selection.replace(options.selected_elements.clone());
        }

        if let Some(models) = options.preloaded_models() {
            surface.set_models(models.to_vec());
            surface.data_arrived(Uuid::new_v4());
        }
        Ok(())
    }

    /// Unmount the current instance, if any
    pub fn discard(&self) {
        let previous = self.mounted.with_untracked(Option::clone);
        if let Some(previous) = previous {
            self.mounted.set(None);
            previous.mount_point.clear();
        }
    }

    /// Selected entities of the mounted content, `[]` when nothing is mounted
    pub fn get_selected_models(&self) -> Vec<Value> {
        if self.is_mounted() {
            self.selection.get()
        } else {
            Vec::new()
        }
    }

    /// Replace the selection of the mounted content and refresh its view.
    /// No-op when nothing is mounted.
    pub fn set_selected_models(&self, models: Option<Vec<Value>>) -> &Self {
        let mount_point = self
            .mounted
            .with_untracked(|mounted| mounted.as_ref().map(|m| m.mount_point.clone()));
        if let Some(mount_point) = mount_point {
            self.selection.replace(models.unwrap_or_default());
            mount_point.refresh();
        }
        self
    }

    pub fn reset_selected_models(&self) -> &Self {
        if self.is_mounted() {
            self.selection.clear();
        }
        self
    }

    pub(crate) fn report(&self, err: HostError) {
        err.log();
        self.diagnostics.emit(&err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic_host::content::ContentRegistry;
    use crate::dynamic_host::slot::ContentSlot;
    use crate::dynamic_host::testing::{last_created, recording_registry, Created, FORM, LIST};
    use contracts::shared::content::{ContentConfig, DialogMethod, ListOptions};
    use serde_json::{json, Map};
    use std::sync::Mutex;

    fn setup() -> (ContentRenderer, ContentSlot, Created) {
        let (registry, created) = recording_registry();
        let slot = ContentSlot::new(Arc::new(registry));
        (ContentRenderer::new(), slot, created)
    }

    fn collect_diagnostics(renderer: &ContentRenderer) -> (Arc<Mutex<Vec<HostError>>>, crate::shared::channel::Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_for_handler = seen.clone();
        let sub = renderer
            .diagnostics()
            .subscribe(move |err: &HostError| seen_for_handler.lock().unwrap().push(err.clone()));
        (seen, sub)
    }

    #[test]
    fn test_render_without_mount_point_reports_host_not_set() {
        let (renderer, _slot, created) = setup();
        let (seen, _sub) = collect_diagnostics(&renderer);

        let result = renderer.render(&ContentDescriptor::create_edit(FORM, None), None);

        assert!(result.is_none());
        assert!(!renderer.is_mounted());
        assert!(created.lock().unwrap().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![HostError::HostNotSet]);
    }

    #[test]
    fn test_unknown_content_type_reports_instance_not_set() {
        let (renderer, slot, _created) = setup();
        let (seen, _sub) = collect_diagnostics(&renderer);

        let result = renderer.render(
            &ContentDescriptor::create_edit("unknown", None),
            Some(slot.as_mount_point()),
        );

        assert!(result.is_none());
        assert_eq!(
            renderer
                .try_render(&ContentDescriptor::create_edit("unknown", None), Some(slot.as_mount_point()))
                .err(),
            Some(HostError::InstanceNotSet("unknown".into()))
        );
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(!slot.is_occupied());
    }

    #[test]
    fn test_declining_factory_reports_instance_not_set() {
        let mut registry = ContentRegistry::new();
        registry.register_fallible("unavailable", || None);
        let slot = ContentSlot::new(Arc::new(registry));
        let renderer = ContentRenderer::new();
        let (seen, _sub) = collect_diagnostics(&renderer);

        let result = renderer.render(
            &ContentDescriptor::create_edit("unavailable", None),
            Some(slot.as_mount_point()),
        );

        assert!(result.is_none());
        assert!(!renderer.is_mounted());
        assert!(!slot.is_occupied());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![HostError::InstanceNotSet("unavailable".into())]
        );
    }

    #[test]
    fn test_render_replaces_previous_instance() {
        let (renderer, slot, created) = setup();
        let descriptor = ContentDescriptor::create_edit(FORM, Some(json!({"id": 1})));

        let first = renderer.render(&descriptor, Some(slot.as_mount_point())).unwrap();
        let second = renderer.render(&descriptor, Some(slot.as_mount_point())).unwrap();

        assert_eq!(created.lock().unwrap().len(), 2);
        let mounted = slot.mounted().unwrap();
        assert!(Arc::ptr_eq(&mounted, &second));
        assert!(!Arc::ptr_eq(&mounted, &first));
        assert!(Arc::ptr_eq(&renderer.mounted_instance().unwrap(), &second));
    }

    #[test]
    fn test_render_into_other_slot_clears_previous_slot() {
        let (registry, _created) = recording_registry();
        let registry = Arc::new(registry);
        let first_slot = ContentSlot::new(registry.clone());
        let second_slot = ContentSlot::new(registry);
        let renderer = ContentRenderer::new();
        let descriptor = ContentDescriptor::create_edit(FORM, None);

        renderer.render(&descriptor, Some(first_slot.as_mount_point()));
        renderer.render(&descriptor, Some(second_slot.as_mount_point()));

        assert!(!first_slot.is_occupied());
        assert!(second_slot.is_occupied());
    }

    #[test]
    fn test_create_edit_render_applies_model_and_modal_flag() {
        let (renderer, slot, created) = setup();
        let model = json!({"id": 3, "name": "Bug"});

        renderer.render(
            &ContentDescriptor::create_edit(FORM, Some(model.clone())),
            Some(slot.as_mount_point()),
        );

        let recorded = last_created(&created).recorded();
        assert_eq!(recorded.model, Some(model));
        assert_eq!(recorded.is_modal, Some(true));
        assert_eq!(recorded.multiple_select_enabled, None);
        assert!(last_created(&created).bound_selection().is_some());
    }

    #[test]
    fn test_list_render_with_preloaded_models() {
        let (renderer, slot, created) = setup();
        let models = vec![json!({"id": "m1"}), json!({"id": "m2"})];
        let descriptor = ContentDescriptor::list(
            LIST,
            ListOptions {
                multiple_select_enabled: true,
                is_selection_list: true,
                load_data: false,
                models: Some(models.clone()),
                ..Default::default()
            },
        );

        renderer.render(&descriptor, Some(slot.as_mount_point())).unwrap();

        let recorded = last_created(&created).recorded();
        assert_eq!(recorded.models, Some(models));
        assert_eq!(recorded.nonces.len(), 1);
        assert!(!recorded.nonces[0].is_nil());
        assert_eq!(recorded.multiple_select_enabled, Some(true));
        assert_eq!(recorded.is_selection_list, Some(true));
        assert_eq!(recorded.load_data, Some(false));
        assert_eq!(recorded.filter, Some(Map::new()));
        assert_eq!(recorded.is_modal, Some(true));
    }

    #[test]
    fn test_list_render_loading_own_data_ignores_models() {
        let (renderer, slot, created) = setup();
        let mut filter = Map::new();
        filter.insert("archived".to_string(), json!(false));
        let descriptor = ContentDescriptor::list(
            LIST,
            ListOptions {
                load_data: true,
                filter: Some(filter.clone()),
                models: Some(vec![json!({"id": 1})]),
                ..Default::default()
            },
        );

        renderer.render(&descriptor, Some(slot.as_mount_point())).unwrap();

        let recorded = last_created(&created).recorded();
        assert_eq!(recorded.models, None);
        assert!(recorded.nonces.is_empty());
        assert_eq!(recorded.filter, Some(filter));
    }

    #[test]
    fn test_list_render_without_options_is_incomplete_but_mounted() {
        let (renderer, slot, created) = setup();
        let (seen, _sub) = collect_diagnostics(&renderer);
        let descriptor = ContentDescriptor::new(LIST, DialogMethod::List, ContentConfig::default());

        let result = renderer.render(&descriptor, Some(slot.as_mount_point()));

        assert!(result.is_some());
        let recorded = last_created(&created).recorded();
        assert_eq!(recorded.is_modal, Some(true));
        assert_eq!(recorded.multiple_select_enabled, None);
        assert!(matches!(
            seen.lock().unwrap().as_slice(),
            [HostError::ConfigurationIncomplete { .. }]
        ));
    }

    #[test]
    fn test_list_descriptor_on_form_content_is_incomplete() {
        let (renderer, slot, _created) = setup();
        let (seen, _sub) = collect_diagnostics(&renderer);

        let result = renderer.render(
            &ContentDescriptor::list(FORM, ListOptions::default()),
            Some(slot.as_mount_point()),
        );

        assert!(result.is_some());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_initial_selected_elements_seed_selection() {
        let (renderer, slot, _created) = setup();
        let descriptor = ContentDescriptor::list(
            LIST,
            ListOptions {
                selected_elements: vec![json!({"id": 9})],
                ..Default::default()
            },
        );

        renderer.render(&descriptor, Some(slot.as_mount_point()));

        assert_eq!(renderer.get_selected_models(), vec![json!({"id": 9})]);
    }

    #[test]
    fn test_selected_models_require_mounted_content() {
        let (renderer, slot, _created) = setup();

        renderer.set_selected_models(Some(vec![json!({"id": 1})]));
        assert!(renderer.get_selected_models().is_empty());
        assert!(renderer.selection().is_empty());

        renderer.render(&ContentDescriptor::create_edit(FORM, None), Some(slot.as_mount_point()));
        let revision = slot.revision();

        renderer.set_selected_models(Some(vec![json!({"id": 1})]));
        assert_eq!(renderer.get_selected_models(), vec![json!({"id": 1})]);
        assert_eq!(slot.revision(), revision + 1);

        renderer.set_selected_models(None);
        assert!(renderer.get_selected_models().is_empty());

        renderer
            .set_selected_models(Some(vec![json!({"id": 2})]))
            .reset_selected_models();
        assert!(renderer.get_selected_models().is_empty());
    }

    #[test]
    fn test_content_sees_renderer_selection() {
        let (renderer, slot, created) = setup();
        renderer.render(&ContentDescriptor::list(LIST, ListOptions::default()), Some(slot.as_mount_point()));

        renderer.set_selected_models(Some(vec![json!({"id": 4})]));

        let bound = last_created(&created).bound_selection().unwrap();
        assert_eq!(bound.get(), vec![json!({"id": 4})]);
    }

    #[test]
    fn test_discard_clears_slot() {
        let (renderer, slot, _created) = setup();
        renderer.render(&ContentDescriptor::create_edit(FORM, None), Some(slot.as_mount_point()));

        renderer.discard();

        assert!(!renderer.is_mounted());
        assert!(!slot.is_occupied());
        assert!(renderer.get_selected_models().is_empty());
    }
}
