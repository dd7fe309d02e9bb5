use super::content::{ContentRegistry, HostedContent};
use contracts::shared::content::ContentTypeId;
use leptos::prelude::*;
use std::sync::Arc;

/// Runtime slot content is attached to and detached from
pub trait MountPoint: Send + Sync {
    /// Detach whatever is mounted
    fn clear(&self);

    /// Build and attach an instance of `content_type`
    fn create_instance(&self, content_type: &ContentTypeId) -> Option<Arc<dyn HostedContent>>;

    /// Re-render the mounted content now
    fn refresh(&self) {}
}

/// Registry-backed mounting point rendered by `ContentOutlet`.
///
/// Holds at most one instance; `create_instance` replaces the previous one.
#[derive(Clone)]
pub struct ContentSlot {
    registry: Arc<ContentRegistry>,
    mounted: ArcRwSignal<Option<Arc<dyn HostedContent>>>,
    revision: ArcRwSignal<u64>,
}

impl ContentSlot {
    pub fn new(registry: Arc<ContentRegistry>) -> Self {
        Self {
            registry,
            mounted: ArcRwSignal::new(None),
            revision: ArcRwSignal::new(0),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.mounted.with_untracked(Option::is_some)
    }

    pub fn mounted(&self) -> Option<Arc<dyn HostedContent>> {
        self.mounted.get_untracked()
    }

    pub fn revision(&self) -> u64 {
        self.revision.get_untracked()
    }

    /// Shareable handle for `ContentRenderer::render`
    pub fn as_mount_point(&self) -> Arc<dyn MountPoint> {
        Arc::new(self.clone())
    }
}

impl MountPoint for ContentSlot {
    fn clear(&self) {
        if self.is_occupied() {
            self.mounted.set(None);
        }
    }

    fn create_instance(&self, content_type: &ContentTypeId) -> Option<Arc<dyn HostedContent>> {
        let instance = self.registry.create(content_type)?;
        self.mounted.set(Some(instance.clone()));
        Some(instance)
    }

    fn refresh(&self) {
        self.revision.update(|revision| *revision += 1);
    }
}

/// Renders the content currently mounted in `target`
#[component]
pub fn ContentOutlet(target: ContentSlot) -> impl IntoView {
    let mounted = target.mounted.clone();
    let revision = target.revision.clone();

    move || {
        revision.track();
        mounted.get().map(|content| content.view())
    }
}
