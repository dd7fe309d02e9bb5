//! Dynamic content host
//!
//! Mounts externally supplied content into a mounting point at runtime and
//! configures it through one capability contract, whatever the content is.
//!
//! ```rust,ignore
//! let mut registry = ContentRegistry::new();
//! registry.register("tag-list", || Arc::new(EntityPickerList::new("Теги")) as Arc<dyn HostedContent>);
//! let slot = ContentSlot::new(Arc::new(registry));
//!
//! let renderer = ContentRenderer::new();
//! renderer.render(&ContentDescriptor::list("tag-list", options), Some(slot.as_mount_point()));
//!
//! view! { <ContentOutlet target=slot /> }
//! ```

pub mod content;
pub mod error;
pub mod renderer;
pub mod selection;
pub mod slot;

#[cfg(test)]
pub(crate) mod testing;

pub use content::{ContentFactory, ContentRegistry, HostedContent, ListSurface, SelectPayload};
pub use error::HostError;
pub use renderer::ContentRenderer;
pub use selection::Selection;
pub use slot::{ContentOutlet, ContentSlot, MountPoint};
