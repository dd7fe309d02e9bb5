use contracts::shared::content::{ContentTypeId, DialogMethod};
use thiserror::Error;

/// Configuration problems found while hosting content.
///
/// None of these are fatal: they are logged, published on the renderer's
/// diagnostics channel and the operation degrades to "nothing rendered".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("mounting point is not set")]
    HostNotSet,

    #[error("content type `{0}` produced no instance")]
    InstanceNotSet(ContentTypeId),

    #[error("no content descriptor for the `{0}` method")]
    DescriptorMissing(DialogMethod),

    #[error("list configuration skipped for `{content_type}`: {reason}")]
    ConfigurationIncomplete {
        content_type: ContentTypeId,
        reason: &'static str,
    },
}

impl HostError {
    /// Incomplete configuration still renders; everything else renders nothing
    pub fn is_render_failure(&self) -> bool {
        !matches!(self, HostError::ConfigurationIncomplete { .. })
    }

    pub fn log(&self) {
        if self.is_render_failure() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }
    }
}
