//! The one platform seam of the preview: somewhere to run a synthesized
//! document in its own browsing context.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::document::PreviewDocument;
use crate::error::PreviewResult;

/// Identifies one mounted isolated context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContextHandle(Uuid);

impl ContextHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ContextHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provides isolated execution contexts: a separate global scope, no top-level
/// navigation, and no usable reference back to the host page.
///
/// `unmount` must tear the context down synchronously; nothing started inside
/// it may outlive the call.
pub trait IsolationProvider {
    fn mount(&self, document: &PreviewDocument) -> PreviewResult<ContextHandle>;

    fn unmount(&self, handle: ContextHandle) -> PreviewResult<()>;
}

impl<P: IsolationProvider + ?Sized> IsolationProvider for std::sync::Arc<P> {
    fn mount(&self, document: &PreviewDocument) -> PreviewResult<ContextHandle> {
        (**self).mount(document)
    }

    fn unmount(&self, handle: ContextHandle) -> PreviewResult<()> {
        (**self).unmount(handle)
    }
}
