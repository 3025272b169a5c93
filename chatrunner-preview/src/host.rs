//! Isolation provider backed by sandboxed `<iframe srcdoc>` elements.
//! One frame per mounted context; the host page only ever sees escaped markup.

use chatrunner_core::PreviewConfig;
use dashmap::DashMap;
use std::fmt::Write;
use tracing::debug;

use crate::document::{escape_attribute, escape_html, PreviewDocument};
use crate::error::{PreviewError, PreviewResult};
use crate::isolation::{ContextHandle, IsolationProvider};
use crate::sandbox::SandboxFlags;

/// A mounted frame: the element markup the host places in its slot.
#[derive(Debug, Clone)]
pub struct MountedFrame {
    pub markup: String,
    /// Size of the synthesized document, for diagnostics.
    pub document_len: usize,
}

/// Mounted frames keyed by handle.
pub type FrameStore = DashMap<ContextHandle, MountedFrame>;

pub struct SrcdocFrameHost {
    frames: FrameStore,
    flags: SandboxFlags,
    title: String,
    frame_height: u32,
    min_height: u32,
}

impl SrcdocFrameHost {
    pub fn new(config: &PreviewConfig) -> PreviewResult<Self> {
        Ok(Self {
            frames: DashMap::new(),
            flags: SandboxFlags::parse(config.sandbox.as_slice())?,
            title: config.title.clone(),
            frame_height: config.frame_height,
            min_height: config.min_height,
        })
    }

    pub fn flags(&self) -> &SandboxFlags {
        &self.flags
    }

    pub fn is_mounted(&self, handle: ContextHandle) -> bool {
        self.frames.contains_key(&handle)
    }

    pub fn mounted_count(&self) -> usize {
        self.frames.len()
    }

    /// `<iframe>` element for a mounted context.
    pub fn frame_markup(&self, handle: ContextHandle) -> Option<String> {
        self.frames.get(&handle).map(|frame| frame.markup.clone())
    }

    /// Minimal host page embedding one mounted context, for standalone viewing.
    pub fn host_page(&self, handle: ContextHandle) -> PreviewResult<String> {
        let frame = self
            .frame_markup(handle)
            .ok_or(PreviewError::UnknownContext(handle))?;

        let mut page = String::new();
        write!(
            page,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{}</title>
</head>
<body style="margin:0;padding:16px;background:#f3f4f6;">
{}
</body>
</html>
"#,
            escape_html(&self.title),
            frame
        )
        .map_err(|e| PreviewError::Assembly(e.to_string()))?;
        Ok(page)
    }

    fn frame_element(&self, handle: ContextHandle, document: &PreviewDocument) -> String {
        format!(
            r#"<iframe data-context="{}" sandbox="{}" srcdoc="{}" title="{}" referrerpolicy="no-referrer" style="width:100%;height:{}px;min-height:{}px;border:0;background:#fff;"></iframe>"#,
            handle,
            self.flags.attribute_value(),
            escape_attribute(document.as_str()),
            escape_attribute(&self.title),
            self.frame_height,
            self.min_height,
        )
    }
}

impl IsolationProvider for SrcdocFrameHost {
    fn mount(&self, document: &PreviewDocument) -> PreviewResult<ContextHandle> {
        let handle = ContextHandle::new();
        let markup = self.frame_element(handle, document);
        self.frames.insert(
            handle,
            MountedFrame {
                markup,
                document_len: document.len(),
            },
        );
        debug!(%handle, bytes = document.len(), sandbox = %self.flags, "mounted preview frame");
        Ok(handle)
    }

    fn unmount(&self, handle: ContextHandle) -> PreviewResult<()> {
        match self.frames.remove(&handle) {
            Some(_) => {
                debug!(%handle, "unmounted preview frame");
                Ok(())
            }
            None => Err(PreviewError::UnknownContext(handle)),
        }
    }
}
