use chatrunner_core::{CodeBundle, PreviewConfig};
use tracing::{debug, warn};

use crate::document::assemble;
use crate::error::PreviewResult;
use crate::isolation::{ContextHandle, IsolationProvider};

/// What a call to [`PreviewRenderer::render`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// First mount into an empty slot.
    Mounted(ContextHandle),
    /// The bundle changed: the old context was torn down and a fresh one mounted.
    Remounted {
        previous: ContextHandle,
        handle: ContextHandle,
    },
    /// Same markup, style and script as the live context; nothing happened.
    Unchanged(ContextHandle),
}

impl RenderOutcome {
    pub fn handle(&self) -> ContextHandle {
        match *self {
            RenderOutcome::Mounted(handle) => handle,
            RenderOutcome::Remounted { handle, .. } => handle,
            RenderOutcome::Unchanged(handle) => handle,
        }
    }
}

struct LiveContext {
    bundle: CodeBundle,
    handle: ContextHandle,
}

/// Owns one preview slot. Any change to the bundle replaces the whole isolated
/// context; there is no patching inside a running document. Dropping the
/// renderer unmounts whatever it still holds.
pub struct PreviewRenderer<P: IsolationProvider> {
    provider: P,
    config: PreviewConfig,
    live: Option<LiveContext>,
    renders: u64,
}

impl<P: IsolationProvider> PreviewRenderer<P> {
    pub fn new(provider: P, config: PreviewConfig) -> Self {
        Self {
            provider,
            config,
            live: None,
            renders: 0,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Handle of the live context, if one is mounted.
    pub fn handle(&self) -> Option<ContextHandle> {
        self.live.as_ref().map(|live| live.handle)
    }

    /// Number of contexts this renderer has mounted so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn render(&mut self, bundle: &CodeBundle) -> PreviewResult<RenderOutcome> {
        if let Some(live) = &self.live {
            if live.bundle == *bundle {
                return Ok(RenderOutcome::Unchanged(live.handle));
            }
        }

        let previous = match self.live.take() {
            Some(live) => {
                self.provider.unmount(live.handle)?;
                Some(live.handle)
            }
            None => None,
        };

        let document = assemble(bundle, &self.config)?;
        let handle = self.provider.mount(&document)?;
        self.live = Some(LiveContext {
            bundle: bundle.clone(),
            handle,
        });
        self.renders += 1;
        debug!(%handle, renders = self.renders, "preview rendered");

        Ok(match previous {
            Some(previous) => RenderOutcome::Remounted { previous, handle },
            None => RenderOutcome::Mounted(handle),
        })
    }

    /// Tear down the live context. Returns `false` when the slot was already empty.
    pub fn unmount(&mut self) -> PreviewResult<bool> {
        match self.live.take() {
            Some(live) => {
                self.provider.unmount(live.handle)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<P: IsolationProvider> Drop for PreviewRenderer<P> {
    fn drop(&mut self) {
        if let Some(live) = self.live.take() {
            if let Err(e) = self.provider.unmount(live.handle) {
                warn!(handle = %live.handle, error = %e, "failed to unmount preview on drop");
            }
        }
    }
}
