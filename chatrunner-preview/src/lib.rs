//! # Chat Runner preview
//!
//! Renders a [`CodeBundle`](chatrunner_core::CodeBundle) inside an isolated
//! browsing context and re-renders it from scratch whenever the bundle changes.
//!
//! The isolation is a display sandbox, not a security boundary. A frame
//! sandboxed with `allow-scripts` alone runs in an opaque origin and cannot
//! navigate or script the host page. Before user code runs, the containment
//! prelude tries to shadow `parent`/`top`/`opener`/`frameElement` and disables
//! `window.open`. Engines that keep `window.top` unforgeable reject the
//! override silently, so the prelude narrows access but the sandbox is what
//! actually keeps the host out of reach. User code can still issue
//! network requests, use whatever storage an opaque origin gets, and spin the
//! CPU. Script errors stay inside the frame and surface only in its console.
//!
//! ## Example
//! ```
//! use chatrunner_core::{classify, PreviewConfig};
//! use chatrunner_preview::{PreviewRenderer, RenderOutcome, SrcdocFrameHost};
//! use std::sync::Arc;
//!
//! let config = PreviewConfig::default();
//! let host = Arc::new(SrcdocFrameHost::new(&config).unwrap());
//! let mut renderer = PreviewRenderer::new(host.clone(), config);
//!
//! let bundle = classify("<h1>Hi</h1>").unwrap();
//! let outcome = renderer.render(&bundle).unwrap();
//! assert!(matches!(outcome, RenderOutcome::Mounted(_)));
//! assert!(host.frame_markup(outcome.handle()).unwrap().contains("sandbox=\"allow-scripts\""));
//! ```

pub mod document;
pub mod error;
pub mod host;
pub mod isolation;
pub mod renderer;
pub mod sandbox;

pub use document::{assemble, PreviewDocument, CONTAINMENT_PRELUDE};
pub use error::{PreviewError, PreviewResult};
pub use host::{MountedFrame, SrcdocFrameHost};
pub use isolation::{ContextHandle, IsolationProvider};
pub use renderer::{PreviewRenderer, RenderOutcome};
pub use sandbox::{SandboxFlags, SandboxToken};
