//! # Chat Runner core
//!
//! Turns a free-form chat message into either plain text or a renderable
//! [`CodeBundle`] of markup, style and script.
//!
//! ## Features
//! - Fenced-block extraction (`html`, `css`, `js`/`javascript`) with `html` as the anchor
//! - Heuristic fallback for unfenced markup, stylesheets and scripts
//! - Optional bounded memoization owned by the caller
//! - Conversation message model, editor composition helpers, CSS lint and an example gallery
//!
//! ## Example
//! ```
//! use chatrunner_core::classify;
//!
//! let bundle = classify("```html\n<div class=\"test\">Hello</div>\n```").unwrap();
//! assert_eq!(bundle.markup(), "<div class=\"test\">Hello</div>");
//! assert_eq!(bundle.style(), "");
//!
//! assert!(classify("Hello world!").is_none());
//! ```

pub mod bundle;
pub mod classifier;
pub mod compose;
pub mod config;
pub mod error;
pub mod gallery;
pub mod lint;
pub mod message;

// --- Core types ---
pub use bundle::{CodeBundle, Fragment, SCRIPT_PLACEHOLDER_MARKUP, STYLE_PLACEHOLDER_MARKUP};
pub use classifier::{Classifier, ClassifierCache};
pub use config::{ChatConfig, ClassifierConfig, OverlapPolicy, PreviewConfig, RunnerConfig};
pub use error::{CoreError, CoreResult};
pub use message::{Message, MessageId, MessageKind, Sender};

// --- Supporting types ---
pub use compose::{EditorSections, Language};
pub use gallery::{CuratedExample, Example, Gallery, LanguageExamples};
pub use lint::{CssIssue, CssIssueKind};

/// Classify a message: `Some(bundle)` for renderable code, `None` for plain text.
pub fn classify(raw: &str) -> Option<CodeBundle> {
    classifier::classify(raw)
}

/// `true` when [`classify`] returns a bundle.
pub fn is_code(raw: &str) -> bool {
    classifier::is_code(raw)
}

/// Lint a stylesheet fragment, one issue per offending line.
pub fn lint_css(style: &str) -> Vec<CssIssue> {
    lint::lint_css(style)
}
