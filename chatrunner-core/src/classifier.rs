//! Decides whether a chat message is prose or renderable code.
//!
//! Classification runs in two stages. Fenced blocks come first: a block tagged
//! `html` is authoritative and becomes the bundle's markup, with optional `css`
//! and `js`/`javascript` blocks filling the other two slots. Without an `html`
//! fence the trimmed message goes through heuristics, strictly in this order:
//!
//! 1. an HTML tag anywhere → the whole message is markup
//! 2. a complete HTML document → the whole message is markup
//! 3. a CSS rule, no tag, no script signal → stylesheet behind a placeholder
//! 4. a script signal, no tag → script behind a placeholder
//! 5. otherwise → plain text
//!
//! A message that carries `css` or `js` fences but no `html` fence and no tag
//! is plain text: markup is the anchor of a renderable bundle. Tags still win
//! over such fences through step 1.
//!
//! A CSS rule needs a selector and at least one `property:` inside its block.
//! Empty rules such as `h1 {}` are treated as prose.

use lru::LruCache;
use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::OnceLock;
use tracing::{debug, trace};

use crate::bundle::CodeBundle;
use crate::config::ClassifierConfig;

fn html_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)```html\b\s*([\s\S]*?)\s*```").unwrap())
}

fn css_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)```css\b\s*([\s\S]*?)\s*```").unwrap())
}

fn script_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)```(?:javascript|js)\b\s*([\s\S]*?)\s*```").unwrap())
}

fn html_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn html_document() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<!DOCTYPE html>|<html[\s\S]*</html>").unwrap())
}

// A selector followed by a block holding at least one `property:`.
fn css_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\s{}][^{}]*\{[^{}]*[\w-]\s*:[^{}]*\}").unwrap())
}

// Declarations must look like declarations ("let x =", "function f("), so prose
// such as "let me know" or "the document. Then" stays prose.
fn script_signal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(?:const|let|var)\s+(?:[A-Za-z_$][\w$]*\s*[=;,]|[\[{])|\bfunction\b\s*[\w$]*\s*\(|\b(?:console|document|window)\.[A-Za-z_$]|\balert\(",
        )
        .unwrap()
    })
}

/// Trimmed inner text of the first `html` fence, if any.
pub fn markup_fence(raw: &str) -> Option<&str> {
    first_capture(html_fence(), raw)
}

/// Trimmed inner text of the first `css` fence, if any.
pub fn style_fence(raw: &str) -> Option<&str> {
    first_capture(css_fence(), raw)
}

/// Trimmed inner text of the first `js` or `javascript` fence, if any.
pub fn script_fence_contents(raw: &str) -> Option<&str> {
    first_capture(script_fence(), raw)
}

fn first_capture<'a>(re: &Regex, raw: &'a str) -> Option<&'a str> {
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Signals found by the heuristic stage, kept separate so callers can explain a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub html_tag: bool,
    pub html_document: bool,
    pub css_rule: bool,
    pub script: bool,
}

impl Signals {
    pub fn scan(trimmed: &str) -> Self {
        Self {
            html_tag: html_tag().is_match(trimmed),
            html_document: html_document().is_match(trimmed),
            css_rule: css_rule().is_match(trimmed),
            script: script_signal().is_match(trimmed),
        }
    }

    fn looks_like_html(&self) -> bool {
        self.html_tag || self.html_document
    }
}

/// Classify a message without any caching. Total over all inputs.
pub fn classify(raw: &str) -> Option<CodeBundle> {
    let trimmed = raw.trim();

    if let Some(markup) = markup_fence(trimmed) {
        return Some(CodeBundle::new(
            markup,
            style_fence(trimmed).unwrap_or_default(),
            script_fence_contents(trimmed).unwrap_or_default(),
        ));
    }

    let signals = Signals::scan(trimmed);
    if signals.looks_like_html() {
        return Some(CodeBundle::markup_only(trimmed));
    }

    if css_fence().is_match(trimmed) || script_fence().is_match(trimmed) {
        return None;
    }

    if signals.css_rule && !signals.script {
        Some(CodeBundle::style_only(trimmed))
    } else if signals.script {
        Some(CodeBundle::script_only(trimmed))
    } else {
        None
    }
}

/// `true` when [`classify`] would produce a bundle.
pub fn is_code(raw: &str) -> bool {
    classify(raw).is_some()
}

/// Bounded memo of classification results keyed on the exact raw message.
///
/// Owned by whoever owns the [`Classifier`]; dropping or clearing it never
/// changes a result, only how often the patterns run.
pub struct ClassifierCache {
    entries: LruCache<String, Option<CodeBundle>>,
    hits: u64,
    misses: u64,
}

impl ClassifierCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// `None` for a zero capacity, which means "no cache".
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    fn get_or_classify(&mut self, raw: &str) -> Option<CodeBundle> {
        if let Some(cached) = self.entries.get(raw) {
            self.hits += 1;
            trace!(len = raw.len(), "classification cache hit");
            return cached.clone();
        }
        self.misses += 1;
        let result = classify(raw);
        self.entries.put(raw.to_string(), result.clone());
        result
    }
}

/// Classification entry point with an optional injected cache.
#[derive(Default)]
pub struct Classifier {
    cache: Option<ClassifierCache>,
}

impl Classifier {
    /// Classifier that recomputes every call.
    pub fn new() -> Self {
        Self { cache: None }
    }

    pub fn with_cache(cache: ClassifierCache) -> Self {
        Self { cache: Some(cache) }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            cache: ClassifierCache::with_capacity(config.cache_capacity),
        }
    }

    pub fn classify(&mut self, raw: &str) -> Option<CodeBundle> {
        let result = match self.cache.as_mut() {
            Some(cache) => cache.get_or_classify(raw),
            None => classify(raw),
        };
        match &result {
            Some(bundle) => debug!(
                markup = bundle.markup().len(),
                style = bundle.style().len(),
                script = bundle.script().len(),
                "message classified as code"
            ),
            None => debug!(len = raw.len(), "message classified as text"),
        }
        result
    }

    pub fn is_code(&mut self, raw: &str) -> bool {
        self.classify(raw).is_some()
    }

    pub fn cache(&self) -> Option<&ClassifierCache> {
        self.cache.as_ref()
    }

    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{SCRIPT_PLACEHOLDER_MARKUP, STYLE_PLACEHOLDER_MARKUP};

    #[test]
    fn tag_wins_over_brace_block() {
        let raw = "<style>p { color: red; }</style><p>x</p>";
        assert_eq!(classify(raw), Some(CodeBundle::markup_only(raw)));
    }

    #[test]
    fn brace_block_with_script_signal_is_script() {
        let raw = "function add(a, b) { return a + b; }";
        let bundle = classify(raw).unwrap();
        assert_eq!(bundle.markup(), SCRIPT_PLACEHOLDER_MARKUP);
        assert_eq!(bundle.script(), raw);
        assert_eq!(bundle.style(), "");
    }

    #[test]
    fn bare_rule_is_style() {
        let bundle = classify("  .card { padding: 4px; }\n").unwrap();
        assert_eq!(bundle.markup(), STYLE_PLACEHOLDER_MARKUP);
        assert_eq!(bundle.style(), ".card { padding: 4px; }");
    }

    #[test]
    fn prose_with_keyword_lookalikes_is_text() {
        assert_eq!(classify("let me know if the document. Then we talk"), None);
        assert_eq!(classify("the function of a variable is obvious"), None);
    }

    #[test]
    fn braces_without_declarations_are_not_a_rule() {
        assert_eq!(classify("def greet(name):\n    return f\"Hello, {name}!\""), None);
        assert_eq!(classify("use {curly} braces in templates"), None);
    }

    #[test]
    fn empty_rule_is_prose() {
        assert_eq!(classify("h1 {}"), None);
        assert_eq!(classify("body { }"), None);
    }

    #[test]
    fn json_fence_is_not_a_script_fence() {
        assert_eq!(script_fence_contents("```json\n{\"a\": 1}\n```"), None);
    }

    #[test]
    fn fence_tags_are_case_insensitive() {
        let raw = "```HTML\n<b>x</b>\n```\n```JS\nalert(1)\n```";
        let bundle = classify(raw).unwrap();
        assert_eq!(bundle.markup(), "<b>x</b>");
        assert_eq!(bundle.script(), "alert(1)");
    }

    #[test]
    fn first_fence_of_each_kind_wins() {
        let raw = "```html\n<i>1</i>\n```\n```html\n<i>2</i>\n```\n```css\na{}\n```\n```css\nb{}\n```";
        let bundle = classify(raw).unwrap();
        assert_eq!(bundle.markup(), "<i>1</i>");
        assert_eq!(bundle.style(), "a{}");
    }

    #[test]
    fn cache_counts_hits_and_stays_bounded() {
        let mut classifier = Classifier::with_cache(ClassifierCache::with_capacity(2).unwrap());
        classifier.classify("<b>a</b>");
        classifier.classify("<b>a</b>");
        classifier.classify("plain");
        classifier.classify("more plain");

        let cache = classifier.cache().unwrap();
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 3);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let classifier = Classifier::from_config(&ClassifierConfig { cache_capacity: 0 });
        assert!(classifier.cache().is_none());
    }
}
