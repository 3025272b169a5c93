use serde::{Deserialize, Serialize};
use std::fmt;

/// Markup synthesized when a message is classified as a bare stylesheet.
pub const STYLE_PLACEHOLDER_MARKUP: &str = "<div>CSS Preview</div>";

/// Markup synthesized when a message is classified as a bare script.
pub const SCRIPT_PLACEHOLDER_MARKUP: &str = r#"<div id="output">JavaScript Output:</div>"#;

/// The three renderable fragments extracted from a chat message.
///
/// A bundle is built once, at classification time, and is read-only afterwards.
/// `markup` is the anchor fragment: a bundle without an explicit markup fragment
/// carries one of the placeholder snippets instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeBundle {
    #[serde(default)]
    markup: String,
    #[serde(default)]
    style: String,
    #[serde(default)]
    script: String,
}

impl CodeBundle {
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    /// Bundle for a message that is nothing but markup.
    pub fn markup_only(markup: impl Into<String>) -> Self {
        Self::new(markup, String::new(), String::new())
    }

    /// Bundle for a bare stylesheet, anchored on [`STYLE_PLACEHOLDER_MARKUP`].
    pub fn style_only(style: impl Into<String>) -> Self {
        Self::new(STYLE_PLACEHOLDER_MARKUP, style, String::new())
    }

    /// Bundle for a bare script, anchored on [`SCRIPT_PLACEHOLDER_MARKUP`].
    pub fn script_only(script: impl Into<String>) -> Self {
        Self::new(SCRIPT_PLACEHOLDER_MARKUP, String::new(), script)
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    /// Non-empty fragments in document order, for a "show code" view.
    pub fn fragments(&self) -> impl Iterator<Item = (Fragment, &str)> {
        [
            (Fragment::Markup, self.markup.as_str()),
            (Fragment::Style, self.style.as_str()),
            (Fragment::Script, self.script.as_str()),
        ]
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
    }

    /// Labeled plain-text rendering of every non-empty fragment.
    pub fn raw_view(&self) -> String {
        self.fragments()
            .map(|(fragment, text)| format!("{}:\n{}", fragment.label(), text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total size in characters across all three fragments.
    pub fn char_count(&self) -> usize {
        self.markup.chars().count() + self.style.chars().count() + self.script.chars().count()
    }
}

/// One of the three bundle slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fragment {
    Markup,
    Style,
    Script,
}

impl Fragment {
    pub fn label(self) -> &'static str {
        match self {
            Fragment::Markup => "HTML",
            Fragment::Style => "CSS",
            Fragment::Script => "JavaScript",
        }
    }

    /// Fence tag used when the fragment is written back out as a fenced block.
    pub fn fence_tag(self) -> &'static str {
        match self {
            Fragment::Markup => "html",
            Fragment::Style => "css",
            Fragment::Script => "javascript",
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_skip_empty_slots() {
        let bundle = CodeBundle::new("<p>hi</p>", "", "alert(1)");
        let kinds: Vec<Fragment> = bundle.fragments().map(|(f, _)| f).collect();
        assert_eq!(kinds, vec![Fragment::Markup, Fragment::Script]);
    }

    #[test]
    fn raw_view_labels_each_fragment() {
        let bundle = CodeBundle::new("<p>hi</p>", "p { color: red; }", "");
        assert_eq!(bundle.raw_view(), "HTML:\n<p>hi</p>\n\nCSS:\np { color: red; }");
    }

    #[test]
    fn placeholders_anchor_bare_fragments() {
        assert_eq!(CodeBundle::style_only("a{}").markup(), STYLE_PLACEHOLDER_MARKUP);
        assert_eq!(CodeBundle::script_only("let a = 1;").markup(), SCRIPT_PLACEHOLDER_MARKUP);
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let bundle: CodeBundle = serde_yaml::from_str("markup: <b>x</b>").unwrap();
        assert_eq!(bundle.style(), "");
        assert_eq!(bundle.script(), "");
    }
}
