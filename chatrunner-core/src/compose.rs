//! Normalizes multi-part editor input into the fenced-block message format.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bundle::Fragment;
use crate::classifier::{markup_fence, script_fence_contents, style_fence};

/// Languages offered by the editor. Only the web languages are ever rendered;
/// the rest travel as static text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Html,
    Css,
    Python,
    Java,
    Cpp,
    Csharp,
    Php,
    Ruby,
    Go,
    Rust,
    Swift,
    Kotlin,
    Typescript,
}

impl Language {
    pub const ALL: [Language; 14] = [
        Language::Javascript,
        Language::Html,
        Language::Css,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::Csharp,
        Language::Php,
        Language::Ruby,
        Language::Go,
        Language::Rust,
        Language::Swift,
        Language::Kotlin,
        Language::Typescript,
    ];

    /// Fence tag for this language.
    pub fn tag(self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Html => "html",
            Language::Css => "css",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Csharp => "csharp",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Typescript => "typescript",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.tag().eq_ignore_ascii_case(tag))
    }

    /// Web languages use the three-section editor (markup, style, script).
    pub fn is_web(self) -> bool {
        matches!(self, Language::Html | Language::Javascript)
    }
}

/// Contents of the multi-part editor. For non-web languages only `markup` is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSections {
    pub markup: String,
    pub style: String,
    pub script: String,
}

impl EditorSections {
    pub fn is_blank(&self) -> bool {
        self.markup.trim().is_empty() && self.style.trim().is_empty() && self.script.trim().is_empty()
    }
}

fn fenced(tag: &str, code: &str) -> String {
    format!("```{}\n{}\n```", tag, code.trim())
}

/// Join the non-blank sections into `html`, `css`, `javascript` fences.
pub fn compose_web_sections(markup: &str, style: &str, script: &str) -> Option<String> {
    let sections: Vec<String> = [
        (Fragment::Markup, markup),
        (Fragment::Style, style),
        (Fragment::Script, script),
    ]
    .into_iter()
    .filter(|(_, code)| !code.trim().is_empty())
    .map(|(fragment, code)| fenced(fragment.fence_tag(), code))
    .collect();

    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n\n"))
    }
}

/// Single fence tagged with `language`; `None` when `code` is blank.
pub fn compose_single_section(language: Language, code: &str) -> Option<String> {
    if code.trim().is_empty() {
        return None;
    }
    Some(fenced(language.tag(), code))
}

/// Message text for the editor state, choosing the layout from the language.
pub fn compose(language: Language, sections: &EditorSections) -> Option<String> {
    if language.is_web() {
        compose_web_sections(&sections.markup, &sections.style, &sections.script)
    } else {
        compose_single_section(language, &sections.markup)
    }
}

/// Spread an existing message back over the editor sections.
///
/// Web languages pick up each fence independently (missing fences leave the
/// section empty). Other languages take their own fence, or the whole text
/// when the message has none.
pub fn split_sections(language: Language, raw: &str) -> EditorSections {
    if language.is_web() {
        return EditorSections {
            markup: markup_fence(raw).unwrap_or_default().to_string(),
            style: style_fence(raw).unwrap_or_default().to_string(),
            script: script_fence_contents(raw).unwrap_or_default().to_string(),
        };
    }

    let pattern = format!(r"(?i)```{}\b\s*([\s\S]*?)\s*```", regex::escape(language.tag()));
    let own_fence = Regex::new(&pattern).ok().and_then(|re| {
        re.captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    });

    EditorSections {
        markup: own_fence.unwrap_or_else(|| raw.to_string()),
        ..EditorSections::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use pretty_assertions::assert_eq;

    #[test]
    fn web_sections_round_trip_through_classifier() {
        let message =
            compose_web_sections("<p id=\"x\">hi</p>\n", "p { color: red; }", "  document.title = 'x';").unwrap();
        assert_eq!(
            message,
            "```html\n<p id=\"x\">hi</p>\n```\n\n```css\np { color: red; }\n```\n\n```javascript\ndocument.title = 'x';\n```"
        );

        let bundle = classify(&message).unwrap();
        assert_eq!(bundle.markup(), "<p id=\"x\">hi</p>");
        assert_eq!(bundle.style(), "p { color: red; }");
        assert_eq!(bundle.script(), "document.title = 'x';");
    }

    #[test]
    fn blank_sections_are_skipped() {
        assert_eq!(
            compose_web_sections("", "  ", "alert(1)").as_deref(),
            Some("```javascript\nalert(1)\n```")
        );
        assert_eq!(compose_web_sections(" ", "", "\n"), None);
    }

    #[test]
    fn non_web_language_uses_single_fence() {
        let sections = EditorSections {
            markup: "print('hi')".into(),
            style: "ignored".into(),
            ..EditorSections::default()
        };
        assert_eq!(
            compose(Language::Python, &sections).as_deref(),
            Some("```python\nprint('hi')\n```")
        );
    }

    #[test]
    fn split_for_non_web_falls_back_to_raw_text() {
        assert_eq!(split_sections(Language::Python, "print(1)").markup, "print(1)");
        assert_eq!(
            split_sections(Language::Go, "```go\nfmt.Println(1)\n```").markup,
            "fmt.Println(1)"
        );
    }

    #[test]
    fn split_for_web_reads_each_fence() {
        let sections = split_sections(Language::Html, "```css\na{}\n```");
        assert_eq!(sections.markup, "");
        assert_eq!(sections.style, "a{}");
    }

    #[test]
    fn language_tags_parse_case_insensitively() {
        assert_eq!(Language::from_tag("JavaScript"), Some(Language::Javascript));
        assert_eq!(Language::from_tag("cobol"), None);
        assert!(Language::Html.is_web());
        assert!(!Language::Css.is_web());
    }
}
