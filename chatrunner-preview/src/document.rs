//! Builds the standalone document handed to an isolated context.
//!
//! Layout: reset styles and the user stylesheet in `<head>`, followed by the
//! containment prelude, then the user markup, then the user script last so it
//! runs after the nodes it refers to exist.

use chatrunner_core::{CodeBundle, PreviewConfig};
use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

use crate::error::{PreviewError, PreviewResult};

/// Base document styles applied before the user stylesheet.
const RESET_STYLES: &str = "*{margin:0;padding:0;box-sizing:border-box;}\n\
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;line-height:1.6;color:#333;background:#fff;padding:20px;}";

/// Runs before any user code. Replaces the back-references a frame keeps to its
/// embedder with references to itself. Best effort: `window.top` is unforgeable
/// in most engines, which is why the frame sandbox matters more than this.
pub const CONTAINMENT_PRELUDE: &str = "(function () {\n\
  'use strict';\n\
  var own = window;\n\
  function sever(name, value) {\n\
    try {\n\
      Object.defineProperty(own, name, { get: function () { return value; }, configurable: false });\n\
    } catch (e) {}\n\
  }\n\
  sever('parent', own);\n\
  sever('top', own);\n\
  sever('opener', null);\n\
  sever('frameElement', null);\n\
  try { own.open = function () { return null; }; } catch (e) {}\n\
})();";

/// A complete, self-contained HTML document ready to mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    html: String,
}

impl PreviewDocument {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

fn closing_script_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</(script)").unwrap())
}

fn closing_style_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</(style)").unwrap())
}

/// Keep user script inside its own `<script>` element.
fn neutralize_script(script: &str) -> String {
    closing_script_tag().replace_all(script, r"<\/${1}").into_owned()
}

/// Keep user CSS inside its own `<style>` element.
fn neutralize_style(style: &str) -> String {
    closing_style_tag().replace_all(style, r"<\/${1}").into_owned()
}

/// Synthesize the full preview document for `bundle`.
pub fn assemble(bundle: &CodeBundle, config: &PreviewConfig) -> PreviewResult<PreviewDocument> {
    let mut head_extra = String::new();
    if let Some(csp) = config.content_security_policy.as_deref() {
        writeln!(
            head_extra,
            r#"<meta http-equiv="Content-Security-Policy" content="{}">"#,
            escape_attribute(csp)
        )
        .map_err(|e| PreviewError::Assembly(e.to_string()))?;
    }

    let mut html = String::with_capacity(
        RESET_STYLES.len() + CONTAINMENT_PRELUDE.len() + bundle.char_count() + 512,
    );
    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en" dir="ltr">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
{}<title>{}</title>
<style>
{}
{}
</style>
<script>
{}
</script>
</head>
<body>
{}
"#,
        head_extra,
        escape_html(&config.title),
        RESET_STYLES,
        neutralize_style(bundle.style()),
        CONTAINMENT_PRELUDE,
        bundle.markup(),
    )
    .map_err(|e| PreviewError::Assembly(e.to_string()))?;

    if !bundle.script().is_empty() {
        write!(html, "<script>\n{}\n</script>\n", neutralize_script(bundle.script()))
            .map_err(|e| PreviewError::Assembly(e.to_string()))?;
    }
    html.push_str("</body>\n</html>\n");

    Ok(PreviewDocument { html })
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape for a double- or single-quoted attribute value (e.g. `srcdoc`).
pub(crate) fn escape_attribute(s: &str) -> String {
    escape_html(s).replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PreviewConfig {
        PreviewConfig::default()
    }

    #[test]
    fn script_comes_after_markup_and_prelude() {
        let bundle = CodeBundle::new("<div id=\"out\"></div>", "", "document.getElementById('out').textContent = 'x';");
        let doc = assemble(&bundle, &config()).unwrap();
        let html = doc.as_str();

        let prelude_at = html.find("sever('parent'").unwrap();
        let markup_at = html.find("<div id=\"out\">").unwrap();
        let script_at = html.find("getElementById('out')").unwrap();
        assert!(prelude_at < markup_at);
        assert!(markup_at < script_at);
    }

    #[test]
    fn user_style_follows_reset() {
        let bundle = CodeBundle::new("<p>x</p>", "p { color: red; }", "");
        let html = assemble(&bundle, &config()).unwrap().into_string();
        assert!(html.find("box-sizing:border-box").unwrap() < html.find("p { color: red; }").unwrap());
    }

    #[test]
    fn empty_script_emits_no_user_script_element() {
        let html = assemble(&CodeBundle::markup_only("<p>x</p>"), &config())
            .unwrap()
            .into_string();
        assert_eq!(html.matches("<script>").count(), 1);
    }

    #[test]
    fn closing_tags_in_user_code_are_neutralized() {
        let bundle = CodeBundle::new("<p></p>", "a::after { content: '</STYLE>'; }", "var s = '</script><b>x</b>';");
        let html = assemble(&bundle, &config()).unwrap().into_string();
        assert!(html.contains(r"var s = '<\/script><b>x</b>';"));
        assert!(html.contains(r"content: '<\/STYLE>';"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn title_and_csp_are_escaped() {
        let config = PreviewConfig {
            title: "A <b> & \"c\"".into(),
            content_security_policy: Some("default-src 'none'; script-src 'unsafe-inline'".into()),
            ..PreviewConfig::default()
        };
        let html = assemble(&CodeBundle::markup_only("<p></p>"), &config)
            .unwrap()
            .into_string();
        assert!(html.contains("<title>A &lt;b&gt; &amp; &quot;c&quot;</title>"));
        assert!(html.contains("content=\"default-src &#39;none&#39;; script-src &#39;unsafe-inline&#39;\""));
    }
}
