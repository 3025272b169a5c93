//! Advisory line checks for stylesheet sections. Never blocks a submission.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CssIssueKind {
    MissingSemicolon,
    /// `property: { value }` instead of `property: value;`
    BraceValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssIssue {
    /// 1-based line number.
    pub line: usize,
    pub kind: CssIssueKind,
}

impl fmt::Display for CssIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CssIssueKind::MissingSemicolon => write!(f, "Line {}: Missing semicolon", self.line),
            CssIssueKind::BraceValue => write!(
                f,
                "Line {}: Invalid CSS syntax. Use \"property: value;\" not \"property: {{ value }}\"",
                self.line
            ),
        }
    }
}

pub fn lint_css(style: &str) -> Vec<CssIssue> {
    let mut issues = Vec::new();

    for (index, line) in style.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("/*") || line.starts_with("*/") {
            continue;
        }

        let has_colon = line.contains(':');
        let has_semicolon = line.contains(';');
        let has_open = line.contains('{');
        let has_close = line.contains('}');

        if has_colon && !has_semicolon && !has_open && !has_close {
            issues.push(CssIssue {
                line: index + 1,
                kind: CssIssueKind::MissingSemicolon,
            });
        }

        if has_colon && has_open && !has_close && brace_follows_colon(line) {
            issues.push(CssIssue {
                line: index + 1,
                kind: CssIssueKind::BraceValue,
            });
        }
    }

    issues
}

// Only a colon followed directly by `{` is a brace value; `a:hover {` is a selector.
fn brace_follows_colon(line: &str) -> bool {
    line.match_indices(':')
        .any(|(at, _)| line[at + 1..].trim_start().starts_with('{'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_stylesheet_has_no_issues() {
        let css = "/* card */\n.card {\n  color: red;\n  padding: 4px;\n}\n\nnav a:hover {\n  color: blue;\n}";
        assert!(lint_css(css).is_empty());
    }

    #[test]
    fn reports_missing_semicolon_with_line_number() {
        let issues = lint_css(".a {\n  color: red\n}");
        assert_eq!(
            issues,
            vec![CssIssue {
                line: 2,
                kind: CssIssueKind::MissingSemicolon
            }]
        );
        assert_eq!(issues[0].to_string(), "Line 2: Missing semicolon");
    }

    #[test]
    fn reports_brace_value() {
        let issues = lint_css(".a {\n  color: { red\n}");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, CssIssueKind::BraceValue);
        assert_eq!(issues[0].line, 2);
    }
}
