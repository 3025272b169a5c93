//! Sandbox flags for the isolated browsing context.
//!
//! Only tokens that keep the preview inside its frame are accepted. Top-level
//! navigation and popup escapes are refused outright, and `allow-same-origin`
//! may not be paired with `allow-scripts`.

use serde::Serialize;
use std::fmt;

use crate::error::{PreviewError, PreviewResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SandboxToken {
    AllowScripts,
    AllowForms,
    AllowModals,
    AllowPopups,
    AllowPointerLock,
    AllowDownloads,
    AllowSameOrigin,
}

impl SandboxToken {
    pub fn as_str(self) -> &'static str {
        match self {
            SandboxToken::AllowScripts => "allow-scripts",
            SandboxToken::AllowForms => "allow-forms",
            SandboxToken::AllowModals => "allow-modals",
            SandboxToken::AllowPopups => "allow-popups",
            SandboxToken::AllowPointerLock => "allow-pointer-lock",
            SandboxToken::AllowDownloads => "allow-downloads",
            SandboxToken::AllowSameOrigin => "allow-same-origin",
        }
    }

    fn parse(token: &str) -> PreviewResult<Self> {
        match token {
            "allow-scripts" => Ok(SandboxToken::AllowScripts),
            "allow-forms" => Ok(SandboxToken::AllowForms),
            "allow-modals" => Ok(SandboxToken::AllowModals),
            "allow-popups" => Ok(SandboxToken::AllowPopups),
            "allow-pointer-lock" => Ok(SandboxToken::AllowPointerLock),
            "allow-downloads" => Ok(SandboxToken::AllowDownloads),
            "allow-same-origin" => Ok(SandboxToken::AllowSameOrigin),
            "allow-top-navigation"
            | "allow-top-navigation-by-user-activation"
            | "allow-top-navigation-to-custom-protocols"
            | "allow-popups-to-escape-sandbox"
            | "allow-presentation"
            | "allow-orientation-lock"
            | "allow-storage-access-by-user-activation" => {
                Err(PreviewError::ForbiddenSandboxToken {
                    token: token.to_string(),
                })
            }
            _ => Err(PreviewError::UnknownSandboxToken {
                token: token.to_string(),
            }),
        }
    }
}

/// Validated, de-duplicated set of sandbox tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SandboxFlags {
    tokens: Vec<SandboxToken>,
}

impl Default for SandboxFlags {
    fn default() -> Self {
        Self {
            tokens: vec![SandboxToken::AllowScripts],
        }
    }
}

impl SandboxFlags {
    /// Parse tokens as they appear in configuration (case-insensitive, whitespace-trimmed).
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> PreviewResult<Self> {
        let mut parsed: Vec<SandboxToken> = Vec::new();
        for raw in tokens {
            let token = raw.as_ref().trim().to_ascii_lowercase();
            if token.is_empty() {
                continue;
            }
            let token = SandboxToken::parse(&token)?;
            if !parsed.contains(&token) {
                parsed.push(token);
            }
        }

        if parsed.contains(&SandboxToken::AllowScripts)
            && parsed.contains(&SandboxToken::AllowSameOrigin)
        {
            return Err(PreviewError::SameOriginWithScripts);
        }

        Ok(Self { tokens: parsed })
    }

    pub fn allows(&self, token: SandboxToken) -> bool {
        self.tokens.contains(&token)
    }

    pub fn allows_scripts(&self) -> bool {
        self.allows(SandboxToken::AllowScripts)
    }

    pub fn tokens(&self) -> &[SandboxToken] {
        &self.tokens
    }

    /// Value for the frame's `sandbox` attribute. Empty means fully locked down.
    pub fn attribute_value(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for SandboxFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.attribute_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_scripts_only() {
        let flags = SandboxFlags::default();
        assert_eq!(flags.attribute_value(), "allow-scripts");
        assert!(!flags.allows(SandboxToken::AllowSameOrigin));
    }

    #[test]
    fn parse_normalizes_and_deduplicates() {
        let flags = SandboxFlags::parse(&[" Allow-Scripts", "allow-forms", "allow-scripts", ""]).unwrap();
        assert_eq!(flags.attribute_value(), "allow-scripts allow-forms");
    }

    #[test]
    fn same_origin_with_scripts_is_refused() {
        let err = SandboxFlags::parse(&["allow-scripts", "allow-same-origin"]).unwrap_err();
        assert!(matches!(err, PreviewError::SameOriginWithScripts));
    }

    #[test]
    fn same_origin_without_scripts_is_allowed() {
        let flags = SandboxFlags::parse(&["allow-same-origin"]).unwrap();
        assert!(!flags.allows_scripts());
    }

    #[test]
    fn navigation_escapes_are_forbidden() {
        for token in ["allow-top-navigation", "allow-popups-to-escape-sandbox"] {
            assert!(matches!(
                SandboxFlags::parse(&[token]),
                Err(PreviewError::ForbiddenSandboxToken { .. })
            ));
        }
    }

    #[test]
    fn unknown_token_is_reported() {
        assert!(matches!(
            SandboxFlags::parse(&["allow-everything"]),
            Err(PreviewError::UnknownSandboxToken { ref token }) if token == "allow-everything"
        ));
    }
}
