use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::message::MessageKind;

/// Runtime settings handed to the classifier, renderer and session by the host.
///
/// Every section has defaults, so a YAML document only needs the keys it overrides:
///
/// ```yaml
/// chat:
///   response_delay_ms: 250
/// preview:
///   sandbox: [allow-scripts, allow-forms]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub chat: ChatConfig,
    pub classifier: ClassifierConfig,
    pub preview: PreviewConfig,
}

impl RunnerConfig {
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let config: RunnerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> CoreResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.chat.max_message_length == 0 {
            return Err(CoreError::InvalidConfigValue {
                field: "chat.max_message_length".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.chat.max_code_length == 0 {
            return Err(CoreError::InvalidConfigValue {
                field: "chat.max_code_length".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.preview.frame_height == 0 {
            return Err(CoreError::InvalidConfigValue {
                field: "preview.frame_height".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.preview.title.trim().is_empty() {
            return Err(CoreError::InvalidConfigValue {
                field: "preview.title".into(),
                reason: "must not be blank".into(),
            });
        }
        Ok(())
    }
}

/// What happens when a message is submitted while a reply is still pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Refuse the submission until the pending reply lands.
    #[default]
    Reject,
    /// Accept it; every submission gets its own reply.
    Allow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub max_message_length: usize,
    pub max_code_length: usize,
    pub response_delay_ms: u64,
    pub overlap_policy: OverlapPolicy,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: 5000,
            max_code_length: 10000,
            response_delay_ms: 1000,
            overlap_policy: OverlapPolicy::Reject,
        }
    }
}

impl ChatConfig {
    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }

    pub fn limit_for(&self, kind: MessageKind) -> usize {
        match kind {
            MessageKind::Text => self.max_message_length,
            MessageKind::Code => self.max_code_length,
        }
    }

    /// Length check in characters, with the limit picked by message kind.
    pub fn check_length(&self, text: &str, kind: MessageKind) -> CoreResult<()> {
        let length = text.chars().count();
        let max = self.limit_for(kind);
        if length > max {
            return Err(CoreError::MessageTooLong { kind, length, max });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum memoized messages; 0 turns memoization off.
    pub cache_capacity: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { cache_capacity: 256 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub title: String,
    /// Frame height in pixels.
    pub frame_height: u32,
    pub min_height: u32,
    /// Sandbox tokens for the isolated context; validated by the preview crate.
    pub sandbox: Vec<String>,
    /// Optional Content-Security-Policy written into the synthesized document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_security_policy: Option<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            title: "Code Preview".to_string(),
            frame_height: 256,
            min_height: 320,
            sandbox: vec!["allow-scripts".to_string()],
            content_security_policy: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = RunnerConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, RunnerConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let yaml = "chat:\n  response_delay_ms: 250\n  overlap_policy: allow\npreview:\n  sandbox: [allow-scripts, allow-forms]\n";
        let config = RunnerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.chat.response_delay(), Duration::from_millis(250));
        assert_eq!(config.chat.overlap_policy, OverlapPolicy::Allow);
        assert_eq!(config.chat.max_message_length, 5000);
        assert_eq!(config.preview.sandbox, vec!["allow-scripts", "allow-forms"]);
        assert_eq!(config.classifier.cache_capacity, 256);
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = RunnerConfig::from_yaml_str("chat:\n  max_code_length: 0\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfigValue { ref field, .. } if field == "chat.max_code_length"));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = RunnerConfig::from_yaml_str("chat: [unclosed").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn length_limit_depends_on_kind() {
        let chat = ChatConfig {
            max_message_length: 3,
            max_code_length: 5,
            ..ChatConfig::default()
        };
        assert!(chat.check_length("abcd", MessageKind::Code).is_ok());
        assert!(matches!(
            chat.check_length("abcd", MessageKind::Text),
            Err(CoreError::MessageTooLong { length: 4, max: 3, .. })
        ));
    }
}
