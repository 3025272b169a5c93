use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::bundle::CodeBundle;
use crate::classifier::Classifier;

pub type MessageId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Code,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Text => f.write_str("Text"),
            MessageKind::Code => f.write_str("Code"),
        }
    }
}

/// One entry of the conversation history.
///
/// The kind is not stored: a message is code exactly when it carries a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    text: String,
    sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bundle: Option<CodeBundle>,
    timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender, bundle: Option<CodeBundle>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            bundle,
            timestamp: Utc::now(),
        }
    }

    /// User message whose kind and bundle come from classifying `text`.
    pub fn classified_user(text: impl Into<String>, classifier: &mut Classifier) -> Self {
        let text = text.into();
        let bundle = classifier.classify(&text);
        Self::new(text, Sender::User, bundle)
    }

    /// Plain-text system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(text, Sender::System, None)
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn kind(&self) -> MessageKind {
        if self.bundle.is_some() {
            MessageKind::Code
        } else {
            MessageKind::Text
        }
    }

    pub fn is_code(&self) -> bool {
        self.bundle.is_some()
    }

    pub fn bundle(&self) -> Option<&CodeBundle> {
        self.bundle.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_bundle() {
        let mut classifier = Classifier::new();
        let code = Message::classified_user("<h1>Hi</h1>", &mut classifier);
        let text = Message::classified_user("Hello world!", &mut classifier);

        assert_eq!(code.kind(), MessageKind::Code);
        assert_eq!(code.bundle().map(CodeBundle::markup), Some("<h1>Hi</h1>"));
        assert_eq!(text.kind(), MessageKind::Text);
        assert!(text.bundle().is_none());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Message::system("a").id(), Message::system("a").id());
    }

    #[test]
    fn serializes_without_bundle_for_text() {
        let yaml = serde_yaml::to_string(&Message::system("ok")).unwrap();
        assert!(yaml.contains("sender: system"));
        assert!(!yaml.contains("bundle"));
    }
}
