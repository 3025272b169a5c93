//! Ready-made snippets a user can drop into the conversation.
//!
//! The built-in catalog ships as YAML next to the crate sources and is parsed
//! on demand; hosts can load their own catalog with [`Gallery::from_yaml_str`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::compose::Language;
use crate::error::{CoreError, CoreResult};

const BUILTIN_GALLERY: &str = include_str!("../gallery/examples.yaml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub name: String,
    pub description: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageExamples {
    pub language: Language,
    pub title: String,
    pub examples: Vec<Example>,
}

/// Full web example shown in the curated section, grouped by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedExample {
    pub title: String,
    pub description: String,
    pub category: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gallery {
    pub languages: Vec<LanguageExamples>,
    #[serde(default)]
    pub curated: Vec<CuratedExample>,
}

impl Gallery {
    pub fn builtin() -> CoreResult<Self> {
        Self::from_yaml_str(BUILTIN_GALLERY)
    }

    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let gallery: Gallery =
            serde_yaml::from_str(yaml).map_err(|e| CoreError::Gallery(e.to_string()))?;
        gallery.validate()?;
        Ok(gallery)
    }

    fn validate(&self) -> CoreResult<()> {
        for group in &self.languages {
            let mut names = HashSet::new();
            for example in &group.examples {
                if example.code.trim().is_empty() {
                    return Err(CoreError::EmptyExample {
                        name: example.name.clone(),
                    });
                }
                if !names.insert(example.name.as_str()) {
                    return Err(CoreError::DuplicateExample {
                        name: format!("{}/{}", group.language.tag(), example.name),
                    });
                }
            }
        }

        let mut titles = HashSet::new();
        for example in &self.curated {
            if example.code.trim().is_empty() {
                return Err(CoreError::EmptyExample {
                    name: example.title.clone(),
                });
            }
            if !titles.insert(example.title.as_str()) {
                return Err(CoreError::DuplicateExample {
                    name: example.title.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn for_language(&self, language: Language) -> Option<&LanguageExamples> {
        self.languages.iter().find(|group| group.language == language)
    }

    /// Example code by language and name (case-insensitive name match).
    pub fn example(&self, language: Language, name: &str) -> Option<&Example> {
        self.for_language(language)?
            .examples
            .iter()
            .find(|example| example.name.eq_ignore_ascii_case(name))
    }

    pub fn curated(&self, title: &str) -> Option<&CuratedExample> {
        self.curated
            .iter()
            .find(|example| example.title.eq_ignore_ascii_case(title))
    }

    /// Distinct curated categories in catalog order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.curated
            .iter()
            .map(|example| example.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let gallery = Gallery::builtin().unwrap();
        assert!(gallery.for_language(Language::Javascript).is_some());
        assert!(gallery.for_language(Language::Python).is_some());
        assert_eq!(gallery.categories(), vec!["UI Components", "Widgets"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let gallery = Gallery::builtin().unwrap();
        let example = gallery.example(Language::Html, "basic structure").unwrap();
        assert!(example.code.starts_with("<div>"));
        assert!(gallery.curated("countdown timer").is_some());
    }

    #[test]
    fn empty_code_is_rejected() {
        let yaml = "languages:\n  - language: css\n    title: CSS\n    examples:\n      - name: Nothing\n        description: x\n        code: \"  \"\n";
        assert!(matches!(
            Gallery::from_yaml_str(yaml),
            Err(CoreError::EmptyExample { .. })
        ));
    }

    #[test]
    fn unknown_language_is_a_gallery_error() {
        let yaml = "languages:\n  - language: cobol\n    title: COBOL\n    examples: []\n";
        assert!(matches!(Gallery::from_yaml_str(yaml), Err(CoreError::Gallery(_))));
    }
}
