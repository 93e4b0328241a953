use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// A single immutable corpus entry (one prayer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Stable identifier
    #[validate(length(min = 1))]
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Text in Arabic script
    #[serde(default)]
    pub arabic_text: String,

    /// Latin transliteration
    #[serde(default)]
    pub latin_text: String,

    /// Translation
    #[serde(default)]
    pub translation: String,

    /// Category name
    #[serde(default)]
    pub category: String,

    /// Free-form tags
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Where the text comes from (hadith reference, book...)
    #[serde(default)]
    pub source: String,
}

impl Document {
    /// Create a document with only an id, title and category set
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            arabic_text: String::new(),
            latin_text: String::new(),
            translation: String::new(),
            category: category.into(),
            tags: BTreeSet::new(),
            source: String::new(),
        }
    }

    pub fn with_arabic(mut self, text: impl Into<String>) -> Self {
        self.arabic_text = text.into();
        self
    }

    pub fn with_latin(mut self, text: impl Into<String>) -> Self {
        self.latin_text = text.into();
        self
    }

    pub fn with_translation(mut self, text: impl Into<String>) -> Self {
        self.translation = text.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}
