//! Searchable projection of corpus documents

use crate::models::Document;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use strum::{AsRefStr, Display, EnumIter};

/// Number of indexed document fields
pub const FIELD_COUNT: usize = 7;

/// An indexed document field, in weight order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Title,
    Category,
    Tags,
    Arabic,
    Translation,
    Latin,
    Source,
}

impl Field {
    /// Direct-match weight of a hit in this field
    pub fn weight(self) -> f64 {
        match self {
            Field::Title => 2.0,
            Field::Category => 1.5,
            Field::Tags => 1.2,
            Field::Arabic => 1.0,
            Field::Translation => 0.8,
            Field::Latin => 0.6,
            Field::Source => 0.4,
        }
    }

    /// Position in per-document field tables
    pub(crate) fn slot(self) -> usize {
        self as usize
    }

    /// Raw text of this field; tags are joined with spaces
    pub fn text(self, document: &Document) -> Cow<'_, str> {
        match self {
            Field::Title => Cow::Borrowed(&document.title),
            Field::Category => Cow::Borrowed(&document.category),
            Field::Tags => Cow::Owned(
                document
                    .tags
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Field::Arabic => Cow::Borrowed(&document.arabic_text),
            Field::Translation => Cow::Borrowed(&document.translation),
            Field::Latin => Cow::Borrowed(&document.latin_text),
            Field::Source => Cow::Borrowed(&document.source),
        }
    }
}

/// Why a document was returned: the field of a direct hit, or the strategy
/// that produced an indirect one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchedField {
    Title,
    Category,
    Tags,
    Arabic,
    Translation,
    Latin,
    Source,
    Semantic,
    Fuzzy,
}

impl From<Field> for MatchedField {
    fn from(field: Field) -> Self {
        match field {
            Field::Title => MatchedField::Title,
            Field::Category => MatchedField::Category,
            Field::Tags => MatchedField::Tags,
            Field::Arabic => MatchedField::Arabic,
            Field::Translation => MatchedField::Translation,
            Field::Latin => MatchedField::Latin,
            Field::Source => MatchedField::Source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_slots_are_dense() {
        let slots: Vec<usize> = Field::iter().map(Field::slot).collect();
        assert_eq!(slots, (0..FIELD_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_weights_descend_in_declaration_order() {
        let weights: Vec<f64> = Field::iter().map(Field::weight).collect();
        assert!(weights.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_tags_text_joined() {
        let doc = Document::new("1", "Doa", "Harian").with_tags(["pagi", "dzikir"]);
        assert_eq!(Field::Tags.text(&doc), "dzikir pagi");
    }

    #[test]
    fn test_matched_field_serializes_lowercase() {
        let json = serde_json::to_string(&MatchedField::Semantic).unwrap();
        assert_eq!(json, "\"semantic\"");
        assert_eq!(MatchedField::from(Field::Title).to_string(), "title");
    }
}
