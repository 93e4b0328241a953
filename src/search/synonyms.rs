//! Static semantic expansion tables.
//!
//! Concept groups are bidirectional: every member expands to every other
//! member. Situation phrases expand one way, from the phrase a user types to
//! the terms a matching prayer is likely to contain.

use crate::search::tokenizer::{canonical_query, tokenize, tokenize_unique};
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

const CONCEPT_GROUPS: &[&[&str]] = &[
    &["pagi", "morning", "subuh", "shubuh", "fajr", "fajar", "dawn"],
    &["petang", "sore", "evening", "maghrib", "ashar", "senja"],
    &["tidur", "sleep", "sleeping", "malam", "night", "istirahat"],
    &["bangun", "wake", "waking", "terjaga"],
    &["makan", "eat", "eating", "meal", "food", "makanan", "rezeki", "rizki"],
    &["minum", "drink", "drinking", "minuman"],
    &["perjalanan", "travel", "safar", "bepergian", "kendaraan", "musafir", "journey"],
    &["sakit", "sick", "illness", "sembuh", "healing", "kesembuhan", "syifa"],
    &["rumah", "home", "house"],
    &["masjid", "mosque", "musholla", "mushola"],
    &["wudhu", "wudu", "ablution", "bersuci"],
    &["hujan", "rain", "petir", "thunder"],
    &["ilmu", "knowledge", "belajar", "study", "pelajaran", "ujian", "exam"],
    &["orang tua", "parents", "ibu", "ayah", "bapak"],
    &["ampunan", "forgiveness", "taubat", "istighfar", "maaf"],
    &["syukur", "gratitude", "thanks", "bersyukur", "alhamdulillah"],
    &["perlindungan", "protection", "lindung", "selamat", "keselamatan"],
    &["pakaian", "clothes", "baju", "berpakaian"],
    &["kamar mandi", "toilet", "bathroom", "jamban", "kakus"],
    &["cermin", "mirror", "bercermin"],
    &["kesulitan", "hardship", "kesusahan", "cemas", "anxiety", "gelisah", "sedih"],
    &["jenazah", "death", "kematian", "meninggal", "mayit"],
];

const SITUATIONS: &[(&str, &[&str])] = &[
    ("before eating", &["makan", "sebelum", "bismillah"]),
    ("sebelum makan", &["makan", "bismillah", "eat"]),
    ("after eating", &["makan", "sesudah", "setelah", "alhamdulillah"]),
    ("sesudah makan", &["makan", "setelah", "alhamdulillah"]),
    ("before sleep", &["tidur", "sebelum", "malam"]),
    ("sebelum tidur", &["tidur", "malam", "sleep"]),
    ("wake up", &["bangun", "tidur", "pagi"]),
    ("bangun tidur", &["bangun", "pagi", "wake"]),
    ("leaving home", &["keluar", "rumah", "tawakkal"]),
    ("keluar rumah", &["keluar", "rumah", "tawakkal"]),
    ("entering home", &["masuk", "rumah"]),
    ("masuk rumah", &["masuk", "rumah", "home"]),
    ("going to mosque", &["masjid", "pergi"]),
    ("in a vehicle", &["kendaraan", "perjalanan", "naik"]),
    ("naik kendaraan", &["kendaraan", "perjalanan", "travel"]),
    ("feeling sick", &["sakit", "sembuh", "syifa"]),
    ("visiting the sick", &["sakit", "menjenguk", "sembuh"]),
    ("facing exams", &["ilmu", "ujian", "kemudahan"]),
];

static TABLE: Lazy<SynonymTable> = Lazy::new(SynonymTable::build);

/// Lookup structure derived from the static tables
#[derive(Debug)]
pub struct SynonymTable {
    /// Single-word term → its synonyms
    words: HashMap<String, BTreeSet<String>>,
    /// Multi-word term or situation phrase → what it expands to
    phrases: Vec<(String, BTreeSet<String>)>,
}

impl SynonymTable {
    /// The process-wide table
    pub fn global() -> &'static SynonymTable {
        &TABLE
    }

    fn build() -> Self {
        let mut words: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut phrases = Vec::new();

        for group in CONCEPT_GROUPS {
            for term in group.iter() {
                let others: BTreeSet<String> = group
                    .iter()
                    .filter(|other| *other != term)
                    .map(|other| other.to_string())
                    .collect();

                if term.contains(' ') {
                    phrases.push((term.to_string(), others));
                } else {
                    words.entry(term.to_string()).or_default().extend(others);
                }
            }
        }

        for (phrase, terms) in SITUATIONS {
            phrases.push((
                phrase.to_string(),
                terms.iter().map(|t| t.to_string()).collect(),
            ));
        }

        Self { words, phrases }
    }

    /// Expansion tokens for `query`, excluding tokens already in the query.
    pub fn expand(&self, query: &str) -> BTreeSet<String> {
        let query_tokens = tokenize_unique(query);
        let padded = format!(" {} ", canonical_query(query));
        let mut raw: BTreeSet<&str> = BTreeSet::new();

        for token in &query_tokens {
            if let Some(synonyms) = self.words.get(token) {
                raw.extend(synonyms.iter().map(String::as_str));
            }
        }

        for (phrase, terms) in &self.phrases {
            if padded.contains(&format!(" {} ", phrase)) {
                raw.extend(terms.iter().map(String::as_str));
            }
        }

        raw.into_iter()
            .flat_map(tokenize)
            .filter(|t| !query_tokens.contains(t))
            .collect()
    }

    /// Every concept term and situation phrase, for autocomplete
    pub fn keywords(&self) -> BTreeSet<&str> {
        let mut keywords: BTreeSet<&str> = self.words.keys().map(String::as_str).collect();
        keywords.extend(self.phrases.iter().map(|(phrase, _)| phrase.as_str()));
        keywords
    }
}
