use serde::Serialize;

/// Source tag stored with every lookup this importer records.
pub const KOREADER_SOURCE: &str = "koreader";

/// A dictionary lookup as stored in the lookup record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupRecord {
    pub word: String,
    pub language: String,
    pub source: String,
}

impl LookupRecord {
    pub fn new(word: &str, language: &str, source: &str) -> Self {
        Self {
            word: word.to_string(),
            language: language.to_string(),
            source: source.to_string(),
        }
    }
}

/// One decoded entry of `lookup_history.lua`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub word: String,
    pub book_title: String,
    pub time: i64,
}
