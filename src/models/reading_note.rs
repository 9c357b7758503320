use serde::Serialize;

/// A saved word with the sentence it was read in. Ready for card creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingNote {
    pub lookup_term: String,
    pub sentence: String,
    pub book_name: String,
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
}
