use std::path::PathBuf;

/// A book found on a partition, with the language and title read from its
/// `.sdr` metadata (or the fallbacks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRef {
    pub path: PathBuf,
    pub language: String,
    pub title: String,
}

impl BookRef {
    /// Prefix match, so `en` accepts `en-GB` and `en_US`.
    pub fn is_in_language(&self, lang: &str) -> bool {
        self.language.starts_with(lang)
    }
}
