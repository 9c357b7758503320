//! Sentence extraction from vocabulary builder context.
//!
//! KOReader stores the text before and after a saved word separately. The
//! importer glues them back together and keeps the sentence that holds the
//! word.

use regex::Regex;
use std::sync::LazyLock;

/// Splits a span of text into sentences, in order.
pub trait SentenceSplitter {
    fn split(&self, text: &str) -> Vec<String>;
}

/// Terminal punctuation, optional closing quotes/brackets, then whitespace.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?…。！？]+["'”’»)\]]*\s+"#).expect("valid sentence regex")
});

/// Splits after `.`, `!`, `?`, `…` (and CJK full stops) when followed by
/// whitespace. Abbreviations are not special-cased.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexSentenceSplitter;

impl SentenceSplitter for RegexSentenceSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut start = 0;

        for m in SENTENCE_END.find_iter(text) {
            push_trimmed(&mut out, &text[start..m.end()]);
            start = m.end();
        }
        push_trimmed(&mut out, &text[start..]);

        out
    }
}

fn push_trimmed(out: &mut Vec<String>, s: &str) {
    let s = s.trim();
    if !s.is_empty() {
        out.push(s.to_string());
    }
}

/// `prev.trim() + " " + word + " " + next.trim()`.
///
/// `None` when either half is missing or empty; such entries carry no usable
/// sentence.
pub fn build_context(word: &str, prev: Option<&str>, next: Option<&str>) -> Option<String> {
    match (prev, next) {
        (Some(p), Some(n)) if !p.is_empty() && !n.is_empty() => {
            Some(format!("{} {} {}", p.trim(), word, n.trim()))
        }
        _ => None,
    }
}

/// The last sentence (in split order) containing `word` literally.
pub fn select_sentence(splitter: &dyn SentenceSplitter, context: &str, word: &str) -> Option<String> {
    let mut found = None;
    for sentence in splitter.split(context) {
        if sentence.contains(word) {
            found = Some(sentence);
        }
    }
    found.filter(|s| !s.is_empty())
}

/// Context building and sentence selection in one step.
pub fn extract_sentence(
    splitter: &dyn SentenceSplitter,
    word: &str,
    prev: Option<&str>,
    next: Option<&str>,
) -> Option<String> {
    let ctx = build_context(word, prev, next)?;
    select_sentence(splitter, &ctx, word)
}
