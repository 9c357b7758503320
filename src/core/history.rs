//! Lookup history (`lookup_history.lua`) extraction and forwarding.
//!
//! The log is a run of `LookupHistoryEntry{ ... }` literals. Each entry
//! holds a `data` table whose first child carries `word`, `book_title` and
//! `time`.

use crate::db::recorder::LookupRecorder;
use crate::errors::AppResult;
use crate::lua::{Decoder, LuaValue};
use crate::models::lookup::{HistoryEntry, LookupRecord};
use log::debug;
use std::collections::HashSet;

pub const ENTRY_MARKER: &str = "LookupHistoryEntry";

/// Chunks after each marker; text before the first marker is dropped.
pub fn split_entries(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(ENTRY_MARKER).skip(1)
}

/// `None` if the entry does not have the expected shape.
pub fn entry_from_value(v: &LuaValue) -> Option<HistoryEntry> {
    let item = v.get("data")?.first_child()?;

    Some(HistoryEntry {
        word: item.get("word")?.as_str()?.to_string(),
        book_title: item.get("book_title")?.as_str()?.to_string(),
        time: item.get("time")?.as_i64()?,
    })
}

/// Decode every entry; malformed ones are skipped.
pub fn parse_history(decoder: &dyn Decoder, raw: &str) -> Vec<HistoryEntry> {
    let mut out = Vec::new();

    for (i, chunk) in split_entries(raw).enumerate() {
        match decoder.decode(chunk) {
            Ok(v) => match entry_from_value(&v) {
                Some(e) => out.push(e),
                None => debug!("Skipping malformed lookup history entry #{i}: unexpected shape"),
            },
            Err(e) => debug!("Skipping malformed lookup history entry #{i}: {e}"),
        }
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForwardStats {
    /// Entries whose book is in the language.
    pub matched: usize,
    /// Net new rows in the store.
    pub added: i64,
}

/// Record every in-language entry without committing, then commit once.
pub fn forward_lookups(
    recorder: &mut dyn LookupRecorder,
    entries: &[HistoryEntry],
    books_in_lang: &HashSet<String>,
    language: &str,
    source: &str,
) -> AppResult<ForwardStats> {
    let before = recorder.count_lookups(language)?;

    let mut matched = 0;
    for e in entries {
        if books_in_lang.contains(&e.book_title) {
            matched += 1;
            recorder.record_lookup(&LookupRecord::new(&e.word, language, source), e.time, false)?;
        }
    }
    recorder.commit()?;

    let after = recorder.count_lookups(language)?;

    Ok(ForwardStats {
        matched,
        added: after - before,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua::LuaDecoder;

    const HISTORY: &str = r#"-- we can read Lua syntax here!
LookupHistoryEntry{
    ["data"] = {
        ["1700000000"] = {
            ["book_title"] = "Alpha",
            ["time"] = 1700000000,
            ["word"] = "run",
        },
    },
}
LookupHistoryEntry{
    ["data"] = {
        ["1700000100"] = {
            ["book_title"] = "Livre",
            ["time"] = 1700000100,
            ["word"] = "courir",
        },
    },
}
LookupHistoryEntry{
    ["data"] = {
        ["1700000200"] = {
            ["book_title"] = "Alpha",
            ["word"] = "hill",
        },
    },
}
LookupHistoryEntry{ this is not lua }
LookupHistoryEntry{
    ["data"] = "flat",
}
"#;

    /// Records calls and their order.
    #[derive(Default)]
    struct Spy {
        committed: Vec<(LookupRecord, i64)>,
        pending: Vec<(LookupRecord, i64)>,
        calls: Vec<&'static str>,
    }

    impl LookupRecorder for Spy {
        fn record_lookup(&mut self, r: &LookupRecord, ts: i64, commit: bool) -> AppResult<()> {
            self.calls.push(if commit { "record+commit" } else { "record" });
            self.pending.push((r.clone(), ts));
            if commit {
                self.commit()?;
            }
            Ok(())
        }

        fn count_lookups(&self, language: &str) -> AppResult<i64> {
            Ok(self
                .committed
                .iter()
                .filter(|(r, _)| r.language == language)
                .count() as i64)
        }

        fn commit(&mut self) -> AppResult<()> {
            self.calls.push("commit");
            self.committed.append(&mut self.pending);
            Ok(())
        }
    }

    #[test]
    fn parses_well_formed_entries_and_skips_the_rest() {
        let entries = parse_history(&LuaDecoder, HISTORY);
        assert_eq!(
            entries,
            vec![
                HistoryEntry {
                    word: "run".into(),
                    book_title: "Alpha".into(),
                    time: 1_700_000_000,
                },
                HistoryEntry {
                    word: "courir".into(),
                    book_title: "Livre".into(),
                    time: 1_700_000_100,
                },
            ]
        );
    }

    #[test]
    fn no_marker_means_no_entries() {
        assert!(parse_history(&LuaDecoder, "return { }\n").is_empty());
        assert!(parse_history(&LuaDecoder, "").is_empty());
    }

    #[test]
    fn forwards_only_in_language_books_and_commits_once() {
        let entries = parse_history(&LuaDecoder, HISTORY);
        let books: HashSet<String> = ["Alpha".to_string()].into();
        let mut spy = Spy::default();

        let stats = forward_lookups(&mut spy, &entries, &books, "en", "koreader").unwrap();

        assert_eq!(stats, ForwardStats { matched: 1, added: 1 });
        assert_eq!(spy.calls, vec!["record", "commit"]);
        assert_eq!(
            spy.committed,
            vec![(LookupRecord::new("run", "en", "koreader"), 1_700_000_000)]
        );
    }

    #[test]
    fn empty_history_still_commits_and_adds_nothing() {
        let mut spy = Spy::default();
        let stats = forward_lookups(&mut spy, &[], &HashSet::new(), "en", "koreader").unwrap();
        assert_eq!(stats, ForwardStats::default());
        assert_eq!(spy.calls, vec!["commit"]);
    }
}
