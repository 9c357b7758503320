#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// (word, title_id, create_time, prev_context, next_context)
pub type VocabRow<'a> = (&'a str, i64, i64, Option<&'a str>, Option<&'a str>);

/// A fake KOReader device plus an isolated HOME for the config file.
pub struct Device {
    dir: TempDir,
}

impl Device {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("reader")).unwrap();
        fs::create_dir_all(dir.path().join("home")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("reader")
    }

    pub fn root_str(&self) -> String {
        self.root().to_string_lossy().to_string()
    }

    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// Lookup store used by the CLI in every test.
    pub fn store(&self) -> String {
        self.dir
            .path()
            .join("lookups.sqlite")
            .to_string_lossy()
            .to_string()
    }

    pub fn out(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn settings(&self) -> PathBuf {
        let p = self.root().join(".adds").join("koreader").join("settings");
        fs::create_dir_all(&p).unwrap();
        p
    }

    /// `rel` is relative to the device root, e.g. `books/Alpha.epub`.
    pub fn add_book(&self, rel: &str, language: &str, title: &str) {
        let book = self.root().join(rel);
        fs::create_dir_all(book.parent().unwrap()).unwrap();
        fs::write(&book, b"book").unwrap();

        let ext = book.extension().unwrap().to_string_lossy().to_string();
        let stem = book.file_stem().unwrap().to_string_lossy().to_string();
        let sdr = book.with_file_name(format!("{stem}.sdr"));
        fs::create_dir_all(&sdr).unwrap();

        let meta = format!(
            "-- {rel}\nreturn {{\n    [\"doc_props\"] = {{\n        [\"language\"] = \"{language}\",\n        [\"title\"] = \"{title}\",\n    }},\n    [\"percent_finished\"] = 0.5,\n}}\n"
        );
        fs::write(sdr.join(format!("metadata.{ext}.lua")), meta).unwrap();
    }

    pub fn write_vocab_db(&self, titles: &[(i64, &str)], rows: &[VocabRow]) {
        let conn = Connection::open(self.settings().join("vocabulary_builder.sqlite3")).unwrap();
        conn.execute_batch(
            "CREATE TABLE title (id INTEGER PRIMARY KEY, name TEXT UNIQUE, filter INTEGER);
             CREATE TABLE vocabulary (
                 word TEXT PRIMARY KEY, title_id INTEGER, create_time INTEGER,
                 review_time INTEGER, due_time INTEGER, review_count INTEGER,
                 prev_context TEXT, next_context TEXT, streak_count INTEGER
             );",
        )
        .unwrap();

        for (id, name) in titles {
            conn.execute(
                "INSERT INTO title (id, name, filter) VALUES (?1, ?2, 1)",
                params![id, name],
            )
            .unwrap();
        }
        for (word, title_id, time, prev, next) in rows {
            conn.execute(
                "INSERT INTO vocabulary (word, title_id, create_time, prev_context, next_context)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![word, title_id, time, prev, next],
            )
            .unwrap();
        }
    }

    /// (word, book_title, time) entries, plus any raw text appended as is.
    pub fn write_history(&self, entries: &[(&str, &str, i64)], raw_tail: &str) {
        let mut text = String::from("return {\n");
        for (word, book, time) in entries {
            text.push_str(&format!(
                "LookupHistoryEntry{{\n    [\"data\"] = {{\n        [1] = {{\n            [\"book_title\"] = \"{book}\",\n            [\"time\"] = {time},\n            [\"word\"] = \"{word}\",\n        }},\n    }},\n}},\n"
            ));
        }
        text.push_str(raw_tail);
        text.push_str("}\n");
        fs::write(self.settings().join("lookup_history.lua"), text).unwrap();
    }

    /// The usual one-book English device.
    pub fn english() -> Self {
        let dev = Self::new();
        dev.add_book("books/Alpha.epub", "en", "Alpha");
        dev.write_vocab_db(
            &[(1, "Alpha")],
            &[(
                "run",
                1,
                1_700_000_000,
                Some("She began to"),
                Some("fast down the hill."),
            )],
        );
        dev
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("kovocab");
        cmd.env("HOME", self.home())
            .env("APPDATA", self.home())
            .env_remove("RUST_LOG")
            .args(["--db", &self.store()]);
        cmd
    }
}
