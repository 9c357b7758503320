use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use std::fs;

mod common;
use common::Device;

#[test]
fn test_import_prints_english_note() {
    let dev = Device::english();
    dev.write_history(&[("run", "Alpha", 1_700_000_000)], "");

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str()])
        .assert()
        .success()
        .stdout(contains("Found 1 notes in Vocabulary Builder in language 'en'"))
        .stdout(contains("She began to run fast down the hill."))
        .stdout(contains("vocabulary_builder.sqlite3"))
        .stdout(contains("Found 1 lookups in en, added 1 to lookup database."));
}

#[test]
fn test_import_other_language_yields_no_notes() {
    let dev = Device::english();
    dev.write_history(&[("run", "Alpha", 1_700_000_000)], "");

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str(), "--lang", "fr"])
        .assert()
        .success()
        .stdout(contains("Found 0 notes in Vocabulary Builder in language 'fr'"))
        .stdout(contains("Found 0 lookups in fr, added 0 to lookup database."))
        .stdout(contains("She began to run").not());
}

#[test]
fn test_import_language_prefix_matches_region() {
    let dev = Device::new();
    dev.add_book("Beta.epub", "en-US", "Beta");
    dev.write_vocab_db(
        &[(1, "Beta")],
        &[("swim", 1, 1_700_000_000, Some("We"), Some("every day."))],
    );

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str(), "--lang", "en"])
        .assert()
        .success()
        .stdout(contains("Found 1 notes"))
        .stdout(contains("We swim every day."));
}

#[test]
fn test_missing_history_still_imports_notes() {
    let dev = Device::english();

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str()])
        .assert()
        .success()
        .stdout(contains("Lookups will not be tracked this time."))
        .stdout(contains("Found 1 notes in Vocabulary Builder in language 'en'"));
}

#[test]
fn test_malformed_history_entry_is_skipped() {
    let dev = Device::english();
    dev.write_history(
        &[("run", "Alpha", 1_700_000_000)],
        "LookupHistoryEntry{\n    [\"data\"] = {\n        [1] = {\n            [\"word\"] = \"broken\",\n        },\n    },\n},\nLookupHistoryEntry{ this is not lua }\n",
    );

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str()])
        .assert()
        .success()
        .stdout(contains("Found 1 lookups in en, added 1 to lookup database."));
}

#[test]
fn test_reimport_does_not_duplicate_lookups() {
    let dev = Device::english();
    dev.write_history(
        &[("run", "Alpha", 1_700_000_000), ("hill", "Alpha", 1_700_000_100)],
        "",
    );

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str()])
        .assert()
        .success()
        .stdout(contains("Found 2 lookups in en, added 2 to lookup database."));

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str()])
        .assert()
        .success()
        .stdout(contains("Found 2 lookups in en, added 0 to lookup database."));

    dev.cmd()
        .args(["lookups", "--lang", "en"])
        .assert()
        .success()
        .stdout(contains("en: 2"));
}

#[test]
fn test_no_history_flag_skips_lookups() {
    let dev = Device::english();
    dev.write_history(&[("run", "Alpha", 1_700_000_000)], "");

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str(), "--no-history"])
        .assert()
        .success()
        .stdout(contains("Found 1 notes"))
        .stdout(contains("lookups in").not());

    dev.cmd()
        .args(["lookups"])
        .assert()
        .success()
        .stdout(contains("No lookups recorded yet."));
}

#[test]
fn test_no_reader_partition_fails() {
    let dev = Device::english();

    dev.cmd()
        .args(["--test", "import"])
        .assert()
        .failure()
        .stderr(contains("No valid KOReader partition path found"));
}

#[test]
fn test_missing_vocab_db_fails() {
    let dev = Device::new();
    dev.add_book("Alpha.epub", "en", "Alpha");

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str()])
        .assert()
        .failure()
        .stderr(contains("vocabulary_builder.sqlite3 not found"));
}

#[test]
fn test_books_on_sdcard_are_included() {
    let dev = Device::new();
    dev.add_book("books/Alpha.epub", "en", "Alpha");
    let sd = dev.out("sdcard");
    fs::create_dir_all(&sd).unwrap();
    fs::write(sd.join("Gamma.epub"), b"book").unwrap();
    fs::create_dir_all(sd.join("Gamma.sdr")).unwrap();
    fs::write(
        sd.join("Gamma.sdr").join("metadata.epub.lua"),
        "-- Gamma\nreturn {\n    [\"doc_props\"] = {\n        [\"language\"] = \"en\",\n        [\"title\"] = \"Gamma\",\n    },\n}\n",
    )
    .unwrap();

    // vocab db lists both books; Gamma only resolves through the SD card
    dev.write_vocab_db(
        &[(1, "Alpha"), (2, "Gamma")],
        &[
            ("run", 1, 1_700_000_000, Some("She began to"), Some("fast.")),
            ("leap", 2, 1_700_000_100, Some("Then a"), Some("of faith.")),
        ],
    );

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str(), "--no-history"])
        .assert()
        .success()
        .stdout(contains("Found 1 notes"));

    dev.cmd()
        .args([
            "--test",
            "import",
            "--reader",
            &dev.root_str(),
            "--sdcard",
            &sd.to_string_lossy(),
            "--no-history",
        ])
        .assert()
        .success()
        .stdout(contains("Found 2 notes"))
        .stdout(contains("Then a leap of faith."));
}

#[test]
fn test_export_json_file() {
    let dev = Device::english();
    let out = dev.out("notes.json");

    dev.cmd()
        .args([
            "--test",
            "import",
            "--reader",
            &dev.root_str(),
            "--no-history",
            "--file",
            &out.to_string_lossy(),
        ])
        .assert()
        .success()
        .stdout(contains("JSON export completed (1 notes)"));

    let content = fs::read_to_string(&out).expect("json written");
    let v: Value = serde_json::from_str(&content).expect("valid json");
    let notes = v.as_array().expect("array");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["lookup_term"], "run");
    assert_eq!(notes[0]["book_name"], "Alpha");
    assert_eq!(notes[0]["sentence"], "She began to run fast down the hill.");
    assert_eq!(notes[0]["date"].as_str().unwrap().len(), 19);
}

#[test]
fn test_export_csv_file_with_force() {
    let dev = Device::english();
    let out = dev.out("out/notes.csv");
    let out_s = out.to_string_lossy().to_string();

    for _ in 0..2 {
        dev.cmd()
            .args([
                "--test",
                "import",
                "--reader",
                &dev.root_str(),
                "--no-history",
                "--format",
                "csv",
                "--file",
                &out_s,
                "--force",
            ])
            .assert()
            .success();
    }

    let content = fs::read_to_string(&out).expect("csv written");
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("lookup_term,sentence,book_name,date"));
    let row = lines.next().expect("one row");
    assert!(row.starts_with("run,She began to run fast down the hill.,Alpha,"));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_fresh_store_prints_no_schema_notice() {
    let dev = Device::english();

    dev.cmd()
        .args(["--test", "import", "--reader", &dev.root_str(), "--no-history"])
        .assert()
        .success()
        .stdout(contains("Migration").not())
        .stdout(contains("Books in language 'en': 1"))
        .stdout(contains("Found 1 notes"));
}

#[test]
fn test_removed_saved_sdcard_warns_and_continues() {
    let dev = Device::english();
    let sd = dev.out("sd");
    fs::create_dir_all(&sd).unwrap();

    dev.cmd()
        .args([
            "config",
            "--set-reader",
            &dev.root_str(),
            "--set-sdcard",
            &sd.to_string_lossy(),
        ])
        .assert()
        .success();

    fs::remove_dir_all(&sd).unwrap();

    dev.cmd()
        .args(["--test", "import", "--no-history"])
        .assert()
        .success()
        .stdout(contains("Saved SD card path not found"))
        .stdout(contains("Found 1 notes"));
}

#[test]
fn test_missing_explicit_paths_warn_and_fall_back() {
    let dev = Device::english();

    dev.cmd()
        .args(["config", "--set-reader", &dev.root_str()])
        .assert()
        .success();

    dev.cmd()
        .args([
            "--test",
            "import",
            "--reader",
            "/no/such/reader",
            "--sdcard",
            "/no/such/card",
            "--no-history",
        ])
        .assert()
        .success()
        .stdout(contains("Reader partition not found: /no/such/reader"))
        .stdout(contains("SD card partition not found: /no/such/card"))
        .stdout(contains("Found 1 notes"));
}
