//! KOReader vocabulary import.
//!
//! scan books → read metadata → keep books in the target language →
//! vocabulary builder rows → reading notes; lookup history is forwarded to
//! the recorder on the side.

use crate::config::Config;
use crate::core::history::{ForwardStats, forward_lookups, parse_history};
use crate::core::metadata::read_book;
use crate::core::sentence::{SentenceSplitter, extract_sentence};
use crate::db::recorder::LookupRecorder;
use crate::errors::{AppError, AppResult};
use crate::koreader::{self, VocabDb};
use crate::lua::Decoder;
use crate::models::book::BookRef;
use crate::models::reading_note::ReadingNote;
use crate::models::vocab::VocabEntry;
use crate::ui::messages::{info, warning};
use crate::utils::format_local_timestamp;
use crate::utils::path::{existing_dir, expand_tilde};
use log::{debug, error};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

/// Device storage roots. The vocabulary database and the history log are
/// always looked up on `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitions {
    pub main: PathBuf,
    pub sdcard: Option<PathBuf>,
}

impl Partitions {
    /// Explicit path first (saved for next time when `persist`), then the
    /// saved one. Fails before touching the device when neither exists.
    ///
    /// An explicit path deliberately takes precedence over the saved one,
    /// so a typed `--reader` always applies to the run.
    pub fn resolve(
        cfg: &mut Config,
        reader: Option<&str>,
        sdcard: Option<&str>,
        persist: bool,
    ) -> AppResult<Self> {
        let main = match reader.and_then(existing_dir) {
            Some(p) => {
                if persist && cfg.reader_partition != p.to_string_lossy() {
                    cfg.reader_partition = p.to_string_lossy().to_string();
                    cfg.save()?;
                    debug!("Using and saving new reader partition: {}", p.display());
                }
                p
            }
            None => {
                if let Some(r) = reader {
                    warning(format!("Reader partition not found: {r}"));
                }
                let saved = existing_dir(&cfg.reader_partition).ok_or(AppError::NoReaderPartition)?;
                debug!("Using saved reader partition: {}", saved.display());
                saved
            }
        };

        let sdcard = match sdcard {
            Some(s) => {
                let p = existing_dir(s);
                if p.is_none() {
                    warning(format!("SD card partition not found: {s}"));
                }
                p
            }
            None if cfg.sdcard_partition.is_empty() => None,
            None => {
                let p = existing_dir(&cfg.sdcard_partition);
                match &p {
                    Some(p) => debug!("Using saved SD card partition: {}", p.display()),
                    None => {
                        warning(format!(
                            "Saved SD card path not found: {}",
                            expand_tilde(&cfg.sdcard_partition).display()
                        ));
                        warning("Please update it with `kovocab config --set-sdcard <PATH>`");
                    }
                }
                p
            }
        };

        Ok(Self { main, sdcard })
    }
}

#[derive(Debug, Clone)]
pub struct HistorySummary {
    pub path: PathBuf,
    pub stats: ForwardStats,
}

/// Outcome of a run. Only `notes` is the import result proper.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub notes: Vec<ReadingNote>,
    pub db_path: PathBuf,
    pub language: String,
    pub books_in_language: Vec<String>,
    pub skipped_books: Vec<String>,
    /// `None` when history was disabled or could not be read.
    pub history: Option<HistorySummary>,
}

pub struct KoreaderImporter<'a> {
    partitions: Partitions,
    language: String,
    source: String,
    decoder: &'a dyn Decoder,
    splitter: &'a dyn SentenceSplitter,
    with_history: bool,
}

impl<'a> KoreaderImporter<'a> {
    pub fn new(
        partitions: Partitions,
        language: &str,
        source: &str,
        decoder: &'a dyn Decoder,
        splitter: &'a dyn SentenceSplitter,
    ) -> Self {
        Self {
            partitions,
            language: language.to_string(),
            source: source.to_string(),
            decoder,
            splitter,
            with_history: true,
        }
    }

    pub fn without_history(mut self) -> Self {
        self.with_history = false;
        self
    }

    pub fn partitions(&self) -> &Partitions {
        &self.partitions
    }

    /// Books on both partitions with their metadata.
    pub fn scan_books(&self) -> AppResult<Vec<BookRef>> {
        let mut files = koreader::scan_books(&self.partitions.main)?;

        if let Some(sd) = &self.partitions.sdcard {
            let extra = koreader::scan_books(sd)?;
            debug!("Found {} additional books on SD card partition", extra.len());
            files.extend(extra);
        }

        Ok(files
            .iter()
            .map(|f| read_book(self.decoder, f, &self.language))
            .collect())
    }

    pub fn get_notes(&self, recorder: &mut dyn LookupRecorder) -> AppResult<ImportReport> {
        let books = self.scan_books()?;

        let (in_lang, other): (Vec<BookRef>, Vec<BookRef>) =
            books.into_iter().partition(|b| b.is_in_language(&self.language));
        let books_in_language: Vec<String> = in_lang.into_iter().map(|b| b.title).collect();
        let skipped_books: Vec<String> = other.into_iter().map(|b| b.title).collect();

        debug!("Books in language {}: {:?}", self.language, books_in_language);
        debug!(
            "Other books have been skipped. They are {}",
            skipped_books.join(", ")
        );

        let titles: HashSet<String> = books_in_language.iter().cloned().collect();

        let db_path = koreader::find_db_path(&self.partitions.main)?;
        debug!("KOReader vocab db path: {}", db_path.display());

        let db = VocabDb::open(&db_path)?;
        let book_map = book_map(db.titles()?, &titles);
        let notes = build_notes(&db.entries()?, &book_map, self.splitter);

        let history = if self.with_history {
            self.import_history(recorder, &titles)?
        } else {
            None
        };

        Ok(ImportReport {
            notes,
            db_path,
            language: self.language.clone(),
            books_in_language,
            skipped_books,
            history,
        })
    }

    /// Unreadable history is not fatal: the notes are still returned.
    fn import_history(
        &self,
        recorder: &mut dyn LookupRecorder,
        titles: &HashSet<String>,
    ) -> AppResult<Option<HistorySummary>> {
        let loaded = koreader::find_history_path(&self.partitions.main)
            .and_then(|p| Ok((fs::read_to_string(&p)?, p)));

        let (raw, path) = match loaded {
            Ok(v) => v,
            Err(e) => {
                error!("Failed to find or open lookup_history.lua: {e}");
                warning("Failed to find/read lookup_history.lua. Lookups will not be tracked this time.");
                info("Make sure that it is located somewhere under the selected KOReader directory.");
                return Ok(None);
            }
        };
        debug!("KOReader history path: {}", path.display());

        let entries = parse_history(self.decoder, &raw);
        let stats = forward_lookups(recorder, &entries, titles, &self.language, &self.source)?;

        Ok(Some(HistorySummary { path, stats }))
    }
}

/// `title.id → name` for titles of in-language books.
pub fn book_map(titles: Vec<(i64, String)>, in_lang: &HashSet<String>) -> HashMap<i64, String> {
    titles
        .into_iter()
        .filter(|(_, name)| in_lang.contains(name))
        .collect()
}

/// One note per usable entry, in table order.
pub fn build_notes(
    entries: &[VocabEntry],
    book_map: &HashMap<i64, String>,
    splitter: &dyn SentenceSplitter,
) -> Vec<ReadingNote> {
    entries
        .iter()
        .filter_map(|e| {
            let book_name = book_map.get(&e.title_id)?;
            let sentence = extract_sentence(
                splitter,
                &e.word,
                e.prev_context.as_deref(),
                e.next_context.as_deref(),
            )?;
            let date = match format_local_timestamp(e.create_time) {
                Ok(d) => d,
                Err(err) => {
                    debug!("Skipping '{}': {err}", e.word);
                    return None;
                }
            };

            Some(ReadingNote {
                lookup_term: e.word.clone(),
                sentence,
                book_name: book_name.clone(),
                date,
            })
        })
        .collect()
}

/// Importer from configuration and CLI overrides, with the default decoder
/// and splitter supplied by the caller.
pub fn importer_from_config<'a>(
    cfg: &mut Config,
    reader: Option<&str>,
    sdcard: Option<&str>,
    language: Option<&str>,
    persist: bool,
    decoder: &'a dyn Decoder,
    splitter: &'a dyn SentenceSplitter,
) -> AppResult<KoreaderImporter<'a>> {
    let partitions = Partitions::resolve(cfg, reader, sdcard, persist)?;
    let language = language.unwrap_or(&cfg.target_language);
    Ok(KoreaderImporter::new(
        partitions,
        language,
        &cfg.source_tag,
        decoder,
        splitter,
    ))
}
