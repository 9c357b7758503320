use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::import::{ImportReport, importer_from_config};
use crate::core::sentence::RegexSentenceSplitter;
use crate::db::log::{self, LogOp};
use crate::db::recorder::SqliteRecorder;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::lua::LuaDecoder;
use crate::models::reading_note::ReadingNote;
use crate::ui::messages::{error, header, info, success};
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &mut Config) -> AppResult<()> {
    if let Commands::Import {
        reader,
        sdcard,
        lang,
        format,
        file,
        force,
        no_history,
    } = &cli.command
    {
        let decoder = LuaDecoder;
        let splitter = RegexSentenceSplitter;

        let mut importer = importer_from_config(
            cfg,
            reader.as_deref(),
            sdcard.as_deref(),
            lang.as_deref(),
            !cli.test,
            &decoder,
            &splitter,
        )?;
        if *no_history {
            importer = importer.without_history();
        }

        let partition = importer.partitions().main.to_string_lossy().to_string();

        let mut recorder = SqliteRecorder::open(&cfg.database)?;
        let report = importer.get_notes(&mut recorder)?;

        print_summary(&report);

        match file {
            Some(f) => ExportLogic::export(&report.notes, *format, f, *force)?,
            None => print_notes(&report.notes),
        }

        let mut message = match &report.history {
            Some(h) => format!(
                "{} notes, {} lookups matched, {} added ({})",
                report.notes.len(),
                h.stats.matched,
                h.stats.added,
                report.language
            ),
            None => format!("{} notes ({})", report.notes.len(), report.language),
        };
        if let Some(f) = file {
            message.push_str(&format!(", exported as {} to {f}", format.as_str()));
        }
        if let Err(e) = log::ttlog(recorder.conn(), LogOp::Import, &partition, &message) {
            error(format!("Failed to write internal log: {e}"));
        }
    }

    Ok(())
}

fn print_summary(report: &ImportReport) {
    info(format!("Vocabulary database: {}", report.db_path.display()));
    success(format!(
        "Found {} notes in Vocabulary Builder in language '{}'",
        report.notes.len(),
        report.language
    ));

    info(format!(
        "Books in language '{}': {}",
        report.language,
        report.books_in_language.len()
    ));
    if !report.skipped_books.is_empty() {
        info(format!(
            "Skipped {} book(s) in other languages",
            report.skipped_books.len()
        ));
    }

    if let Some(h) = &report.history {
        info(format!("Lookup history: {}", h.path.display()));
        success(format!(
            "Found {} lookups in {}, added {} to lookup database.",
            h.stats.matched, report.language, h.stats.added
        ));
    }
}

fn print_notes(notes: &[ReadingNote]) {
    if notes.is_empty() {
        return;
    }

    println!();
    header("Reading notes");

    let mut table = Table::new(vec![
        Column::new("Word", 20),
        Column::new("Book", 24),
        Column::new("Date", 19),
        Column::new("Sentence", 60),
    ]);
    for n in notes {
        table.add_row(vec![
            n.lookup_term.clone(),
            n.book_name.clone(),
            n.date.clone(),
            n.sentence.clone(),
        ]);
    }
    print!("{}", table.render());
}
