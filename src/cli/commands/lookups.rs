use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::recorder::{LookupRecorder, SqliteRecorder};
use crate::db::stats::lookups_by_language;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Lookups { lang } = cmd {
        let recorder = SqliteRecorder::open(&cfg.database)?;

        match lang {
            Some(l) => {
                let n = recorder.count_lookups(l)?;
                println!("{l}: {n}");
            }
            None => {
                let rows = lookups_by_language(recorder.conn())?;
                if rows.is_empty() {
                    info("No lookups recorded yet.");
                }
                for (l, n) in rows {
                    println!("{l}: {n}");
                }
            }
        }
    }

    Ok(())
}
