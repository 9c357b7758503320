use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::recorder::SqliteRecorder;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let recorder = SqliteRecorder::open(&cfg.database)?;
        LogLogic::print_log(recorder.conn())?;
    }

    Ok(())
}
