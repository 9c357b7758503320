use crate::config::Config;
use crate::db::log::{self, LogOp};
use crate::db::recorder::SqliteRecorder;
use crate::errors::AppResult;
use crate::ui::messages::error;

use crate::cli::parser::Cli;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the lookup store and its migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    println!("⚙️  Initializing kovocab…");

    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    let recorder = SqliteRecorder::open(&db_path)?;

    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &db_path);

    // internal log is best effort
    if let Err(e) = log::ttlog(
        recorder.conn(),
        LogOp::Init,
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    ) {
        error(format!("Failed to write internal log: {e}"));
    }

    println!("🎉 kovocab initialization completed!");
    Ok(())
}
