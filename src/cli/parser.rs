use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for kovocab
/// Imports KOReader vocabulary builder words as reading notes
#[derive(Parser)]
#[command(
    name = "kovocab",
    version = env!("CARGO_PKG_VERSION"),
    about = "Import KOReader vocabulary builder entries and lookup history as reading notes",
    long_about = None
)]
pub struct Cli {
    /// Override the lookup store path (useful for tests or a custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the lookup store
    Init,

    /// Manage the configuration file (view, edit or set values)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,

        #[arg(long = "set-reader", value_name = "PATH", help = "Save the KOReader device partition")]
        set_reader: Option<String>,

        #[arg(long = "set-sdcard", value_name = "PATH", help = "Save the SD card partition (empty string clears it)")]
        set_sdcard: Option<String>,

        #[arg(long = "lang", value_name = "CODE", help = "Save the target language code (e.g. en, de)")]
        lang: Option<String>,
    },

    /// Import reading notes from a KOReader device
    Import {
        /// KOReader device partition (defaults to the saved one)
        #[arg(long = "reader", value_name = "PATH")]
        reader: Option<String>,

        /// SD card partition with more books
        #[arg(long = "sdcard", value_name = "PATH")]
        sdcard: Option<String>,

        /// Target language code (prefix match against book languages)
        #[arg(long = "lang", value_name = "CODE")]
        lang: Option<String>,

        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Write notes to this file instead of printing them
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        #[arg(long, short = 'f', requires = "file", help = "Overwrite FILE without asking")]
        force: bool,

        #[arg(long = "no-history", help = "Do not record lookups from lookup_history.lua")]
        no_history: bool,
    },

    /// Show how many lookups are recorded
    Lookups {
        #[arg(long = "lang", value_name = "CODE", help = "Only this language")]
        lang: Option<String>,
    },

    /// Maintain the lookup store
    Db {
        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
