use crate::errors::{AppError, AppResult};
use crate::models::lookup::KOREADER_SOURCE;
use crate::utils::path::existing_dir;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Lookup record store (SQLite).
    #[serde(default = "default_database")]
    pub database: String,
    /// Saved KOReader device partition; empty when unset.
    #[serde(default)]
    pub reader_partition: String,
    /// Saved removable-card partition; empty when unset.
    #[serde(default)]
    pub sdcard_partition: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_target_language() -> String {
    "en".to_string()
}
fn default_source_tag() -> String {
    KOREADER_SOURCE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            reader_partition: String::new(),
            sdcard_partition: String::new(),
            target_language: default_target_language(),
            source_tag: default_source_tag(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("kovocab")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".kovocab")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("kovocab.conf")
    }

    /// Return the full path of the lookup record store
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("kovocab.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// Missing keys take their defaults.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(Self::config_file(), yaml)?;
        Ok(())
    }

    /// A saved reader partition exists and is still reachable.
    pub fn has_saved_reader(&self) -> bool {
        existing_dir(&self.reader_partition).is_some()
    }

    /// Initialize configuration and the lookup store file.
    /// Returns the store path.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        // keep saved partitions/language when re-initialising
        let mut config = Self::load().unwrap_or_default();
        config.database = db_path.to_string_lossy().to_string();

        if !is_test {
            config.save()?;
            println!("✅ Config file: {}", Self::config_file().display());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        println!("✅ Database:    {}", db_path.display());

        Ok(db_path)
    }
}
