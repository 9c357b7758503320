use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::log::{self, LogOp};
use crate::db::recorder::SqliteRecorder;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::path::existing_dir;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cli: &Cli, cfg: &mut Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
        set_reader,
        set_sdcard,
        lang,
    } = &cli.command
    {
        let mut changes = Vec::new();

        if let Some(reader) = set_reader {
            let p = existing_dir(reader)
                .ok_or_else(|| AppError::Config(format!("reader partition not found: {reader}")))?;
            cfg.reader_partition = p.to_string_lossy().to_string();
            changes.push(format!("reader_partition = {}", cfg.reader_partition));
        }

        if let Some(sd) = set_sdcard {
            if sd.is_empty() {
                cfg.sdcard_partition.clear();
            } else {
                let p = existing_dir(sd)
                    .ok_or_else(|| AppError::Config(format!("SD card partition not found: {sd}")))?;
                cfg.sdcard_partition = p.to_string_lossy().to_string();
            }
            changes.push(format!("sdcard_partition = {}", cfg.sdcard_partition));
        }

        if let Some(l) = lang {
            let l = l.trim();
            if l.is_empty() {
                return Err(AppError::Config("language code must not be empty".into()));
            }
            cfg.target_language = l.to_string();
            changes.push(format!("target_language = {l}"));
        }

        if !changes.is_empty() {
            if cli.test {
                warning("Test mode: configuration not written.");
            } else {
                cfg.save()?;
                success(format!("Configuration saved: {}", changes.join(", ")));

                if let Ok(recorder) = SqliteRecorder::open(&cfg.database) {
                    let _ = log::ttlog(recorder.conn(), LogOp::Config, "", &changes.join(", "));
                }
            }
        }

        // ---- PRINT CONFIG ----
        if *print_config {
            let yaml = serde_yaml::to_string(&*cfg).map_err(|e| AppError::Config(e.to_string()))?;
            println!("📄 Current configuration:\n");
            println!("{yaml}");
            if !cfg.has_saved_reader() {
                warning("No reachable reader partition saved. Use --set-reader <PATH>.");
            }
        }

        // ---- EDIT CONFIG ----
        if *edit_config {
            edit(editor.clone())?;
        }
    }

    Ok(())
}

fn edit(requested: Option<String>) -> AppResult<()> {
    let path = Config::config_file();
    if !path.exists() {
        Config::default().save()?;
    }

    let default_editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    let editor_to_use = requested.unwrap_or_else(|| default_editor.clone());

    match Command::new(&editor_to_use).arg(&path).status() {
        Ok(s) if s.success() => {
            success(format!(
                "Configuration file edited successfully using '{editor_to_use}'"
            ));
            return Ok(());
        }
        Ok(_) | Err(_) => warning(format!(
            "Editor '{editor_to_use}' not available, falling back to '{default_editor}'"
        )),
    }

    match Command::new(&default_editor).arg(&path).status() {
        Ok(s) if s.success() => {
            success(format!(
                "Configuration file edited successfully using fallback '{default_editor}'"
            ));
            Ok(())
        }
        Ok(_) | Err(_) => Err(AppError::Config(format!(
            "failed to edit configuration file using '{default_editor}'"
        ))),
    }
}
