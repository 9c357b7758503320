//! Path utilities: expand ~, resolve partition roots, derive book titles.

use std::path::{Path, PathBuf};

pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// `Some(path)` when the configured string is non-empty and points at an
/// existing directory.
pub fn existing_dir(path: &str) -> Option<PathBuf> {
    if path.trim().is_empty() {
        return None;
    }
    let p = expand_tilde(path);
    p.is_dir().then_some(p)
}

/// File name without its last extension: `/b/Alpha.epub` → `Alpha`.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
