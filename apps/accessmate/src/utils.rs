//! Supporting helpers: colored message prefixes and path display.

use owo_colors::OwoColorize;
use std::path::Path;

/// Whether human output may use ANSI colors (`NO_COLOR` unset).
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn prefix(label: &str, paint: fn(&str) -> String) -> String {
    if colors_enabled() {
        paint(label)
    } else {
        label.to_string()
    }
}

pub fn error_prefix() -> String {
    prefix("error:", |s| s.red().bold().to_string())
}

pub fn note_prefix() -> String {
    prefix("note:", |s| s.yellow().bold().to_string())
}

pub fn info_prefix() -> String {
    prefix("info:", |s| s.blue().bold().to_string())
}

/// `path` relative to `base` when it lies below it, otherwise unchanged.
pub fn display_path(path: &Path, base: &Path) -> String {
    match pathdiff::diff_paths(path, base) {
        Some(rel) if !rel.starts_with("..") && !rel.as_os_str().is_empty() => {
            rel.to_string_lossy().to_string()
        }
        _ => path.to_string_lossy().to_string(),
    }
}
