//! Configuration discovery and effective settings resolution.
//!
//! AccessMate reads `accessmate.toml|yaml|yml` from the project root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `output`: `human`
//! - `highlight`: true
//! - `autoFix`: false (falls back to the persisted setting first)
//! - `details`: false
//! - `failUnder`: unset
//! - `filters.threshold`: 80.0
//!
//! Overrides precedence: CLI > config file > persisted setting > defaults.

use crate::color::DEFAULT_NEAR_THRESHOLD;
use crate::error::Result;
use crate::settings::SettingsStore;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_TOML: &str = "accessmate.toml";
const CONFIG_YAML: [&str; 2] = ["accessmate.yaml", "accessmate.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Colour-vision filter section under `[filters]`.
pub struct FiltersCfg {
    pub threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `accessmate.toml|yaml`.
pub struct AccessMateConfig {
    pub output: Option<String>,
    pub highlight: Option<bool>,
    #[serde(rename = "autoFix")]
    pub auto_fix: Option<bool>,
    pub details: Option<bool>,
    #[serde(rename = "failUnder")]
    pub fail_under: Option<u32>,
    #[serde(default)]
    pub filters: Option<FiltersCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub config_found: bool,
    pub output: String,
    pub highlight: bool,
    pub auto_fix: bool,
    pub details: bool,
    pub fail_under: Option<u32>,
    pub threshold: f64,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when an `accessmate.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if has_config(cur) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

fn has_config(dir: &Path) -> bool {
    dir.join(CONFIG_TOML).exists() || CONFIG_YAML.iter().any(|y| dir.join(y).exists())
}

/// Load `AccessMateConfig` from `accessmate.toml` or `accessmate.yaml|yml`.
///
/// `Ok(None)` when no file is present; a file that fails to parse is an
/// error.
pub fn load_config(root: &Path) -> Result<Option<AccessMateConfig>> {
    let toml_path = root.join(CONFIG_TOML);
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path)?;
        let cfg: AccessMateConfig = toml::from_str(&s)?;
        tracing::debug!(path = %toml_path.display(), "loaded config");
        return Ok(Some(cfg));
    }
    for yml in CONFIG_YAML {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p)?;
            let cfg: AccessMateConfig = serde_yaml::from_str(&s)?;
            tracing::debug!(path = %p.display(), "loaded config");
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, the
/// persisted setting and defaults.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_output: Option<&str>,
    cli_highlight: Option<bool>,
    cli_auto_fix: Option<bool>,
    cli_details: Option<bool>,
) -> Result<Effective> {
    let start = PathBuf::from(cli_root.unwrap_or("."));
    let root = detect_root(&start);
    let loaded = load_config(&root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let highlight = cli_highlight.or(cfg.highlight).unwrap_or(true);
    let auto_fix = cli_auto_fix
        .or(cfg.auto_fix)
        .unwrap_or_else(|| SettingsStore::open(&root).auto_fix());
    let details = cli_details.or(cfg.details).unwrap_or(false);
    let threshold = cfg
        .filters
        .as_ref()
        .and_then(|f| f.threshold)
        .unwrap_or(DEFAULT_NEAR_THRESHOLD);

    Ok(Effective {
        root,
        config_found,
        output,
        highlight,
        auto_fix,
        details,
        fail_under: cfg.fail_under,
        threshold,
    })
}
