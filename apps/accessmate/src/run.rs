//! File-level runners behind the `scan`, `fix`, `filter` and `stop-autoplay`
//! commands.
//!
//! Each file is parsed, processed and serialized inside one task. Documents
//! never cross threads; only the resulting reports do.

use crate::dom::Document;
use crate::error::{Error, Result};
use crate::filters::{self, ColorVisionMode, FilterOutcome};
use crate::fix;
use crate::media::{self, AutoplayOutcome};
use crate::models::{Finding, FixTarget, ScanReport};
use crate::scan::{self, ScanOptions};
use crate::utils::display_path;
use glob::glob;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileScan {
    pub file: String,
    pub report: ScanReport,
    /// Populated only when details were requested.
    pub findings: Vec<Finding>,
    pub wrote: bool,
}

#[derive(Debug, Clone)]
pub struct FixResult {
    pub file: String,
    pub target: FixTarget,
    pub changed: usize,
    pub wrote: bool,
    /// Fixed HTML when not writing.
    pub preview: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FilterResult {
    pub file: String,
    pub mode: ColorVisionMode,
    pub outcome: FilterOutcome,
    pub wrote: bool,
    pub preview: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AutoplayResult {
    pub file: String,
    pub outcome: AutoplayOutcome,
    pub wrote: bool,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub auto_fix: bool,
    pub highlight: bool,
    pub details: bool,
    pub write: bool,
}

/// Expand file paths and glob patterns into a sorted, de-duplicated list.
pub fn resolve_targets(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut targets: Vec<PathBuf> = Vec::new();
    for pat in patterns {
        let literal = PathBuf::from(pat);
        if literal.is_file() {
            targets.push(literal);
            continue;
        }
        let entries = glob(pat).map_err(|e| Error::InvalidGlob {
            pattern: pat.clone(),
            message: e.msg.to_string(),
        })?;
        let before = targets.len();
        for entry in entries {
            match entry {
                Ok(p) if p.is_file() => targets.push(p),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping unreadable path"),
            }
        }
        if targets.len() == before {
            tracing::warn!(pattern = %pat, "pattern matched no files");
        }
    }
    targets.sort();
    targets.dedup();
    Ok(targets)
}

fn scan_one(path: &Path, base: &Path, req: &ScanRequest) -> Result<FileScan> {
    let mut doc = Document::from_path(path)?;
    if req.auto_fix {
        fix::fix_all(&mut doc);
    }
    let findings = scan::audit(
        &doc,
        &ScanOptions {
            highlight: req.highlight,
        },
    );
    let report = scan::fold(&findings);
    if req.write {
        fs::write(path, doc.to_html())?;
    }
    Ok(FileScan {
        file: display_path(path, base),
        report,
        findings: if req.details { findings } else { Vec::new() },
        wrote: req.write,
    })
}

/// Scan every target in parallel. Per-file failures are collected as
/// messages rather than aborting the run.
pub fn run_scan(targets: &[PathBuf], base: &Path, req: &ScanRequest) -> (Vec<FileScan>, Vec<String>) {
    let outcomes: Vec<std::result::Result<FileScan, String>> = targets
        .par_iter()
        .map(|path| {
            scan_one(path, base, req)
                .map_err(|e| format!("{}: {}", display_path(path, base), e))
        })
        .collect();

    let mut results = Vec::new();
    let mut errors = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(r) => results.push(r),
            Err(e) => errors.push(e),
        }
    }
    tracing::info!(files = results.len(), failed = errors.len(), "scan run finished");
    (results, errors)
}

pub fn run_fix(path: &Path, base: &Path, target: FixTarget, write: bool) -> Result<FixResult> {
    let mut doc = Document::from_path(path)?;
    let changed = fix::apply(&mut doc, target);
    let html = doc.to_html();
    let preview = if write {
        fs::write(path, &html)?;
        None
    } else {
        Some(html)
    };
    Ok(FixResult {
        file: display_path(path, base),
        target,
        changed,
        wrote: write,
        preview,
    })
}

pub fn run_filter(
    path: &Path,
    base: &Path,
    mode: ColorVisionMode,
    threshold: f64,
    write: bool,
) -> Result<FilterResult> {
    let mut doc = Document::from_path(path)?;
    let outcome = filters::apply(&mut doc, mode, threshold);
    let html = doc.to_html();
    let preview = if write {
        fs::write(path, &html)?;
        None
    } else {
        Some(html)
    };
    Ok(FilterResult {
        file: display_path(path, base),
        mode,
        outcome,
        wrote: write,
        preview,
    })
}

pub fn run_stop_autoplay(path: &Path, base: &Path, write: bool) -> Result<AutoplayResult> {
    let mut doc = Document::from_path(path)?;
    let outcome = media::stop_autoplay(&mut doc);
    let html = doc.to_html();
    let preview = if write {
        fs::write(path, &html)?;
        None
    } else {
        Some(html)
    };
    Ok(AutoplayResult {
        file: display_path(path, base),
        outcome,
        wrote: write,
        preview,
    })
}
