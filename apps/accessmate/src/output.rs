//! Output rendering for scan, fix, filter and stop-autoplay commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-file fields and a top-level summary.

use crate::run::{AutoplayResult, FileScan, FilterResult, FixResult};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && crate::utils::colors_enabled()
}

fn print_json(value: &JsonVal) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
    }
}

fn print_errors(errors: &[String]) {
    for e in errors {
        eprintln!("{} {}", crate::utils::error_prefix(), e);
    }
}

fn score_badge(score: u32, color: bool) -> String {
    let text = format!("{}/100", score);
    if !color {
        return text;
    }
    match score {
        90..=100 => text.green().bold().to_string(),
        70..=89 => text.yellow().bold().to_string(),
        _ => text.red().bold().to_string(),
    }
}

/// Print scan reports in the requested format.
pub fn print_scan(results: &[FileScan], output: &str, errors: &[String]) {
    match output {
        "json" => print_json(&compose_scan_json(results, errors)),
        _ => {
            let color = use_colors(output);
            for r in results {
                let file = if color { r.file.bold().to_string() } else { r.file.clone() };
                println!("{} score {}", file, score_badge(r.report.score, color));
                for item in r.report.issues.iter().filter(|i| i.count > 0) {
                    let icon = if color { "✖".red().to_string() } else { "✖".to_string() };
                    println!("  {} {} ({})", icon, item.category, item.count);
                }
                for f in &r.findings {
                    let at = f.target.as_deref().unwrap_or("document");
                    if color {
                        println!("    {} {} {}", "·".bright_black(), at.bright_black(), f.message);
                    } else {
                        println!("    · {} {}", at, f.message);
                    }
                }
                if r.wrote {
                    println!("  saved {}", r.file);
                }
            }
            let summary = format!(
                "— Summary — files={} findings={} lowest={}",
                results.len(),
                results.iter().map(|r| r.report.total_findings()).sum::<usize>(),
                results.iter().map(|r| r.report.score).min().unwrap_or(100)
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
            print_errors(errors);
        }
    }
}

/// Print a fix result. Without `--write` the fixed HTML is the preview.
pub fn print_fix(res: &FixResult, output: &str) {
    match output {
        "json" => print_json(&compose_fix_json(res)),
        _ => {
            let color = use_colors(output);
            if res.wrote {
                let label = format!("fixed {} element(s):", res.changed);
                if color {
                    println!("{} {}", label.green().bold(), res.file.bold());
                } else {
                    println!("{} {}", label, res.file);
                }
            } else if let Some(prev) = &res.preview {
                if color {
                    println!("{} {}\n{}", "---".cyan().bold(), res.file.bold(), prev);
                } else {
                    println!("--- {}\n{}", res.file, prev);
                }
            }
        }
    }
}

pub fn print_filter(res: &FilterResult, output: &str) {
    match output {
        "json" => print_json(&compose_filter_json(res)),
        _ => {
            let color = use_colors(output);
            let line = format!(
                "{}: {} colour(s) remapped, {} image(s) filtered",
                res.mode, res.outcome.properties, res.outcome.images
            );
            if color {
                println!("{} {}", line.green().bold(), res.file.bold());
            } else {
                println!("{} {}", line, res.file);
            }
            if let Some(prev) = &res.preview {
                println!("--- {}\n{}", res.file, prev);
            }
        }
    }
}

pub fn print_autoplay(res: &AutoplayResult, output: &str) {
    match output {
        "json" => print_json(&compose_autoplay_json(res)),
        _ => {
            let line = format!(
                "autoplay: {} media element(s), {} embed(s) stopped",
                res.outcome.media, res.outcome.embeds
            );
            if use_colors(output) {
                println!("{} {}", line.green().bold(), res.file.bold());
            } else {
                println!("{} {}", line, res.file);
            }
            if let Some(prev) = &res.preview {
                println!("--- {}\n{}", res.file, prev);
            }
        }
    }
}

/// Compose scan JSON object (pure) for testing/snapshot purposes.
pub fn compose_scan_json(results: &[FileScan], errors: &[String]) -> JsonVal {
    let items: Vec<_> = results
        .iter()
        .map(|r| {
            let mut item = json!({
                "file": r.file,
                "score": r.report.score,
                "issues": r.report.issues,
                "wrote": r.wrote,
            });
            if !r.findings.is_empty() {
                item["findings"] = json!(r.findings);
            }
            item
        })
        .collect();
    let summary = json!({
        "files": results.len(),
        "findings": results.iter().map(|r| r.report.total_findings()).sum::<usize>(),
        "lowest": results.iter().map(|r| r.report.score).min(),
        "errors": errors.len(),
    });
    json!({"results": items, "summary": summary, "errors": errors})
}

pub fn compose_fix_json(res: &FixResult) -> JsonVal {
    let target = match res.target {
        crate::models::FixTarget::All => "all".to_string(),
        crate::models::FixTarget::Category(c) => c.id().to_string(),
    };
    json!({
        "file": res.file,
        "issue": target,
        "changed": res.changed,
        "wrote": res.wrote,
        "preview": res.preview,
    })
}

pub fn compose_filter_json(res: &FilterResult) -> JsonVal {
    json!({
        "file": res.file,
        "mode": res.mode,
        "properties": res.outcome.properties,
        "images": res.outcome.images,
        "wrote": res.wrote,
        "preview": res.preview,
    })
}

pub fn compose_autoplay_json(res: &AutoplayResult) -> JsonVal {
    json!({
        "file": res.file,
        "media": res.outcome.media,
        "embeds": res.outcome.embeds,
        "wrote": res.wrote,
        "preview": res.preview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{ColorVisionMode, FilterOutcome};
    use crate::models::{Finding, FixTarget, IssueCategory};
    use crate::scan::fold;

    fn sample() -> Vec<FileScan> {
        let findings = vec![
            Finding::new(IssueCategory::MissingAlt, "Image has no alt attribute.")
                .at("<img src=\"a.png\">".into()),
            Finding::new(IssueCategory::HeadingHierarchy, "No <h1> element found on the page."),
        ];
        vec![
            FileScan {
                file: "index.html".into(),
                report: fold(&findings),
                findings,
                wrote: false,
            },
            FileScan {
                file: "about.html".into(),
                report: fold(&[]),
                findings: Vec::new(),
                wrote: false,
            },
        ]
    }

    #[test]
    fn test_compose_scan_json_shape() {
        let out = compose_scan_json(&sample(), &["gone.html: not found".to_string()]);
        assert_eq!(out["summary"]["files"], 2);
        assert_eq!(out["summary"]["findings"], 2);
        assert_eq!(out["summary"]["lowest"], 96);
        assert_eq!(out["summary"]["errors"], 1);
        assert_eq!(out["results"][0]["score"], 96);
        assert_eq!(out["results"][0]["issues"][0]["type"], "Missing alt attribute");
        assert_eq!(out["results"][0]["issues"].as_array().unwrap().len(), 7);
        assert_eq!(out["results"][0]["findings"][0]["target"], "<img src=\"a.png\">");
        assert!(out["results"][0]["findings"][1].get("target").is_none());
        assert!(out["results"][1].get("findings").is_none());
    }

    #[test]
    fn test_compose_fix_and_filter_json() {
        let fix = FixResult {
            file: "a.html".into(),
            target: FixTarget::Category(IssueCategory::SmallFont),
            changed: 2,
            wrote: true,
            preview: None,
        };
        let out = compose_fix_json(&fix);
        assert_eq!(out["issue"], "small-font");
        assert!(out["preview"].is_null());

        let filter = FilterResult {
            file: "a.html".into(),
            mode: ColorVisionMode::Deuteranopia,
            outcome: FilterOutcome { properties: 3, images: 1 },
            wrote: false,
            preview: Some("<html></html>".into()),
        };
        let out = compose_filter_json(&filter);
        assert_eq!(out["mode"], "deuteranopia");
        assert_eq!(out["properties"], 3);
        assert_eq!(out["preview"], "<html></html>");
    }

    #[test]
    fn test_compose_autoplay_json() {
        let res = AutoplayResult {
            file: "v.html".into(),
            outcome: crate::media::AutoplayOutcome { media: 2, embeds: 1 },
            wrote: true,
            preview: None,
        };
        let out = compose_autoplay_json(&res);
        assert_eq!(out["media"], 2);
        assert_eq!(out["embeds"], 1);
        assert_eq!(out["wrote"], true);
    }
}
