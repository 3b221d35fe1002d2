//! AccessMate CLI binary entry point.
//! Delegates to the library for scan/fix/filter/serve and prints results.

use accessmate::cli::{Cli, Commands};
use accessmate::config::{self, Effective};
use accessmate::dom::Document;
use accessmate::filters::ColorVisionMode;
use accessmate::media;
use accessmate::messaging::ContentScript;
use accessmate::models::FixTarget;
use accessmate::scan::ScanOptions;
use accessmate::settings::SettingsStore;
use accessmate::{output, run, utils};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ACCESSMATE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(utils::colors_enabled())
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", utils::error_prefix(), message);
    std::process::exit(2);
}

fn effective(
    root: Option<&str>,
    output: Option<&str>,
    highlight: Option<bool>,
    auto_fix: Option<bool>,
    details: Option<bool>,
) -> Effective {
    let eff = config::resolve_effective(root, output, highlight, auto_fix, details)
        .unwrap_or_else(|e| fail(format!("invalid configuration: {}", e)));
    if !eff.config_found {
        tracing::debug!(root = %eff.root.display(), "no accessmate config found; using defaults");
    }
    eff
}

fn cwd() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Scan {
            files,
            root,
            auto_fix,
            no_highlight,
            details,
            write,
            output,
        } => {
            let eff = effective(
                root.as_deref(),
                output.as_deref(),
                if no_highlight { Some(false) } else { None },
                if auto_fix { Some(true) } else { None },
                if details { Some(true) } else { None },
            );
            let targets = run::resolve_targets(&files).unwrap_or_else(|e| fail(e));
            if targets.is_empty() {
                fail("no files matched the given paths or patterns");
            }
            let req = run::ScanRequest {
                auto_fix: eff.auto_fix,
                highlight: eff.highlight,
                details: eff.details,
                write,
            };
            let (results, errors) = run::run_scan(&targets, &cwd(), &req);
            output::print_scan(&results, &eff.output, &errors);
            if results.is_empty() && !errors.is_empty() {
                std::process::exit(2);
            }
            if let Some(min) = eff.fail_under {
                if results.iter().any(|r| r.report.score < min) {
                    std::process::exit(1);
                }
            }
        }
        Commands::Fix {
            file,
            issue,
            root,
            write,
            output,
        } => {
            let eff = effective(root.as_deref(), output.as_deref(), None, None, None);
            let target: FixTarget = issue.parse().unwrap_or_else(|e| fail(e));
            let res = run::run_fix(Path::new(&file), &cwd(), target, write)
                .unwrap_or_else(|e| fail(format!("{}: {}", file, e)));
            output::print_fix(&res, &eff.output);
        }
        Commands::Filter {
            file,
            mode,
            root,
            write,
            output,
        } => {
            let eff = effective(root.as_deref(), output.as_deref(), None, None, None);
            let mode: ColorVisionMode = mode.parse().unwrap_or_else(|e| fail(e));
            let res = run::run_filter(Path::new(&file), &cwd(), mode, eff.threshold, write)
                .unwrap_or_else(|e| fail(format!("{}: {}", file, e)));
            output::print_filter(&res, &eff.output);
        }
        Commands::StopAutoplay {
            file,
            root,
            write,
            output,
        } => {
            let eff = effective(root.as_deref(), output.as_deref(), None, None, None);
            let res = run::run_stop_autoplay(Path::new(&file), &cwd(), write)
                .unwrap_or_else(|e| fail(format!("{}: {}", file, e)));
            output::print_autoplay(&res, &eff.output);
        }
        Commands::Serve {
            file,
            root,
            write,
            keep_autoplay,
        } => {
            let eff = effective(root.as_deref(), None, None, None, None);
            let path = PathBuf::from(&file);
            let mut doc =
                Document::from_path(&path).unwrap_or_else(|e| fail(format!("{}: {}", file, e)));
            if !keep_autoplay {
                media::stop_autoplay(&mut doc);
            }
            let mut script = ContentScript::new(doc)
                .with_options(ScanOptions {
                    highlight: eff.highlight,
                })
                .with_threshold(eff.threshold);

            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            for line in stdin.lock().lines() {
                let line = line.unwrap_or_else(|e| fail(e));
                if line.trim().is_empty() {
                    continue;
                }
                match script.handle_json(&line) {
                    Ok(Some(reply)) => {
                        if writeln!(stdout, "{}", reply).and_then(|_| stdout.flush()).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("{} {}", utils::error_prefix(), e),
                }
            }
            if write {
                std::fs::write(&path, script.document().to_html())
                    .unwrap_or_else(|e| fail(format!("{}: {}", file, e)));
                eprintln!("{} saved {}", utils::info_prefix(), file);
            }
        }
        Commands::Settings { root, auto_fix } => {
            let start = PathBuf::from(root.as_deref().unwrap_or("."));
            let store = SettingsStore::open(&config::detect_root(&start));
            if let Some(value) = auto_fix {
                store
                    .set_auto_fix(value == "on")
                    .unwrap_or_else(|e| fail(format!("could not save settings: {}", e)));
            }
            println!("autoFix: {}", if store.auto_fix() { "on" } else { "off" });
            println!("store: {}", store.path().to_string_lossy());
        }
    }
}
