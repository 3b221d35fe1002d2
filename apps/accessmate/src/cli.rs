//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "accessmate",
    version,
    about = "AccessMate: scan and fix accessibility issues in HTML pages",
    long_about = "AccessMate scores HTML pages for common accessibility defects, fixes them in place, and remaps colours for colour-vision deficiencies.\n\nConfiguration precedence: CLI > accessmate.toml > persisted settings > defaults.",
    after_help = "Examples:\n  accessmate scan 'site/**/*.html' --details\n  accessmate fix index.html --issue \"Missing alt attribute\" --write\n  accessmate filter index.html --mode protanopia\n  accessmate stop-autoplay index.html --write\n  accessmate serve index.html --write < requests.jsonl",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current accessmate version.")]
    Version,
    /// Scan pages and print a score per file
    #[command(
        about = "Run an accessibility scan",
        long_about = "Score each page: 100 minus 2 points per finding, floored at 0. Exits 1 when a score falls below failUnder.",
        after_help = "Examples:\n  accessmate scan index.html\n  accessmate scan 'public/*.html' --auto-fix --write --output json"
    )]
    Scan {
        #[arg(required = true, help = "HTML files or glob patterns")]
        files: Vec<String>,
        #[arg(long, help = "Project root for config discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Fix every category before scoring")]
        auto_fix: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Do not outline flagged elements")]
        no_highlight: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "List individual findings")]
        details: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Save the processed page back to disk")]
        write: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Apply one remediator, or all of them
    #[command(
        about = "Fix an issue category",
        long_about = "Apply the remediator for one issue category (label or id) or \"all\". Without --write the fixed page is printed.",
        after_help = "Examples:\n  accessmate fix page.html --issue missing-alt\n  accessmate fix page.html --issue \"Fix All\" --write"
    )]
    Fix {
        #[arg(help = "HTML file")]
        file: String,
        #[arg(long, help = "Issue label, id, or all")]
        issue: String,
        #[arg(long, help = "Project root for config discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Write changes to the file")]
        write: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Apply a colour-vision filter
    #[command(
        about = "Apply a colour-vision filter",
        long_about = "Remap near-primary text and background colours and filter images for protanopia, deuteranopia or tritanopia."
    )]
    Filter {
        #[arg(help = "HTML file")]
        file: String,
        #[arg(long, help = "protanopia|deuteranopia|tritanopia")]
        mode: String,
        #[arg(long, help = "Project root for config discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Write changes to the file")]
        write: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Stop autoplaying media and player embeds
    #[command(
        about = "Stop autoplaying media",
        long_about = "Remove autoplay from video and audio elements (enabling their controls) and strip autoplay=1 from YouTube and Vimeo embeds."
    )]
    StopAutoplay {
        #[arg(help = "HTML file")]
        file: String,
        #[arg(long, help = "Project root for config discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Write changes to the file")]
        write: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Answer JSON requests for one page over stdin/stdout
    #[command(
        about = "Serve a page to JSON requests",
        long_about = "Read one JSON request per line from stdin, e.g. {\"action\":\"runAccessibilityCheck\"}, and print JSON replies. Autoplaying media is stopped when the page loads. With --write the page is saved at end of input."
    )]
    Serve {
        #[arg(help = "HTML file")]
        file: String,
        #[arg(long, help = "Project root for config discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Save the page when input ends")]
        write: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Leave autoplaying media alone on load")]
        keep_autoplay: bool,
    },
    /// Show or change persisted settings
    #[command(about = "Show or change settings")]
    Settings {
        #[arg(long, help = "Project root (default: current dir)")]
        root: Option<String>,
        #[arg(long, value_parser = ["on", "off"], help = "Persist the auto-fix flag")]
        auto_fix: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan_flags() {
        let cli = Cli::parse_from(["accessmate", "scan", "a.html", "b/*.html", "--no-highlight", "--details"]);
        match cli.cmd {
            Commands::Scan {
                files,
                no_highlight,
                details,
                auto_fix,
                ..
            } => {
                assert_eq!(files, vec!["a.html", "b/*.html"]);
                assert!(no_highlight && details && !auto_fix);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_parse_stop_autoplay_and_serve_flags() {
        let cli = Cli::parse_from(["accessmate", "stop-autoplay", "v.html", "--write"]);
        assert!(matches!(cli.cmd, Commands::StopAutoplay { write: true, .. }));
        let cli = Cli::parse_from(["accessmate", "serve", "v.html", "--keep-autoplay"]);
        assert!(matches!(cli.cmd, Commands::Serve { keep_autoplay: true, .. }));
    }

    #[test]
    fn test_settings_rejects_unknown_value() {
        assert!(Cli::try_parse_from(["accessmate", "settings", "--auto-fix", "maybe"]).is_err());
    }
}
