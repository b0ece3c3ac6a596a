//! Shared CLI definitions for sentidash.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, ValueEnum};

/// Verbosity of the log file written while the dashboard runs.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    /// Only failures that leave a view without data
    Error,
    /// Failed and discarded fetches
    Warn,
    /// Refresh lifecycle (default)
    Info,
    /// Every request, response and stale discard
    Debug,
    /// Everything, including envelope payload sizes
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Parse a level name as written in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

/// Command-line arguments for sentidash
#[derive(Clone, Parser, Debug, Default)]
#[command(
    name = "sentidash",
    version,
    about = "Subreddit sentiment dashboard in the terminal",
    long_about = include_str!("../long_about.txt")
)]
pub struct Args {
    /// Base URL of the data gateway (overrides config [gateway] base_url). Example: http://127.0.0.1:5000
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Subreddit to show at startup instead of "all"
    #[arg(long = "filter", value_name = "NAME")]
    pub filter: Option<String>,

    /// Per-request timeout in milliseconds (overrides config [gateway] timeout_ms)
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Refresh the current filter every N seconds (overrides config [performance] auto_refresh_secs). Use 0 to disable.
    #[arg(long = "auto-refresh", value_name = "SECS")]
    pub auto_refresh_secs: Option<u64>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Write logs to this file instead of the default in the cache directory
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<std::path::PathBuf>,

    /// Log verbosity (overrides config [logging] level; RUST_LOG still wins)
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevel>,

    /// Generate default configuration file at ~/.config/sentidash/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render command-line options as markdown.
///
/// Used by the gen_docs binary; output is written to stdout and then
/// to `docs/command-line-options.md` by the docs build.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    let usage = cmd.render_usage();
    out.push_str(&usage.to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let option_str = if arg.is_positional() {
            let placeholder: String = arg
                .get_value_names()
                .map(|names| {
                    names
                        .iter()
                        .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default();
            if arg.is_required_set() {
                placeholder
            } else {
                format!("[{placeholder}]")
            }
        } else {
            let mut parts = Vec::new();
            if let Some(s) = arg.get_short() {
                parts.push(format!("-{s}"));
            }
            if let Some(l) = arg.get_long() {
                parts.push(format!("--{l}"));
            }
            let op = parts.join(", ");
            let takes_val = arg.get_action().takes_values();
            let placeholder: String = if takes_val {
                arg.get_value_names()
                    .map(|names| {
                        names
                            .iter()
                            .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .unwrap_or_default()
            } else {
                String::new()
            };
            if placeholder.is_empty() {
                op
            } else {
                format!("{op} {placeholder}")
            }
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_name() {
        assert_eq!(LogLevel::from_name("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_name(" WARNING "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_name("Trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_name("verbose"), None);
    }

    #[test]
    fn test_log_level_directive_round_trips_name() {
        for level in LogLevel::value_variants() {
            assert_eq!(LogLevel::from_name(level.as_directive()), Some(*level));
        }
    }

    #[test]
    fn test_parse_gateway_args() {
        let args = Args::try_parse_from([
            "sentidash",
            "--url",
            "http://localhost:8080",
            "--filter",
            "worldnews",
            "--timeout-ms",
            "2500",
        ])
        .unwrap();
        assert_eq!(args.url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(args.filter.as_deref(), Some("worldnews"));
        assert_eq!(args.timeout_ms, Some(2500));
        assert!(!args.debug);
    }

    #[test]
    fn test_force_requires_generate_config() {
        assert!(Args::try_parse_from(["sentidash", "--force"]).is_err());
        let args = Args::try_parse_from(["sentidash", "--generate-config", "--force"]).unwrap();
        assert!(args.generate_config && args.force);
    }

    #[test]
    fn test_options_markdown_lists_flags() {
        let md = render_options_markdown();
        assert!(md.contains("`--url <URL>`"));
        assert!(md.contains("`--generate-config`"));
        assert!(!md.contains("--help"));
    }
}
