// docdelta CLI - compare versions of a pricing document

mod compare;
mod config;
mod exit_codes;
mod inspect;
mod report;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_UNREADABLE, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "docdelta")]
#[command(about = "Semantic diff for pricing documents (.docx)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two versions of a document (exit 1 with --exit-code when they differ)
    #[command(after_help = "\
Price changes are matched by (item number, column) so tables that moved \
between versions do not produce spurious changes. Pricing tables with an \
unexpected column layout are listed as suppressed and never compared.

Examples:
  docdelta compare guide-2024.docx guide-2025.docx
  docdelta compare old.docx new.docx --json | jq '.summary'
  docdelta compare old.docx new.docx --output diff.json
  docdelta compare old.docx new.docx --limit 50
  docdelta compare old.docx new.docx --exit-code --config strict.toml")]
    Compare {
        /// Older version of the document
        old: PathBuf,

        /// Newer version of the document
        new: PathBuf,

        /// Engine config (TOML); defaults apply when omitted
        #[arg(long, short = 'c', env = "DOCDELTA_CONFIG")]
        config: Option<PathBuf>,

        /// Print the full comparison result as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Write the JSON result to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit with code 1 when the documents differ
        #[arg(long)]
        exit_code: bool,

        /// Price changes listed in the human summary
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show how a document's tables and text were classified
    #[command(after_help = "\
Examples:
  docdelta inspect guide.docx
  docdelta inspect guide.docx --json")]
    Inspect {
        /// Document to inspect
        file: PathBuf,

        /// Engine config (TOML); defaults apply when omitted
        #[arg(long, short = 'c', env = "DOCDELTA_CONFIG")]
        config: Option<PathBuf>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or validate engine configuration
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  docdelta-core ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  docdelta-core ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

/// Logs go to stderr so stdout stays clean for JSON.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "docdelta=warn",
        1 => "docdelta=info",
        _ => "docdelta=debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compare {
            old,
            new,
            config,
            json,
            output,
            exit_code,
            limit,
        } => compare::cmd_compare(compare::CompareArgs {
            old,
            new,
            config,
            json,
            output,
            exit_code,
            limit,
        }),
        Commands::Inspect { file, config, json } => inspect::cmd_inspect(file, config, json),
        Commands::Config(cmd) => config::cmd_config(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Silent failure carrying only an exit code.
    pub fn exit(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Create error from a loader failure, with a hint where one helps.
    pub fn unreadable(path: &std::path::Path, err: docdelta_io::UnreadableDocument) -> Self {
        let hint = exit_codes::unreadable_hint(&err).map(str::to_string);
        Self {
            code: EXIT_UNREADABLE,
            message: format!("{}: {}", path.display(), err),
            hint,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
