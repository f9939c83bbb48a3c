//! `docdelta compare`: semantic diff of two document versions.

use std::path::PathBuf;

use crate::exit_codes::EXIT_DIFFERENCES;
use crate::report::render_comparison;
use crate::util::{load_config, load_document, to_json, write_json_file};
use crate::CliError;

pub struct CompareArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub exit_code: bool,
    pub limit: usize,
}

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let old = load_document(&args.old, &config)?;
    let new = load_document(&args.new, &config)?;

    let result = docdelta_core::compare_with(&old, &new, &config);

    if let Some(ref path) = args.output {
        write_json_file(&result, path)?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{}", to_json(&result)?);
    } else if args.output.is_none() {
        print!("{}", render_comparison(&result, args.limit));
    }

    if args.exit_code && result.summary.has_changes() {
        return Err(CliError::exit(EXIT_DIFFERENCES));
    }
    Ok(())
}
