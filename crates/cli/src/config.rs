//! `docdelta config`: show or validate engine configuration.

use std::path::PathBuf;

use clap::Subcommand;

use crate::util::load_config;
use crate::CliError;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    #[command(after_help = "\
Examples:
  docdelta config show
  docdelta config show --config strict.toml > effective.toml")]
    Show {
        /// Config file to merge over the defaults
        #[arg(long, short = 'c', env = "DOCDELTA_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Check a config file without running a comparison
    #[command(after_help = "\
Examples:
  docdelta config validate strict.toml")]
    Validate {
        /// Path to the config file
        config: PathBuf,
    },
}

pub fn cmd_config(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Show { config } => {
            let config = load_config(config.as_deref())?;
            let text = config
                .to_toml()
                .map_err(|e| CliError::output(e.to_string()))?;
            print!("{text}");
            Ok(())
        }
        ConfigCommands::Validate { config: path } => {
            load_config(Some(&path))
                .map_err(|e| e.with_hint("see `docdelta config show` for every key and its default"))?;
            eprintln!("{}: ok", path.display());
            Ok(())
        }
    }
}
