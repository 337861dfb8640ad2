//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};
use clap_complete::Shell;

/// Interactive feature-model configurator
#[derive(Parser, Debug)]
#[command(name = "fmconf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging. Repeat for more verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Generate shell completions
    #[arg(long = "generate", value_enum)]
    pub generator: Option<Shell>,

    /// Print author and version information
    #[arg(long)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a model and configure it interactively
    Session {
        /// Model description file (.xml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the feature tree of a model
    Tree {
        /// Model description file (.xml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the propositional logic rules derived from a model
    Rules {
        /// Model description file (.xml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the minimum working products of a model
    Mwps {
        /// Model description file (.xml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Validate a feature selection without entering a session
    Validate {
        /// Model description file (.xml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Feature to select; repeat for multiple features
        #[arg(short = 'f', long = "feature", required = true)]
        features: Vec<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print the global config file path
    Path,
    /// Edit the global config file
    Edit,
}
