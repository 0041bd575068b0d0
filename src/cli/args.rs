//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::ColumnType;

/// Column tree editor: fixed system columns plus user-defined custom, remark and fill columns
#[derive(Parser, Debug)]
#[command(name = "coltree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Use predictable ids (col-1, col-2, ...) instead of random ones
    #[arg(long, global = true)]
    pub sequential_ids: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit columns interactively (default)
    Shell,

    /// Replay session commands from a file
    Run {
        /// Script with one session command per line
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Continue after a failing line
        #[arg(short, long)]
        keep_going: bool,
    },

    /// Print the built-in columns
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ShowFormat::Table)]
        format: ShowFormat,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}

/// Rendering of the column forest.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// Indented table with type and actions
    Table,
    /// Tree drawing
    Tree,
    /// TOML document
    Toml,
}

/// Column types a user can choose.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTypeArg {
    /// Custom logic
    Customize,
    /// Remark column
    Remark,
    /// User-filled column
    UserFill,
}

impl From<ColumnTypeArg> for ColumnType {
    fn from(arg: ColumnTypeArg) -> Self {
        match arg {
            ColumnTypeArg::Customize => ColumnType::Customize,
            ColumnTypeArg::Remark => ColumnType::Remark,
            ColumnTypeArg::UserFill => ColumnType::UserFill,
        }
    }
}
