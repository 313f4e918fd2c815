//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::Mode;

/// Build hierarchical probability distributions and keep them consistent
#[derive(Parser, Debug)]
#[command(name = "probtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Additional config file, applied after the global one
    #[arg(long, global = true, value_hint = ValueHint::FilePath, env = "PROBTREE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Absolute,
    Relative,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Absolute => Mode::Absolute,
            ModeArg::Relative => Mode::Relative,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new distribution document
    New {
        /// Document file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Representation mode (default: from settings)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the tree with warnings for unnormalized nodes
    Show {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Also show children of collapsed nodes
        #[arg(short, long)]
        all: bool,
    },

    /// List nodes whose children do not sum to their target
    Check {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Add a belief under a parent node
    Add {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Parent node id (default: root)
        #[arg(default_value = "root")]
        parent: String,
        /// Name of the new belief
        #[arg(short, long)]
        name: Option<String>,
        /// Probability of the new belief
        #[arg(short, long)]
        probability: Option<f64>,
    },

    /// Rename, reweight, lock or unlock a node
    Set {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        probability: Option<f64>,
        /// Keep this value fixed during normalize
        #[arg(long, conflicts_with = "unlock")]
        lock: bool,
        /// Allow normalize to change this value again
        #[arg(long)]
        unlock: bool,
    },

    /// Remove a node and its subtree
    Remove {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
    },

    /// Expand or collapse a node
    Toggle {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
    },

    /// Rescale children so they sum to their target, recursively
    Normalize {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id (default: root)
        #[arg(default_value = "root")]
        id: String,
    },

    /// Convert all probabilities to another representation
    Mode {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Order children by probability, highest first
    Sort {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Write the rounded interchange document
    Export {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Validate an interchange document and replace the working document with it
    Import {
        /// Interchange document to read
        #[arg(value_hint = ValueHint::FilePath)]
        source: PathBuf,
        /// Working document to replace
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Save the document to the distribution store
    Save {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Name of the saved distribution
        name: String,
    },

    /// List saved distributions
    List,

    /// Load a saved distribution into a working document
    Load {
        /// Saved distribution id
        id: String,
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print a share link for a saved distribution
    Share {
        /// Saved distribution id
        id: String,
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
    /// Show effective settings
    Show,
    /// Show the global config file location
    Path,
}
