use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SQL User Provisioner - Generate account DDL and directory search queries
#[derive(Parser, Debug)]
#[command(name = "sql-user-provisioner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Case-sensitivity notation (overrides config and environment)
    #[arg(long, global = true)]
    pub case_sensitivity: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text", global = true)]
    pub output_format: Format,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a create statement from desired attributes
    Create {
        /// Path to desired attributes JSON (use - for stdin)
        #[arg(short, long)]
        input: PathBuf
    },

    /// Generate an alter statement from desired attributes and the stored record
    Alter {
        /// Path to desired attributes JSON (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the existing account record JSON
        #[arg(short, long)]
        existing: PathBuf
    },

    /// Generate a drop statement
    Drop {
        /// Account name
        #[arg(short, long)]
        user: String,

        /// Drop owned objects too
        #[arg(long)]
        cascade: bool
    },

    /// Reconcile granted roles or privileges with a desired set
    Reconcile {
        /// Account name
        #[arg(short, long)]
        user: String,

        /// Token category being reconciled
        #[arg(short, long, value_enum)]
        category: GrantKind,

        /// Currently granted tokens
        #[arg(long, value_delimiter = ',')]
        current: Vec<String>,

        /// Desired tokens
        #[arg(long, value_delimiter = ',')]
        desired: Vec<String>
    },

    /// Translate a filter into a search query
    Search {
        /// Path to filter JSON (use - for stdin); omit to list every account
        #[arg(short, long)]
        query: Option<PathBuf>,

        /// Attributes to return
        #[arg(short, long, value_delimiter = ',')]
        attributes: Vec<String>
    },

    /// Generate statements for a JSON array of create/alter requests
    Batch {
        /// Path to requests JSON (use - for stdin)
        #[arg(short, long)]
        input: PathBuf
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GrantKind {
    Role,
    Privilege
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
