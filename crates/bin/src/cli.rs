//! CLI argument definitions for the electrum-store binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Reconciliation strategy used to load each input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Objects become nodes, scalars become properties, arrays become indexed children
    Apply,
    /// Same as apply
    Merge,
    /// Offset-indexed collection; empty input removes the target subtree
    Collection,
    /// Offset-indexed change set; elements without a value are deleted
    Changes,
}

/// electrum-store state tree inspector
#[derive(Parser, Debug)]
#[command(name = "electrum-store")]
#[command(about = "Load JSON documents into an electrum-store state tree and inspect the result")]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(
        short,
        long,
        value_enum,
        default_value = "human",
        env = "ELECTRUM_STORE_FORMAT",
        global = true
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile JSON files into a fresh store and print every node
    Apply(ApplyArgs),
    /// Load JSON files and print the child keys of one node
    Keys(KeysArgs),
}

/// Where the input comes from and where it lands
#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// Label of the store that is created
    #[arg(long, default_value = "cli", env = "ELECTRUM_STORE_ID")]
    pub store_id: String,

    /// Path identifier the data is reconciled at (empty for the root)
    #[arg(long, default_value = "")]
    pub at: String,

    /// JSON files, applied in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the apply command
#[derive(clap::Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Reconciliation strategy
    #[arg(short, long, value_enum, default_value = "apply")]
    pub mode: Mode,

    /// Property name that receives scalar values in collection and changes modes
    #[arg(long, default_value = "", env = "ELECTRUM_STORE_DEFAULT_KEY")]
    pub default_key: String,
}

/// Arguments for the keys command
#[derive(clap::Args, Debug)]
pub struct KeysArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}
