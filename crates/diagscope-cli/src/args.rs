//! Command-line argument definitions for the Diagscope CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects between rendering one view,
//! comparing two views and running the multi-release pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use diagscope::view::ViewKind;

/// Command-line arguments for the Diagscope tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one view of a definition dump to stdout
    View(ViewArgs),

    /// Compare two view files and print the lines added and removed
    Diff(DiffArgs),

    /// Render every configured release and diff adjacent releases
    Run(RunArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct ViewArgs {
    /// Path to the `llvm-tblgen -dump-json` output
    pub input: PathBuf,

    /// List every diagnostic in any group once
    #[arg(long, conflicts_with_all = ["top_level", "text"])]
    pub unique: bool,

    /// List only groups no other group nests
    #[arg(long)]
    pub top_level: bool,

    /// With the top-level view, list each diagnostic's message
    #[arg(long)]
    pub text: bool,

    /// With the top-level view, list each group's closure
    #[arg(long)]
    pub closures: bool,

    /// Label groups by their `-W` switch instead of their record name
    #[arg(long)]
    pub switch_names: bool,

    /// Mark top-level groups that are enabled by default
    #[arg(long)]
    pub annotate: bool,

    /// Open the top-level view with the tree of groups enabled by default
    #[arg(long)]
    pub default_section: bool,
}

impl ViewArgs {
    /// Returns the view selected by the flags.
    ///
    /// `--text` implies the top-level view, which is the only view the
    /// message text is defined for.
    pub fn kind(&self) -> ViewKind {
        if self.unique {
            ViewKind::Unique
        } else if self.text {
            ViewKind::TopLevelText
        } else if self.top_level {
            ViewKind::TopLevel
        } else {
            ViewKind::Full
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct DiffArgs {
    /// View file of the older release
    pub old: PathBuf,

    /// View file of the newer release
    pub new: PathBuf,
}

#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Comma-separated release identifiers, oldest first
    #[arg(long, value_delimiter = ',')]
    pub versions: Option<Vec<String>>,

    /// Directory holding `<prefix>-<version>.json` dumps
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving view and diff files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// File name prefix shared by dumps, views and diffs
    #[arg(long)]
    pub prefix: Option<String>,
}
