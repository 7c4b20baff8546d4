//! The `pyxref` command-line surface: one subcommand, `index`, using the
//! same `clap` derive style as every other CLI front end in this workspace.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pyxref", version, about = "Cross-reference indexer for Python source trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index a project tree and write a cross-reference document stream.
    Index(IndexArgs),
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Root of the Python project to index.
    pub project_root: PathBuf,

    /// Name of the package being indexed. Defaults to `pyxref.toml`'s
    /// `project_name`, then the project root's directory name.
    #[arg(long)]
    pub project_name: Option<String>,

    /// Version of the package being indexed. Defaults to `pyxref.toml`'s
    /// `project_version`, then the short hash of the current VCS revision,
    /// then the literal `0.0.0`.
    #[arg(long)]
    pub project_version: Option<String>,

    /// Where to write the document stream. Defaults to stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// The workspace root this project lives under, if different from
    /// `project_root` (e.g. a monorepo package). Defaults to `project_root`.
    #[arg(long)]
    pub workspace_root: Option<PathBuf>,

    /// A site-packages style directory to resolve third-party imports
    /// against. Without one, only the project's own files and the builtins
    /// module resolve; every other import resolves to no package.
    #[arg(long)]
    pub site_packages: Option<PathBuf>,

    /// Root of the Python standard library installation the project runs
    /// against, for classifying stdlib imports. Without one, only the
    /// literal `builtins` module resolves to the stdlib package.
    #[arg(long)]
    pub stdlib_root: Option<PathBuf>,

    /// Python version to tag the stdlib package with.
    #[arg(long, default_value = "3")]
    pub python_version: String,

    /// Increase logging verbosity. Repeatable.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all but warning and error logging.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}
