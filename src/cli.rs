use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Hydrodynamic radius of proteins with the minimum dissipation approximation (MDA).",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Settings file (defaults to ~/.mda-diffusion.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Never emit ANSI colors
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute hydrodynamic radii for one or more proteins and write the results.
    Compute(ComputeArgs),
    /// Print configuration or result documents with highlighting.
    Show(ShowArgs),
    /// Browse configuration and results interactively.
    View(ViewArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Global config (densities, sizes, etc)
    #[arg(short, long, required = true, value_name = "c.yaml")]
    pub config: PathBuf,

    /// Config documents for each protein (sequences, names)
    #[arg(short, long, required = true, num_args = 1.., value_name = "p.yaml")]
    pub proteins: Vec<PathBuf>,

    /// Directory for output; each result is named after its protein file
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,
}

/// Arguments for the `show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Documents to print
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Arguments for the `view` subcommand.
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Global config shown in the first panel
    #[arg(short, long, value_name = "c.yaml")]
    pub config: Option<PathBuf>,

    /// Protein config shown in the second panel
    #[arg(short, long, value_name = "p.yaml")]
    pub protein: Option<PathBuf>,

    /// File suggested when saving results
    #[arg(short, long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}
