//! mda-diffusion - hydrodynamic radius front-end
//!
//! Loads protein and physical-parameter documents, hands the computation to
//! an external backend, and shows highlighted configuration and results.

mod backend;
mod cli;
mod config;
mod display;
mod documents;
mod error;
mod logging;
mod pipeline;
mod syntax;
mod terminal;
mod viewer;

use std::io::{self, IsTerminal};
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};

use backend::ProcessBackend;
use cli::{Cli, Commands};
use config::Settings;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // The viewer owns the screen, so it only logs to a file
    let console = !matches!(cli.command, Commands::View(_));
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref(), console)?;
    debug!(?cli, "parsed arguments");

    let settings = Settings::load(cli.settings.as_deref())?;
    let highlighter = syntax::document_highlighter(&settings.theme)?;
    debug!(rules = highlighter.rules().len(), "highlighter ready");
    let color = !cli.no_color && io::stdout().is_terminal();

    match cli.command {
        Commands::Compute(args) => {
            let backend = ProcessBackend::from_command(&settings.backend.command)?;
            let batch = pipeline::Batch {
                global_path: &args.config,
                protein_paths: &args.proteins,
                output_dir: &args.output,
                sampling: settings.sampling,
            };
            let mut stdout = io::stdout().lock();
            let written = pipeline::run_batch(&batch, &backend, &highlighter, &mut stdout, color)?;
            info!(count = written.len(), "results written");
        }
        Commands::Show(args) => {
            let mut stdout = io::stdout().lock();
            for (i, path) in args.files.iter().enumerate() {
                if i > 0 {
                    display::print_highlighted(&mut stdout, "---", &highlighter, color)?;
                }
                let text = serde_yaml::to_string(&documents::load_raw(path)?)?;
                display::print_highlighted(&mut stdout, &text, &highlighter, color)?;
            }
        }
        Commands::View(args) => {
            let backend = ProcessBackend::from_command(&settings.backend.command)?;
            let paths = viewer::ViewerPaths {
                global: args.config,
                protein: args.protein,
                save: args.save,
            };
            let session = viewer::Session::new(Arc::new(highlighter), &backend, settings.sampling, paths);
            viewer::run(session)?;
        }
    }

    Ok(())
}
