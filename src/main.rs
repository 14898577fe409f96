#![forbid(unsafe_code)]

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use simple_index::build_cmd::{self, BuildArgs};
use simple_index::{normalize_name, project_cmd};

#[derive(Parser, Debug)]
#[command(name = "simple-index")]
#[command(about = "Generate a static PEP503 simple package index", long_about = None)]
struct Cli {
    /// Enable verbose logging (or set SIMPLE_INDEX_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Regenerate the top-level index and every project page
    Build {
        /// Path to config file (default: ./simple-index.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Base folder holding one sub-folder per project
        #[arg(long)]
        base: Option<PathBuf>,
        /// Title of the top-level page
        #[arg(long)]
        title: Option<String>,
        /// Skip archives without the normalized project prefix instead of failing
        #[arg(long)]
        skip_mismatched: bool,
        /// Write machine-readable JSON run summary to this file
        #[arg(long)]
        json: Option<PathBuf>,
        /// Projects to index, in order (replaces the configured list)
        projects: Vec<String>,
    },

    /// Regenerate the page of a single project
    Project {
        /// Base folder holding the project folder
        #[arg(long, default_value = ".")]
        base: PathBuf,
        /// Skip archives without the normalized project prefix instead of failing
        #[arg(long)]
        skip_mismatched: bool,
        /// Project (folder) name
        project: String,
    },

    /// Print the PEP503-normalized form of each name
    Normalize {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("SIMPLE_INDEX_LOG").unwrap_or_else(|_| {
        if verbose { "simple_index=debug".to_string() } else { "simple_index=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Build { config, base, title, skip_mismatched, json, projects } => {
            build_cmd::run(BuildArgs { config, base, title, skip_mismatched, projects, json }).map(|_| ())
        }
        Commands::Project { base, skip_mismatched, project } => {
            project_cmd::run(base, project, skip_mismatched).map(|found| println!("{found}"))
        }
        Commands::Normalize { names } => {
            for name in names {
                println!("{}", normalize_name(&name));
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
