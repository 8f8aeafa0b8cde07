//! Vitrine CLI
//!
//! Asset pipeline and dev server for a static landing page.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use vitrine::Task;

/// Command-line interface for Vitrine.
#[derive(Parser)]
#[command(
    name = "vitrine",
    version,
    about = "Front-end asset pipeline with a live-reload dev server"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "vitrine.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Clean the output and run every task
    Build {
        /// Output directory, relative to the current directory (overrides paths.output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build, watch the sources and serve with live reload
    Dev {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
    /// Run a single task
    Run {
        /// clean, html, images, sprites, styles, scripts or static
        task: Task,
    },
    /// Empty the output directory
    Clean,
    /// Validate configuration and sources
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    vitrine::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output } => {
            vitrine::cmd::build::run(&cli.config, output.as_deref())?;
        }
        Commands::Dev { port, open } => {
            vitrine::cmd::dev::run(&cli.config, port, open).await?;
        }
        Commands::Run { task } => {
            vitrine::cmd::run::run(&cli.config, task)?;
        }
        Commands::Clean => {
            vitrine::cmd::run::run(&cli.config, Task::Clean)?;
        }
        Commands::Check { strict } => {
            vitrine::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}
