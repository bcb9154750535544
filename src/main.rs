//! CLI entry point for sitegen

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitegen::config::ConverterKind;

#[derive(Parser)]
#[command(name = "sitegen")]
#[command(version)]
#[command(about = "Build a static site from source assets and markdown posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the output directory
    #[command(alias = "b")]
    Build {
        /// Override the configured markdown converter
        #[arg(long, value_enum)]
        converter: Option<ConverterKind>,
    },

    /// Delete the output directory
    Clean,

    /// List the posts that would be generated
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "sitegen=debug,info"
    } else {
        "sitegen=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let mut site = sitegen::Site::new(&base_dir)?;

    match cli.command.unwrap_or(Commands::Build { converter: None }) {
        Commands::Build { converter } => {
            site.config.converter = site.config.converter.clone().with_override(converter);
            site.build(&mut std::io::stdout().lock())?;
            println!("Generated successfully!");
        }

        Commands::Clean => {
            tracing::info!("Cleaning output folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            sitegen::commands::list::run(&site, &mut std::io::stdout().lock())?;
        }
    }

    Ok(())
}
