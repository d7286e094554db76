//! Detach CLI - catalog inspection and validation.
//!
//! # Usage
//!
//! ```bash
//! # Write the built-in catalog as JSON, ready for editing
//! detach-cli catalog dump -o catalog.json
//!
//! # Validate a catalog file before pointing DETACH_CATALOG_PATH at it
//! detach-cli catalog check catalog.json
//!
//! # List garments and designs (built-in catalog unless a path is given)
//! detach-cli catalog show
//! ```
//!
//! # Commands
//!
//! - `catalog dump` - Export the built-in catalog
//! - `catalog check` - Validate a catalog file
//! - `catalog show` - Print a catalog summary

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "detach-cli")]
#[command(author, version, about = "Detach CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and validate product catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Write the built-in catalog as JSON
    Dump {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a catalog file
    Check {
        /// Path to the catalog JSON file
        path: PathBuf,
    },
    /// Print garments and designs
    Show {
        /// Catalog file to show (defaults to `DETACH_CATALOG_PATH`, then the
        /// built-in catalog)
        path: Option<PathBuf>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::catalog::CatalogCommandError> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Dump { output } => commands::catalog::dump(output.as_deref()),
            CatalogAction::Check { path } => commands::catalog::check(&path),
            CatalogAction::Show { path } => commands::catalog::show(path),
        },
    }
}
