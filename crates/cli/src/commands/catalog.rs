//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! detach-cli catalog dump -o catalog.json
//! detach-cli catalog check catalog.json
//! detach-cli catalog show catalog.json
//! ```
//!
//! # Environment Variables
//!
//! - `DETACH_CATALOG_PATH` - Catalog shown by `catalog show` when no path is given

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use detach_core::{Catalog, CatalogError};
use thiserror::Error;

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// The catalog failed to load or validate.
    #[error("{path}: {source}")]
    Catalog {
        path: String,
        #[source]
        source: CatalogError,
    },

    /// Serializing the catalog failed.
    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the output file failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn load(path: &Path) -> Result<Catalog, CatalogCommandError> {
    Catalog::load(path).map_err(|source| CatalogCommandError::Catalog {
        path: path.display().to_string(),
        source,
    })
}

/// Export the built-in catalog as pretty JSON.
///
/// # Errors
///
/// Returns an error if the output file can't be written.
pub fn dump(output: Option<&Path>) -> Result<(), CatalogCommandError> {
    let json = serde_json::to_string_pretty(&Catalog::detach())?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n")).map_err(|source| {
                CatalogCommandError::Write {
                    path: path.display().to_string(),
                    source,
                }
            })?;
            tracing::info!("Wrote built-in catalog to {}", path.display());
        }
        None => {
            #[allow(clippy::print_stdout)]
            {
                println!("{json}");
            }
        }
    }
    Ok(())
}

/// Validate a catalog file.
///
/// # Errors
///
/// Returns an error if the file is unreadable, malformed or invalid.
pub fn check(path: &Path) -> Result<(), CatalogCommandError> {
    let catalog = load(path)?;
    tracing::info!(
        garments = catalog.garments.len(),
        designs = catalog.designs.len(),
        "{} is valid",
        path.display()
    );
    Ok(())
}

/// Print a catalog summary.
///
/// # Errors
///
/// Returns an error if the chosen catalog file fails to load.
pub fn show(path: Option<PathBuf>) -> Result<(), CatalogCommandError> {
    dotenvy::dotenv().ok();

    let path = path.or_else(|| std::env::var_os("DETACH_CATALOG_PATH").map(PathBuf::from));
    let catalog = match &path {
        Some(path) => load(path)?,
        None => Catalog::detach(),
    };

    #[allow(clippy::print_stdout)]
    {
        print!("{}", summary(&catalog));
    }
    Ok(())
}

/// Human-readable listing of garments and designs.
fn summary(catalog: &Catalog) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Garments ({})", catalog.garments.len());
    for garment in &catalog.garments {
        let _ = writeln!(
            out,
            "  #{:<3} {:<12} {:>6}  sizes: {}",
            garment.id,
            garment.display_name,
            garment.unit_price.to_string(),
            garment.allowed_sizes.join(", ")
        );
    }

    let _ = writeln!(out, "Designs ({})", catalog.designs.len());
    for design in &catalog.designs {
        let _ = writeln!(
            out,
            "  #{:<3} {:<12} {:>6}  {}",
            design.id,
            design.display_name().unwrap_or("-"),
            design.unit_price.to_string(),
            design.image_ref
        );
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_everything() {
        let text = summary(&Catalog::detach());
        assert!(text.starts_with("Garments (5)\n"));
        assert!(text.contains("Designs (24)\n"));
        assert!(text.contains("Army Green"));
        assert!(text.contains("Eclipse"));
        assert!(text.contains("/designs/image_24.webp"));
    }

    #[test]
    fn test_dump_then_check() {
        let path = std::env::temp_dir().join(format!("detach-catalog-{}.json", std::process::id()));
        dump(Some(&path)).unwrap();
        check(&path).unwrap();
        assert_eq!(load(&path).unwrap(), Catalog::detach());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_check_reports_path() {
        let err = check(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/catalog.json:"));
    }
}
