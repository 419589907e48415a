//! Catalog seed resolution for daemon startup.
//!
//! The catalog is seeded exactly once, from the first of:
//! 1. an explicit `--catalog <path>` flag,
//! 2. the `ROSTERD_CATALOG` environment variable,
//! 3. the built-in default seed.
//!
//! Seed files are TOML (`[[activity]]` tables). A bad seed is a startup
//! failure; the daemon refuses to run with an invalid catalog.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use roster_core::{default_seed, Catalog, SeedFile};

/// Environment variable naming a catalog seed file.
pub const CATALOG_ENV: &str = "ROSTERD_CATALOG";

/// Resolves the seed source and builds the catalog.
///
/// # Errors
///
/// Fails if the seed file cannot be read or parsed, or if the seed
/// itself is invalid (empty/duplicate names, zero capacity).
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let path: Option<PathBuf> = path
        .map(PathBuf::from)
        .or_else(|| env::var_os(CATALOG_ENV).map(PathBuf::from));

    let seed = match path {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read catalog seed {}", path.display()))?;
            let file: SeedFile = toml::from_str(&raw)
                .with_context(|| format!("failed to parse catalog seed {}", path.display()))?;

            info!(
                path = %path.display(),
                activities = file.activity.len(),
                "Loaded catalog seed file"
            );
            file.activity
        }
        None => {
            debug!("Using built-in catalog seed");
            default_seed()
        }
    };

    let catalog = Catalog::from_seed(seed).context("invalid catalog seed")?;

    info!(activities = catalog.len(), "Catalog initialized");
    Ok(catalog)
}
