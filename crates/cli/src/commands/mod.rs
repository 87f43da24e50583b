//! Subcommand implementations.
//!
//! Results go to stdout; diagnostics go through `tracing` on stderr.

use std::io::{self, Write};

use jblinx_storefront::{Catalog, FileStore, StorefrontConfig};

pub mod cart;
pub mod catalog;
pub mod contact;
pub mod prefs;

/// Open the file-backed store named by the configuration.
fn open_store(config: &StorefrontConfig) -> Result<FileStore, Box<dyn std::error::Error>> {
    tracing::debug!(path = %config.store_path.display(), "Opening store");
    Ok(FileStore::open(&config.store_path)?)
}

/// Load the configured catalog, or the built-in one.
fn load_catalog(config: &StorefrontConfig) -> Result<Catalog, Box<dyn std::error::Error>> {
    match &config.catalog_path {
        Some(path) => Ok(Catalog::load(path)?),
        None => Ok(Catalog::builtin()),
    }
}

/// Write lines to stdout.
fn emit<I, S>(lines: I) -> io::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    Ok(())
}
