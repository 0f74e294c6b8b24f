//! List command: show which datasets the selection picks.

use anyhow::{Context, Result};
use tellus_metadata::Catalog;
use tracing::info;

use crate::cli::ListArgs;
use crate::config::TellusConfig;

/// Print one line per selected dataset: name, resolution and reader.
pub fn run(args: ListArgs) -> Result<()> {
    let config = TellusConfig::load(&args.config)?;
    let metadata_dir = &config.paths.metadata_dir;
    let catalog = Catalog::from_dir(metadata_dir)
        .with_context(|| format!("failed to load metadata from {}", metadata_dir.display()))?;

    let selected = catalog.select(&config.selection);
    info!(
        n_total = catalog.len(),
        n_selected = selected.len(),
        "catalog loaded"
    );
    for metadata in selected {
        println!(
            "{}\t{}\t{}",
            metadata.get_str("name")?,
            metadata.get_str("time_resolution")?,
            metadata.get_str("reader")?
        );
    }
    Ok(())
}
