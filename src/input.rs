//! Dataset loading shared by the subcommands.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use deterior_dataset::{Aggregation, ReaderConfig, read_csv, read_xlsx};

/// Reads and aggregates the inspection dataset at `path`.
pub fn load_dataset(path: &Path, config: &ReaderConfig) -> Result<Aggregation> {
    let format = check_dataset_path(path)?;
    info!(path = %path.display(), ?format, "reading inspection dataset");
    let agg = match format {
        DatasetFormat::Csv => read_csv(path, config),
        DatasetFormat::Xlsx => read_xlsx(path, config),
    }
    .with_context(|| format!("failed to load dataset: {}", path.display()))?;
    if !agg.skipped.is_empty() {
        warn!(
            skipped = agg.skipped.len(),
            "rows with a blank state or timestamp were ignored"
        );
    }
    info!(
        n_state = agg.n_state(),
        inspections = agg.n_inspections,
        transitions = agg.transitions.len(),
        "dataset loaded"
    );
    Ok(agg)
}

/// Dataset file kinds with a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Xlsx,
}

/// Picks the reader from the file extension, rejecting unknown ones.
pub fn check_dataset_path(path: &Path) -> Result<DatasetFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(DatasetFormat::Csv),
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Ok(DatasetFormat::Xlsx),
        Some(ext) => bail!("unsupported dataset format .{ext}: {}", path.display()),
        None => bail!("dataset has no file extension: {}", path.display()),
    }
}
