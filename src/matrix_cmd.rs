//! Matrix command: export a saved model's transition matrix.

use std::fs::File;
use std::io;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use deterior_markov::{load_model, write_matrix_csv};

use crate::cli::MatrixArgs;

/// Write the transition matrix as CSV.
pub fn run(args: MatrixArgs) -> Result<()> {
    let _cmd = info_span!("matrix").entered();
    let model = load_model(&args.model)
        .with_context(|| format!("failed to load model: {}", args.model.display()))?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_matrix_csv(&model, file)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), n_state = model.n_state(), "matrix written");
        }
        None => write_matrix_csv(&model, io::stdout().lock()).context("failed to write matrix")?,
    }
    Ok(())
}
