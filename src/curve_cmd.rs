//! Curve command: project state probabilities from a saved model.

use std::fs::File;
use std::io;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use deterior_markov::{load_model, write_curve_csv};

use crate::cli::CurveArgs;

/// Write the life curve of one initial state as CSV.
pub fn run(args: CurveArgs) -> Result<()> {
    let _cmd = info_span!("curve").entered();
    let model = load_model(&args.model)
        .with_context(|| format!("failed to load model: {}", args.model.display()))?;
    let curve = model
        .simulate_curve(args.state, args.start, args.stop, args.step)
        .context("failed to project life curve")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_curve_csv(&curve, file)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), points = curve.len(), "life curve written");
        }
        None => write_curve_csv(&curve, io::stdout().lock()).context("failed to write curve")?,
    }
    Ok(())
}
