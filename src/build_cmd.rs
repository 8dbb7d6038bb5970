//! Build command: fit a monotone model and save it.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, info_span};

use deterior_fit::fit_monotone;
use deterior_markov::{SaveInfo, save_model};

use crate::cli::BuildArgs;
use crate::config::DeteriorConfig;
use crate::convert;
use crate::input;

/// Fit a model to the dataset and write it as JSON.
pub fn run(args: BuildArgs, config: &DeteriorConfig) -> Result<()> {
    let _cmd = info_span!("build").entered();
    let reader_cfg = convert::build_reader_config(&config.dataset)?;
    let fit_cfg = convert::build_fit_config(&config.fit, args.seed)?;

    let agg = input::load_dataset(&args.dataset, &reader_cfg)?;
    for (i, label) in agg.state_map.iter() {
        println!("S{i}: {label}");
    }

    let histogram = agg.transitions.histogram();
    let outcome = fit_monotone(&histogram, &fit_cfg).context("failed to fit model")?;
    let result = &outcome.result;
    let Some(model) = outcome.model else {
        bail!("fit did not converge ({}): {}", result.method, result.message);
    };

    println!("Method: {}", result.method);
    println!("Iterations: {}", result.iterations);
    println!("Loss: {}", result.loss);
    println!("Parameters: {:?}", result.params);

    let info = SaveInfo::new(
        format!("Model dumped by deterior v{}", env!("CARGO_PKG_VERSION")),
        Utc::now(),
    );
    save_model(&args.model, &model, info)
        .with_context(|| format!("failed to save model: {}", args.model.display()))?;
    info!(path = %args.model.display(), "model saved");
    Ok(())
}
