//! Pure conversion functions: TOML config structs -> crate API config types.

use std::time::Duration;

use anyhow::{Context, Result};

use deterior_dataset::{ReaderConfig, TimeUnit};
use deterior_fit::{FitConfig, GlobalSearchConfig};

use crate::config::{DatasetToml, FitToml};

/// Builds a [`ReaderConfig`] from the TOML dataset section.
pub fn build_reader_config(dataset: &DatasetToml) -> Result<ReaderConfig> {
    let unit = TimeUnit::parse(&dataset.time_unit).context("invalid [dataset].time_unit")?;
    let cfg = ReaderConfig::default()
        .with_id_column(&dataset.id_column)
        .with_state_column(&dataset.state_column)
        .with_time_column(&dataset.time_column)
        .with_time_format(&dataset.time_format)
        .with_time_unit(unit);
    cfg.validate().context("invalid [dataset].time_format")?;
    Ok(cfg)
}

/// Builds a [`FitConfig`] from the TOML fit section.
///
/// `seed` overrides the seed from the file.
pub fn build_fit_config(fit: &FitToml, seed: Option<u64>) -> Result<FitConfig> {
    let mut cfg = FitConfig::new()
        .with_initial_guess(fit.initial_guess)
        .with_escalation_threshold(fit.escalation_threshold)
        .with_max_iters(fit.max_iters)
        .with_global(GlobalSearchConfig::new().with_max_generations(fit.max_generations));
    if let Some(s) = seed.or(fit.seed) {
        cfg = cfg.with_seed(s);
    }
    if let Some(secs) = fit.deadline_secs {
        let deadline = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("invalid [fit].deadline_secs: {secs}"))?;
        cfg = cfg.with_deadline(deadline);
    }
    cfg.validate().context("invalid [fit] section")?;
    Ok(cfg)
}
