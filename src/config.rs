use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level format file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeteriorConfig {
    /// Dataset column and time settings.
    #[serde(default)]
    pub dataset: DatasetToml,

    /// Estimator settings.
    #[serde(default)]
    pub fit: FitToml,
}

impl DeteriorConfig {
    /// Reads the format file at `path`, or returns defaults when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read format file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse format file: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetToml {
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_state_column")]
    pub state_column: String,
    #[serde(default = "default_time_column")]
    pub time_column: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_time_unit")]
    pub time_unit: String,
}

impl Default for DatasetToml {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            state_column: default_state_column(),
            time_column: default_time_column(),
            time_format: default_time_format(),
            time_unit: default_time_unit(),
        }
    }
}

fn default_id_column() -> String {
    "ID".to_string()
}
fn default_state_column() -> String {
    "State".to_string()
}
fn default_time_column() -> String {
    "Time".to_string()
}
fn default_time_format() -> String {
    "%Y-%m-%d".to_string()
}
fn default_time_unit() -> String {
    "1d".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FitToml {
    #[serde(default = "default_initial_guess")]
    pub initial_guess: f64,
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold: f64,
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub deadline_secs: Option<f64>,
}

impl Default for FitToml {
    fn default() -> Self {
        Self {
            initial_guess: default_initial_guess(),
            escalation_threshold: default_escalation_threshold(),
            max_iters: default_max_iters(),
            max_generations: default_max_generations(),
            seed: None,
            deadline_secs: None,
        }
    }
}

fn default_initial_guess() -> f64 {
    0.1
}
fn default_escalation_threshold() -> f64 {
    1.0
}
fn default_max_iters() -> u64 {
    2000
}
fn default_max_generations() -> usize {
    1000
}
