use tracing_subscriber::EnvFilter;

/// Workspace crate targets that receive log output.
const CRATE_TARGETS: &[&str] = &[
    "deterior",
    "deterior_dataset",
    "deterior_evaluate",
    "deterior_fit",
    "deterior_markov",
];

/// Initialize tracing based on CLI verbosity level.
///
/// Mapping:
/// - 0 (none)  -> warn: skipped rows, escalation to global search
/// - 1 (-v)    -> info: dataset summary, fit and fold results
/// - 2 (-vv)   -> debug: optimiser progress, per-fold scores, file I/O
/// - 3+ (-vvv) -> trace
///
/// `RUST_LOG` overrides the flag when set. Logs go to stderr so CSV
/// written to stdout stays clean.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the `target=level` directive list for a `-v` count.
fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_level() {
        assert!(default_filter(0).starts_with("deterior=warn,"));
        assert!(default_filter(1).contains("deterior_fit=info"));
        assert!(default_filter(2).ends_with("deterior_markov=debug"));
        assert!(default_filter(7).contains("deterior_dataset=trace"));
    }

    #[test]
    fn every_target_is_a_valid_directive() {
        let filter = default_filter(1);
        assert_eq!(filter.split(',').count(), CRATE_TARGETS.len());
        assert!(EnvFilter::try_new(&filter).is_ok());
    }
}
