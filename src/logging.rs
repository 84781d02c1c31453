// src/logging.rs
// =============================================================================
// Logging init: structured `tracing` output on stderr.
//
// stdout is kept for command output (tables, JSON), so logs never mix
// with what a script might be parsing.
// =============================================================================

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,page_warmer=info";
const VERBOSE_FILTER: &str = "info,page_warmer=debug";

/// Installs the global subscriber. `RUST_LOG` wins over `verbose` when set.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // try_init: a second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_logging(false);
        init_logging(true);
        tracing::debug!("still logging");
    }
}
