// ============================================================
// Tracing Setup
// ============================================================
// Installs a `fmt` subscriber filtered by RUST_LOG, with this
// crate at `info` unless RUST_LOG says otherwise.
//
//   RUST_LOG=medpix_dataset=debug   → per-image skips and
//                                     per-sample decisions

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Default filter directive for this crate
pub const DEFAULT_DIRECTIVE: &str = "medpix_dataset=info";

/// Install the global subscriber.
///
/// Returns an error instead of panicking if one is already set,
/// so it is safe to call from tests and from host applications.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(DEFAULT_DIRECTIVE.parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already installed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails_cleanly() {
        // Another test may have installed it first; either way the
        // second call must error rather than panic.
        let _ = init_tracing();
        assert!(init_tracing().is_err());
    }
}
