//! Structured logging via `tracing`.
//!
//! The filter comes from `LAST_HEARTH_LOG` (same syntax as `RUST_LOG`) and
//! defaults to `info`.  Initialisation is idempotent: the first call wins.

use std::fs::File;
use std::path::Path;
use std::sync::{Mutex, Once};

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "LAST_HEARTH_LOG";
const DEFAULT_FILTER: &str = "info";

static TRACING_INIT: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .compact();
        // Ignore error if a global subscriber is already set (e.g. by a test harness)
        let _ = subscriber.try_init();
    });
}

/// Log to `path` instead of the terminal, which the game screen owns.
pub fn init_tracing_to_file(path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = File::create(path)?;
    TRACING_INIT.call_once(move || {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .compact();
        let _ = subscriber.try_init();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!("still logging after a second init");
    }
}
