use std::sync::Once;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,pixmark=debug";

static INIT: Once = Once::new();

/// Installs the global subscriber. Output goes to stderr; stdout carries GeoJSON only.
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        if tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()
            .is_err()
        {
            eprintln!("pixmark: a global tracing subscriber is already installed");
        }
    });
}
