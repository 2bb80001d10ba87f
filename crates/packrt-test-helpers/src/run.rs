//! Bootstrap helpers for tests

use packrt_core::{bootstrap, BootstrapMode, LoaderConfig, Registry, Result, Startup};

/// Bootstrap `registry` from `entry`, keeping the entry exports
pub fn run_exposed(registry: Registry, entry: &str) -> Result<Startup> {
    let config = LoaderConfig {
        bootstrap: BootstrapMode::Expose,
        ..LoaderConfig::with_entry(entry)
    };
    bootstrap(registry, &config)
}

/// Bootstrap `registry` from `entry` the way a bundle does, dropping the exports
pub fn run(registry: Registry, entry: &str) -> Result<Startup> {
    bootstrap(registry, &LoaderConfig::with_entry(entry))
}
