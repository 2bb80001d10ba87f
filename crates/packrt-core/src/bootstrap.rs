use crate::config::{BootstrapMode, LoaderConfig};
use crate::errors::{Result, RuntimeError};
use crate::exports::Exports;
use crate::loader::Loader;
use crate::registry::{ModuleId, Registry};
use tracing::info;

/// A started program: the loader plus, when exposed, the entry exports
#[derive(Debug)]
pub struct Startup {
    loader: Loader,
    entry: ModuleId,
    exports: Option<Exports>,
}

impl Startup {
    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn into_loader(self) -> Loader {
        self.loader
    }

    pub fn entry(&self) -> &ModuleId {
        &self.entry
    }

    /// Entry exports; `None` under [`BootstrapMode::Discard`]
    pub fn exports(&self) -> Option<&Exports> {
        self.exports.as_ref()
    }
}

/// Build the loader and issue the single entry load.
///
/// On failure the loader is dropped with the error. Hosts that want to
/// inspect the partially loaded entry afterwards build a [`Loader`] with
/// [`Loader::with_config`] and call [`run_entry`] instead.
pub fn bootstrap(registry: Registry, config: &LoaderConfig) -> Result<Startup> {
    let entry = entry_id(config)?;
    let loader = Loader::with_config(registry, config);
    let exports = run_entry(&loader, config)?;

    Ok(Startup {
        loader,
        entry,
        exports,
    })
}

/// Load the configured entry on an existing loader.
///
/// Returns the entry exports under [`BootstrapMode::Expose`], `None` under
/// [`BootstrapMode::Discard`]. The loader keeps its cache either way.
pub fn run_entry(loader: &Loader, config: &LoaderConfig) -> Result<Option<Exports>> {
    let entry = entry_id(config)?;
    info!(entry = %entry, modules = loader.registry().len(), "starting bundle");

    let exports = loader.load(entry.as_str())?;
    Ok(match config.bootstrap {
        BootstrapMode::Discard => None,
        BootstrapMode::Expose => Some(exports),
    })
}

fn entry_id(config: &LoaderConfig) -> Result<ModuleId> {
    config
        .entry
        .as_deref()
        .map(ModuleId::from)
        .ok_or_else(|| RuntimeError::Config("no entry module configured".to_string()))
}
