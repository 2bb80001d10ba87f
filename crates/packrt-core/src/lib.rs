//! Runtime module system for bundled programs.
//!
//! A [`Registry`] maps module ids to factories, a [`Loader`] instantiates each
//! module at most once and caches its [`Exports`], and [`bootstrap`] starts a
//! program from its entry module.

pub mod bootstrap;
pub mod config;
pub mod console;
pub mod errors;
pub mod exports;
pub mod loader;
pub mod namespace;
pub mod registry;
pub mod value;

pub use bootstrap::{bootstrap, run_entry, Startup};
pub use config::{BootstrapMode, CircularImportPolicy, CliOverrides, LoaderConfig};
pub use console::{log_function, CollectingConsole, Console, StdoutConsole};
pub use errors::{Result, RuntimeError};
pub use exports::{accessor, define_exports, Accessor, Exports};
pub use loader::{Loader, ModuleHandle, ModuleRecord, ModuleState};
pub use namespace::{default_export, mark_as_namespace};
pub use registry::{ModuleFactory, ModuleId, Registry, RegistryBuilder};
pub use value::{Function, Value};
