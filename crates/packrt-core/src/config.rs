use crate::errors::RuntimeError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// What bootstrap does with the entry module's exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootstrapMode {
    /// Run the entry for its side effects and drop its exports
    #[serde(rename = "discard")]
    Discard,
    /// Hand the entry exports back to the host
    #[serde(rename = "expose")]
    Expose,
}

impl Default for BootstrapMode {
    fn default() -> Self {
        BootstrapMode::Discard
    }
}

impl FromStr for BootstrapMode {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discard" => Ok(BootstrapMode::Discard),
            "expose" => Ok(BootstrapMode::Expose),
            other => Err(RuntimeError::Config(format!(
                "unknown bootstrap mode '{}' (expected discard or expose)",
                other
            ))),
        }
    }
}

/// How the loader reacts when a module is requested while it is still loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircularImportPolicy {
    /// Return the partially populated exports silently
    #[serde(rename = "allow")]
    Allow,
    /// Return the partially populated exports and log the cycle
    #[serde(rename = "warn")]
    Warn,
    /// Fail the load with a circular import error
    #[serde(rename = "deny")]
    Deny,
}

impl Default for CircularImportPolicy {
    fn default() -> Self {
        CircularImportPolicy::Allow
    }
}

impl FromStr for CircularImportPolicy {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" => Ok(CircularImportPolicy::Allow),
            "warn" => Ok(CircularImportPolicy::Warn),
            "deny" => Ok(CircularImportPolicy::Deny),
            other => Err(RuntimeError::Config(format!(
                "unknown circular import policy '{}' (expected allow, warn or deny)",
                other
            ))),
        }
    }
}

/// Loader and bootstrap configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Id of the module bootstrap loads first
    #[serde(default)]
    pub entry: Option<String>,

    /// Keep or drop the entry exports (default: discard)
    #[serde(default)]
    pub bootstrap: BootstrapMode,

    /// Behaviour on re-entrant loads (default: allow)
    #[serde(default)]
    pub circular_imports: CircularImportPolicy,
}

/// Settings given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub entry: Option<String>,
    pub bootstrap: Option<BootstrapMode>,
    pub circular_imports: Option<CircularImportPolicy>,
}

impl LoaderConfig {
    pub fn with_entry(entry: impl Into<String>) -> Self {
        Self {
            entry: Some(entry.into()),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path)?;
        let config: LoaderConfig =
            serde_json::from_str(&content).map_err(|e| RuntimeError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Write a starter configuration to a file
    pub fn init_file(path: &Path) -> Result<(), RuntimeError> {
        let config = LoaderConfig::with_entry("./src/index.js");
        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| RuntimeError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Apply command-line overrides on top of this configuration
    pub fn merge_with_cli(&mut self, cli: CliOverrides) {
        if let Some(entry) = cli.entry {
            self.entry = Some(entry);
        }
        if let Some(bootstrap) = cli.bootstrap {
            self.bootstrap = bootstrap;
        }
        if let Some(policy) = cli.circular_imports {
            self.circular_imports = policy;
        }
    }
}
