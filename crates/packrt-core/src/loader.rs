//! Module loader and instance cache.
//!
//! Every module is instantiated at most once. The record for a module is put
//! into the cache *before* its factory runs, so a re-entrant request for the
//! same id (a circular import) gets the partially populated exports back
//! instead of running the factory again.

use crate::config::{CircularImportPolicy, LoaderConfig};
use crate::errors::{format_chain, Result, RuntimeError};
use crate::exports::Exports;
use crate::registry::{FxIndexMap, ModuleId, Registry};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Lifecycle of a module as seen by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Never requested
    Unloaded,
    /// Record cached, factory running or failed
    Loading,
    /// Factory returned successfully
    Loaded,
}

/// Stable slot of a cached record. Records are never evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleHandle(usize);

impl ModuleHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

struct RecordInner {
    id: ModuleId,
    exports: Exports,
    state: Cell<ModuleState>,
}

/// The per-module record handed to a factory
#[derive(Clone)]
pub struct ModuleRecord {
    inner: Rc<RecordInner>,
}

impl ModuleRecord {
    fn new(id: ModuleId) -> Self {
        Self {
            inner: Rc::new(RecordInner {
                id,
                exports: Exports::new(),
                state: Cell::new(ModuleState::Loading),
            }),
        }
    }

    pub fn id(&self) -> &ModuleId {
        &self.inner.id
    }

    pub fn exports(&self) -> &Exports {
        &self.inner.exports
    }

    pub fn state(&self) -> ModuleState {
        self.inner.state.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == ModuleState::Loaded
    }

    fn set_state(&self, state: ModuleState) {
        self.inner.state.set(state);
    }
}

impl fmt::Debug for ModuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRecord")
            .field("id", self.id())
            .field("state", &self.state())
            .field("exports", self.exports())
            .finish()
    }
}

/// Instantiates modules from a [`Registry`] and caches their exports
pub struct Loader {
    registry: Registry,
    cache: RefCell<FxIndexMap<ModuleId, ModuleRecord>>,
    stack: RefCell<Vec<ModuleId>>,
    circular_imports: CircularImportPolicy,
}

impl Loader {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            cache: RefCell::new(FxIndexMap::default()),
            stack: RefCell::new(Vec::new()),
            circular_imports: CircularImportPolicy::default(),
        }
    }

    pub fn with_config(registry: Registry, config: &LoaderConfig) -> Self {
        Self::new(registry).with_circular_imports(config.circular_imports)
    }

    pub fn with_circular_imports(mut self, policy: CircularImportPolicy) -> Self {
        self.circular_imports = policy;
        self
    }

    /// Return the exports of `id`, instantiating the module on first request
    pub fn load(&self, id: &str) -> Result<Exports> {
        let cached = self.cache.borrow().get(id).cloned();
        if let Some(record) = cached {
            if record.state() == ModuleState::Loading {
                self.check_reentrant(&record)?;
            }
            trace!(module = %id, "module cache hit");
            return Ok(record.exports().clone());
        }

        let Some((key, factory)) = self.registry.get_entry(id) else {
            debug!(module = %id, "module not found in registry");
            return Err(RuntimeError::UnresolvedModule {
                id: ModuleId::from(id),
            });
        };

        let record = ModuleRecord::new(key.clone());
        self.cache.borrow_mut().insert(key.clone(), record.clone());

        let (guard, depth) = StackGuard::push(&self.stack, key.clone());
        debug!(module = %key, depth, "instantiating module");

        // No cache or stack borrow may be held here: the factory re-enters `load`.
        let result = factory.instantiate(&record, record.exports(), self);
        drop(guard);

        match result {
            Ok(()) => {
                record.set_state(ModuleState::Loaded);
                debug!(module = %key, exports = record.exports().len(), "module loaded");
                Ok(record.exports().clone())
            }
            Err(err) => {
                warn!(module = %key, error = %err, "module factory failed");
                Err(err)
            }
        }
    }

    fn check_reentrant(&self, record: &ModuleRecord) -> Result<()> {
        let chain = {
            let stack = self.stack.borrow();
            match stack.iter().position(|id| id == record.id()) {
                Some(pos) => {
                    let mut chain = stack[pos..].to_vec();
                    chain.push(record.id().clone());
                    chain
                }
                None => {
                    // Not on the stack: an earlier factory run failed.
                    debug!(module = %record.id(), "returning exports of a module that failed to load");
                    return Ok(());
                }
            }
        };

        match self.circular_imports {
            CircularImportPolicy::Allow => Ok(()),
            CircularImportPolicy::Warn => {
                warn!(chain = %format_chain(&chain), "circular import, returning partial exports");
                Ok(())
            }
            CircularImportPolicy::Deny => Err(RuntimeError::CircularImport { chain }),
        }
    }

    pub fn state(&self, id: &str) -> ModuleState {
        self.cache
            .borrow()
            .get(id)
            .map(ModuleRecord::state)
            .unwrap_or(ModuleState::Unloaded)
    }

    pub fn is_cached(&self, id: &str) -> bool {
        self.cache.borrow().contains_key(id)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Cached module ids in instantiation order
    pub fn cached_ids(&self) -> Vec<ModuleId> {
        self.cache.borrow().keys().cloned().collect()
    }

    pub fn handle(&self, id: &str) -> Option<ModuleHandle> {
        self.cache.borrow().get_index_of(id).map(ModuleHandle)
    }

    pub fn record(&self, handle: ModuleHandle) -> Option<ModuleRecord> {
        self.cache
            .borrow()
            .get_index(handle.0)
            .map(|(_, record)| record.clone())
    }

    /// Modules currently being instantiated, outermost first
    pub fn loading_chain(&self) -> Vec<ModuleId> {
        self.stack.borrow().clone()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn circular_imports(&self) -> CircularImportPolicy {
        self.circular_imports
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("registry", &self.registry)
            .field("cached", &self.cached_ids())
            .field("circular_imports", &self.circular_imports)
            .finish()
    }
}

/// Pops the load stack when a factory returns or unwinds
struct StackGuard<'a> {
    stack: &'a RefCell<Vec<ModuleId>>,
}

impl<'a> StackGuard<'a> {
    fn push(stack: &'a RefCell<Vec<ModuleId>>, id: ModuleId) -> (Self, usize) {
        let mut entries = stack.borrow_mut();
        entries.push(id);
        let depth = entries.len();
        drop(entries);
        (Self { stack }, depth)
    }
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}
