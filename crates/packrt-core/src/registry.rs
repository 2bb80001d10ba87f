use crate::errors::{Result, RuntimeError};
use crate::exports::Exports;
use crate::loader::{Loader, ModuleRecord};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Opaque key of a module in the registry. Compared by string equality only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(Arc<str>);

impl ModuleId {
    pub fn new(id: &str) -> Self {
        ModuleId(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        ModuleId::new(id)
    }
}

impl From<String> for ModuleId {
    fn from(id: String) -> Self {
        ModuleId(Arc::from(id))
    }
}

/// Code that populates one module's exports when the module is first loaded.
///
/// `module` is the record being instantiated, `exports` its container, and
/// `loader` the loader to request dependencies from.
pub trait ModuleFactory {
    fn instantiate(&self, module: &ModuleRecord, exports: &Exports, loader: &Loader)
        -> Result<()>;
}

impl<F> ModuleFactory for F
where
    F: Fn(&ModuleRecord, &Exports, &Loader) -> Result<()>,
{
    fn instantiate(
        &self,
        module: &ModuleRecord,
        exports: &Exports,
        loader: &Loader,
    ) -> Result<()> {
        self(module, exports, loader)
    }
}

/// Immutable map from module id to factory
pub struct Registry {
    factories: FxIndexMap<ModuleId, Box<dyn ModuleFactory>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, id: &str) -> Option<&dyn ModuleFactory> {
        self.factories.get(id).map(|factory| factory.as_ref())
    }

    /// The registered id together with its factory
    pub(crate) fn get_entry(&self, id: &str) -> Option<(&ModuleId, &dyn ModuleFactory)> {
        self.factories
            .get_key_value(id)
            .map(|(key, factory)| (key, factory.as_ref()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Module ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.factories.keys()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("modules", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects factories before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    factories: FxIndexMap<ModuleId, Box<dyn ModuleFactory>>,
    duplicate: Option<ModuleId>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure factory
    pub fn module<F>(self, id: impl Into<ModuleId>, factory: F) -> Self
    where
        F: Fn(&ModuleRecord, &Exports, &Loader) -> Result<()> + 'static,
    {
        self.factory(id, Box::new(factory))
    }

    /// Register any [`ModuleFactory`] implementation
    pub fn factory(mut self, id: impl Into<ModuleId>, factory: Box<dyn ModuleFactory>) -> Self {
        let id = id.into();
        if self.factories.contains_key(&id) {
            self.duplicate.get_or_insert(id);
        } else {
            self.factories.insert(id, factory);
        }
        self
    }

    /// Freeze the registry. Fails on the first id registered twice.
    pub fn build(self) -> Result<Registry> {
        if let Some(id) = self.duplicate {
            return Err(RuntimeError::DuplicateModule { id });
        }
        Ok(Registry {
            factories: self.factories,
        })
    }
}
