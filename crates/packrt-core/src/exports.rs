//! Exports containers and the export binding helper.
//!
//! A container is shared by handle: the loader, the owning factory and every
//! importer hold clones of the same `Exports`, so bindings added after an
//! importer captured the handle are still visible to it.

use crate::errors::{Result, RuntimeError};
use crate::registry::FxIndexMap;
use crate::value::Value;
use rustc_hash::FxHashSet;
use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Zero-argument accessor backing a live binding
pub type Accessor = Rc<dyn Fn() -> Value>;

/// Wrap a closure as an [`Accessor`]
pub fn accessor<F>(get: F) -> Accessor
where
    F: Fn() -> Value + 'static,
{
    Rc::new(get)
}

#[derive(Clone)]
enum Binding {
    Value(Value),
    Live(Accessor),
}

/// Metadata set by the namespace marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NamespaceMeta {
    pub to_string_tag: &'static str,
    pub es_module: bool,
}

struct ExportsInner {
    entries: RefCell<FxIndexMap<String, Binding>>,
    namespace: OnceCell<NamespaceMeta>,
}

/// Per-module key/value store of exported bindings
#[derive(Clone)]
pub struct Exports {
    inner: Rc<ExportsInner>,
}

impl Exports {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ExportsInner {
                entries: RefCell::new(FxIndexMap::default()),
                namespace: OnceCell::new(),
            }),
        }
    }

    /// True when both handles refer to the same container
    pub fn ptr_eq(&self, other: &Exports) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    /// Own-entry check. Namespace metadata is not an entry.
    pub fn has_own(&self, name: &str) -> bool {
        self.inner.entries.borrow().contains_key(name)
    }

    /// Read an export. Live bindings re-run their accessor on every call.
    pub fn get(&self, name: &str) -> Option<Value> {
        // Clone the binding out so the accessor runs without the borrow held.
        let binding = self.inner.entries.borrow().get(name).cloned()?;
        Some(match binding {
            Binding::Value(value) => value,
            Binding::Live(get) => get(),
        })
    }

    pub fn is_live(&self, name: &str) -> bool {
        matches!(
            self.inner.entries.borrow().get(name),
            Some(Binding::Live(_))
        )
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.entries.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declare an eager export. Returns false if the name already exists.
    pub fn define_value(&self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        self.insert_if_absent(name.into(), Binding::Value(value.into()))
    }

    /// Declare a live export. Returns false if the name already exists.
    pub fn define_live<F>(&self, name: impl Into<String>, get: F) -> bool
    where
        F: Fn() -> Value + 'static,
    {
        self.insert_if_absent(name.into(), Binding::Live(Rc::new(get)))
    }

    fn insert_if_absent(&self, name: String, binding: Binding) -> bool {
        let mut entries = self.inner.entries.borrow_mut();
        if entries.contains_key(&name) {
            trace!(export = %name, "export already defined, skipping");
            return false;
        }
        entries.insert(name, binding);
        true
    }

    /// Call a function export
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.get(name) {
            Some(Value::Function(func)) => func.call(args),
            Some(_) => Err(RuntimeError::NotCallable {
                name: name.to_string(),
            }),
            None => Err(RuntimeError::MissingExport {
                name: name.to_string(),
            }),
        }
    }

    pub(crate) fn namespace_meta(&self) -> Option<NamespaceMeta> {
        self.inner.namespace.get().copied()
    }

    pub(crate) fn set_namespace_meta(&self, meta: NamespaceMeta) {
        // Already marked: the stored flags are the same fixed values.
        let _ = self.inner.namespace.set(meta);
    }

    pub fn is_namespace(&self) -> bool {
        self.namespace_meta().is_some_and(|meta| meta.es_module)
    }

    pub fn to_string_tag(&self) -> Option<&'static str> {
        self.namespace_meta().map(|meta| meta.to_string_tag)
    }

    /// Snapshot every export as JSON, evaluating live bindings once
    pub fn to_json(&self) -> serde_json::Value {
        exports_to_json(self, &mut FxHashSet::default())
    }
}

impl Default for Exports {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Exports {
    // Listing keys only; evaluating accessors here could run module code.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exports")
            .field("keys", &self.keys())
            .field("namespace", &self.is_namespace())
            .finish()
    }
}

/// Install each `(name, accessor)` pair as a live binding unless the name is
/// already an own entry. Returns how many bindings were installed.
pub fn define_exports<I, K>(exports: &Exports, definitions: I) -> usize
where
    I: IntoIterator<Item = (K, Accessor)>,
    K: Into<String>,
{
    let mut installed = 0;
    for (name, get) in definitions {
        if exports.insert_if_absent(name.into(), Binding::Live(get)) {
            installed += 1;
        }
    }
    installed
}

fn exports_to_json(exports: &Exports, seen: &mut FxHashSet<usize>) -> serde_json::Value {
    if !seen.insert(exports.addr()) {
        return serde_json::Value::String("[Circular]".to_string());
    }
    let mut object = serde_json::Map::new();
    for key in exports.keys() {
        let value = exports.get(&key).unwrap_or_default();
        object.insert(key, value_to_json(&value, seen));
    }
    seen.remove(&exports.addr());
    serde_json::Value::Object(object)
}

pub(crate) fn value_to_json(value: &Value, seen: &mut FxHashSet<usize>) -> serde_json::Value {
    match value {
        Value::Undefined | Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        Value::Function(_) => serde_json::Value::String("[Function]".to_string()),
        Value::Namespace(exports) => exports_to_json(exports, seen),
    }
}
